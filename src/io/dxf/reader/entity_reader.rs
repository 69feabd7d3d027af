//! Entity decoders
//!
//! Each decoder undoes what the matching encoder does to the model: points
//! stored in the object coordinate system are brought back to world
//! coordinates, ellipse parameters become geometric angles and MText chunks
//! are joined again.

use super::section_reader::SectionReader;
use super::stream_reader::DxfCodePair;
use crate::entities::*;
use crate::error::Result;
use crate::types::transform::normalize_angle;
use crate::types::{object_to_world, world_to_object, Color, Handle, Vector2, Vector3};
use std::f64::consts::TAU;
use tracing::trace;

/// One MLINE vertex in world coordinates
#[derive(Debug, Default)]
struct MLineVertexRecord {
    position: Vector3,
    direction: Vector3,
    miter: Vector3,
    segments: Vec<MLineSegment>,
}

/// One VERTEX record of a POLYLINE sequence, before it is typed
#[derive(Debug, Default)]
struct VertexRecord {
    handle: Handle,
    location: Vector3,
    start_width: f64,
    end_width: f64,
    bulge: f64,
    flags: i16,
    indices: [i16; 4],
}

impl<'a> SectionReader<'a> {
    /// Read one entity record, with its vertices or attributes, after its
    /// `0` pair
    pub(super) fn read_entity(&mut self, kind: &str) -> Result<EntityType> {
        self.paper_space = false;
        let entity = match kind {
            "POINT" => self.read_point()?,
            "LINE" => self.read_line()?,
            "RAY" => {
                let (common, base_point, direction) = self.read_construction_line()?;
                let mut ray = Ray::new(base_point, direction);
                ray.common = common;
                ray.into()
            }
            "XLINE" => {
                let (common, base_point, direction) = self.read_construction_line()?;
                let mut xline = XLine::new(base_point, direction);
                xline.common = common;
                xline.into()
            }
            "CIRCLE" | "ARC" => self.read_circle_or_arc(kind)?,
            "ELLIPSE" => self.read_ellipse()?,
            "SPLINE" => self.read_spline()?,
            "LWPOLYLINE" => self.read_lwpolyline()?,
            "POLYLINE" => self.read_polyline()?,
            "TEXT" => self.read_text()?,
            "MTEXT" => self.read_mtext()?,
            "ATTDEF" => self.read_attribute_definition()?,
            "INSERT" => self.read_insert()?,
            "SOLID" => self.read_solid()?,
            "3DFACE" => self.read_face3d()?,
            "HATCH" => self.read_hatch()?,
            "DIMENSION" => self.read_dimension()?,
            "LEADER" => self.read_leader()?,
            "TOLERANCE" => self.read_tolerance()?,
            "MLINE" => self.read_mline()?,
            "IMAGE" => self.read_raster_image()?,
            "VIEWPORT" => self.read_viewport()?,
            _ => {
                let mut unknown = UnknownEntity::new(kind);
                let mut common = EntityCommon::new();
                self.read_entity_record(&mut common, |_, _, _| Ok(()))?;
                unknown.common = common;
                self.record_unknown(kind);
                unknown.into()
            }
        };
        trace!(handle = %entity.handle(), kind, "read entity");
        Ok(entity)
    }

    fn read_point(&mut self) -> Result<EntityType> {
        let mut point = Point::new();
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |_, _, pair| {
            match pair.code {
                10 | 20 | 30 => {
                    pair.apply_to(&mut point.location);
                }
                39 => point.thickness = pair.as_double(),
                50 => point.rotation = pair.as_angle(),
                210 | 220 | 230 => {
                    pair.apply_to(&mut point.normal);
                }
                _ => {}
            }
            Ok(())
        })?;
        point.common = common;
        Ok(point.into())
    }

    fn read_line(&mut self) -> Result<EntityType> {
        let mut line = Line::new();
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |_, _, pair| {
            match pair.code {
                10 | 20 | 30 => {
                    pair.apply_to(&mut line.start);
                }
                11 | 21 | 31 => {
                    pair.apply_to(&mut line.end);
                }
                39 => line.thickness = pair.as_double(),
                210 | 220 | 230 => {
                    pair.apply_to(&mut line.normal);
                }
                _ => {}
            }
            Ok(())
        })?;
        line.common = common;
        Ok(line.into())
    }

    /// Base point and direction shared by RAY and XLINE
    fn read_construction_line(&mut self) -> Result<(EntityCommon, Vector3, Vector3)> {
        let mut common = EntityCommon::new();
        let mut base_point = Vector3::ZERO;
        let mut direction = Vector3::UNIT_X;
        self.read_entity_record(&mut common, |_, _, pair| {
            match pair.code {
                10 | 20 | 30 => {
                    pair.apply_to(&mut base_point);
                }
                11 | 21 | 31 => {
                    pair.apply_to(&mut direction);
                }
                _ => {}
            }
            Ok(())
        })?;
        Ok((common, base_point, direction))
    }

    fn read_circle_or_arc(&mut self, kind: &str) -> Result<EntityType> {
        let mut arc = Arc::new();
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |_, _, pair| {
            match pair.code {
                10 | 20 | 30 => {
                    pair.apply_to(&mut arc.center);
                }
                40 => arc.radius = pair.as_double(),
                39 => arc.thickness = pair.as_double(),
                50 => arc.start_angle = pair.as_angle(),
                51 => arc.end_angle = pair.as_angle(),
                210 | 220 | 230 => {
                    pair.apply_to(&mut arc.normal);
                }
                _ => {}
            }
            Ok(())
        })?;
        arc.common = common;
        arc.center = object_to_world(arc.center, arc.normal);

        if kind == "ARC" {
            return Ok(arc.into());
        }
        let mut circle = Circle::from_center_radius(arc.center, arc.radius).with_normal(arc.normal);
        circle.thickness = arc.thickness;
        circle.common = arc.common;
        Ok(circle.into())
    }

    /// The file stores the major axis end point and eccentric-anomaly
    /// parameters; the model keeps axis lengths, a rotation in the entity
    /// plane and geometric angles
    fn read_ellipse(&mut self) -> Result<EntityType> {
        let mut common = EntityCommon::new();
        let mut center = Vector3::ZERO;
        let mut major_end = Vector3::UNIT_X;
        let mut normal = Vector3::UNIT_Z;
        let mut ratio = 1.0;
        let mut parameters = (0.0, TAU);
        self.read_entity_record(&mut common, |_, _, pair| {
            match pair.code {
                10 | 20 | 30 => {
                    pair.apply_to(&mut center);
                }
                11 | 21 | 31 => {
                    pair.apply_to(&mut major_end);
                }
                210 | 220 | 230 => {
                    pair.apply_to(&mut normal);
                }
                40 => ratio = pair.as_double(),
                41 => parameters.0 = pair.as_double(),
                42 => parameters.1 = pair.as_double(),
                _ => {}
            }
            Ok(())
        })?;

        let local = world_to_object(major_end, normal);
        let major_axis = 2.0 * local.xy().length();
        let mut ellipse = Ellipse::new(center, major_axis, major_axis * ratio)
            .with_rotation(local.y.atan2(local.x));
        ellipse.normal = normal;
        ellipse.common = common;

        let (start, end) = parameters;
        let sweep = end - start;
        let full = sweep.abs() < 1e-12 || (sweep.abs() - TAU).abs() < 1e-9;
        if !full {
            ellipse.start_angle = normalize_angle(ellipse.angle_at(start));
            ellipse.end_angle = normalize_angle(ellipse.angle_at(end));
        }
        Ok(ellipse.into())
    }

    fn read_spline(&mut self) -> Result<EntityType> {
        let mut spline = Spline::new();
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |_, _, pair| {
            match pair.code {
                210 | 220 | 230 => {
                    pair.apply_to(&mut spline.normal);
                }
                70 => spline.flags = SplineFlags::from_bits_truncate(pair.as_i16()),
                71 => spline.degree = pair.as_i16(),
                42 => spline.knot_tolerance = pair.as_double(),
                43 => spline.control_point_tolerance = pair.as_double(),
                44 => spline.fit_tolerance = pair.as_double(),
                12 | 22 | 32 => {
                    pair.apply_to(spline.start_tangent.get_or_insert(Vector3::ZERO));
                }
                13 | 23 | 33 => {
                    pair.apply_to(spline.end_tangent.get_or_insert(Vector3::ZERO));
                }
                40 => spline.knots.push(pair.as_double()),
                41 => spline.weights.push(pair.as_double()),
                10 => spline
                    .control_points
                    .push(Vector3::new(pair.as_double(), 0.0, 0.0)),
                20 | 30 => {
                    if let Some(point) = spline.control_points.last_mut() {
                        pair.apply_to(point);
                    }
                }
                11 => spline
                    .fit_points
                    .push(Vector3::new(pair.as_double(), 0.0, 0.0)),
                21 | 31 => {
                    if let Some(point) = spline.fit_points.last_mut() {
                        pair.apply_to(point);
                    }
                }
                _ => {}
            }
            Ok(())
        })?;
        spline.common = common;
        Ok(spline.into())
    }

    // ─── Polylines ───

    fn read_lwpolyline(&mut self) -> Result<EntityType> {
        let mut polyline = LwPolyline::new();
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |_, _, pair| {
            match pair.code {
                70 => {
                    let flags = pair.as_i16();
                    polyline.is_closed = flags & 1 != 0;
                    polyline.plinegen = flags & 128 != 0;
                }
                43 => polyline.constant_width = pair.as_double(),
                38 => polyline.elevation = pair.as_double(),
                39 => polyline.thickness = pair.as_double(),
                10 => polyline
                    .vertices
                    .push(LwVertex::new(Vector2::new(pair.as_double(), 0.0))),
                20 | 40 | 41 | 42 => {
                    let Some(vertex) = polyline.vertices.last_mut() else {
                        return Ok(());
                    };
                    match pair.code {
                        20 => vertex.location.y = pair.as_double(),
                        40 => vertex.start_width = pair.as_double(),
                        41 => vertex.end_width = pair.as_double(),
                        _ => vertex.bulge = pair.as_double(),
                    }
                }
                210 | 220 | 230 => {
                    pair.apply_to(&mut polyline.normal);
                }
                _ => {}
            }
            Ok(())
        })?;
        polyline.common = common;
        Ok(polyline.into())
    }

    /// POLYLINE header followed by its VERTEX records; the `70` flags pick
    /// the 2D, 3D or polyface form
    fn read_polyline(&mut self) -> Result<EntityType> {
        let mut common = EntityCommon::new();
        let mut flags = 0;
        let mut elevation = Vector3::ZERO;
        let mut thickness = 0.0;
        let mut widths = (0.0, 0.0);
        let mut normal = Vector3::UNIT_Z;
        self.read_entity_record(&mut common, |_, _, pair| {
            match pair.code {
                70 => flags = pair.as_i16(),
                10 | 20 | 30 => {
                    pair.apply_to(&mut elevation);
                }
                39 => thickness = pair.as_double(),
                40 => widths.0 = pair.as_double(),
                41 => widths.1 = pair.as_double(),
                210 | 220 | 230 => {
                    pair.apply_to(&mut normal);
                }
                _ => {}
            }
            Ok(())
        })?;
        let (vertices, seqend_handle) = self.read_vertices()?;

        if flags & 64 != 0 {
            let mut mesh = PolyfaceMesh::new();
            for record in vertices {
                if record.flags & 64 != 0 {
                    let mut vertex = PolyfaceVertex::new(record.location);
                    vertex.handle = record.handle;
                    mesh.vertices.push(vertex);
                } else {
                    mesh.faces.push(PolyfaceFace {
                        handle: record.handle,
                        indices: record.indices,
                    });
                }
            }
            mesh.common = common;
            mesh.seqend_handle = seqend_handle;
            return Ok(mesh.into());
        }

        if flags & 8 != 0 {
            let mut polyline = Polyline3D::new();
            polyline.is_closed = flags & 1 != 0;
            polyline.vertices = vertices
                .into_iter()
                .map(|record| {
                    let mut vertex = Vertex3D::new(record.location);
                    vertex.handle = record.handle;
                    vertex
                })
                .collect();
            polyline.common = common;
            polyline.seqend_handle = seqend_handle;
            return Ok(polyline.into());
        }

        let mut polyline = Polyline2D::new();
        polyline.flags = PolylineFlags::from_bits_truncate(flags);
        polyline.elevation = elevation.z;
        polyline.thickness = thickness;
        (polyline.start_width, polyline.end_width) = widths;
        polyline.normal = normal;
        polyline.vertices = vertices
            .into_iter()
            .map(|record| Vertex2D {
                handle: record.handle,
                location: record.location.xy(),
                start_width: record.start_width,
                end_width: record.end_width,
                bulge: record.bulge,
                flags: VertexFlags::from_bits_truncate(record.flags),
            })
            .collect();
        polyline.common = common;
        polyline.seqend_handle = seqend_handle;
        Ok(polyline.into())
    }

    /// VERTEX records up to SEQEND; returns the SEQEND handle, null when the
    /// sequence is not terminated
    fn read_vertices(&mut self) -> Result<(Vec<VertexRecord>, Handle)> {
        let mut vertices = Vec::new();
        while let Some(pair) = self.reader.read_pair()? {
            match pair.as_str() {
                "VERTEX" if pair.code == 0 => {
                    let mut record = VertexRecord::default();
                    let mut common = EntityCommon::new();
                    self.read_entity_record(&mut common, |_, _, pair| {
                        match pair.code {
                            10 | 20 | 30 => {
                                pair.apply_to(&mut record.location);
                            }
                            40 => record.start_width = pair.as_double(),
                            41 => record.end_width = pair.as_double(),
                            42 => record.bulge = pair.as_double(),
                            70 => record.flags = pair.as_i16(),
                            71..=74 => record.indices[(pair.code - 71) as usize] = pair.as_i16(),
                            _ => {}
                        }
                        Ok(())
                    })?;
                    record.handle = common.handle;
                    vertices.push(record);
                }
                "SEQEND" if pair.code == 0 => {
                    return Ok((vertices, self.read_seqend()?));
                }
                _ => {
                    self.reader.push_back(pair);
                    break;
                }
            }
        }
        Ok((vertices, Handle::NULL))
    }

    fn read_seqend(&mut self) -> Result<Handle> {
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |_, _, _| Ok(()))?;
        Ok(common.handle)
    }

    // ─── Text ───

    /// Fields of the first `AcDbText` block; false for any other code
    fn read_text_field(&self, text: &mut TextProperties, pair: &DxfCodePair) -> bool {
        match pair.code {
            10 | 20 | 30 => {
                pair.apply_to(&mut text.insertion_point);
            }
            11 | 21 | 31 => {
                pair.apply_to(text.alignment_point.get_or_insert(Vector3::ZERO));
            }
            39 => text.thickness = pair.as_double(),
            40 => text.height = pair.as_double(),
            1 => text.value = self.string(pair),
            50 => text.rotation = pair.as_angle(),
            41 => text.width_factor = pair.as_double(),
            51 => text.oblique_angle = pair.as_angle(),
            7 => text.style = self.string(pair),
            71 => text.mirror = TextMirrorFlags::from_bits_truncate(pair.as_i16()),
            72 => text.horizontal_alignment = TextHorizontalAlignment::from(pair.as_i16()),
            210 | 220 | 230 => {
                pair.apply_to(&mut text.normal);
            }
            _ => return false,
        }
        true
    }

    fn read_text(&mut self) -> Result<EntityType> {
        let mut text = Text::new();
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |r, _, pair| {
            if !r.read_text_field(&mut text.properties, pair) && pair.code == 73 {
                text.properties.vertical_alignment = TextVerticalAlignment::from(pair.as_i16());
            }
            Ok(())
        })?;
        text.common = common;
        to_world(&mut text.properties);
        Ok(text.into())
    }

    fn read_attribute_definition(&mut self) -> Result<EntityType> {
        let mut attdef = AttributeDefinition::new("", "", "");
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |r, subclass, pair| {
            if subclass == "AcDbText" {
                r.read_text_field(&mut attdef.properties, pair);
                return Ok(());
            }
            match pair.code {
                2 => attdef.tag = r.string(pair),
                3 => attdef.prompt = r.string(pair),
                70 => attdef.flags = AttributeFlags::from_bits(pair.as_i16()),
                73 => attdef.field_length = pair.as_i16(),
                74 => {
                    attdef.properties.vertical_alignment =
                        TextVerticalAlignment::from(pair.as_i16())
                }
                280 => attdef.lock_position = pair.as_bool(),
                _ => {}
            }
            Ok(())
        })?;
        attdef.common = common;
        to_world(&mut attdef.properties);
        Ok(attdef.into())
    }

    fn read_attribute(&mut self) -> Result<Attribute> {
        let mut attribute = Attribute::new("", "");
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |r, subclass, pair| {
            if subclass == "AcDbText" {
                r.read_text_field(&mut attribute.properties, pair);
                return Ok(());
            }
            match pair.code {
                2 => attribute.tag = r.string(pair),
                70 => attribute.flags = AttributeFlags::from_bits(pair.as_i16()),
                73 => attribute.field_length = pair.as_i16(),
                74 => {
                    attribute.properties.vertical_alignment =
                        TextVerticalAlignment::from(pair.as_i16())
                }
                280 => attribute.lock_position = pair.as_bool(),
                _ => {}
            }
            Ok(())
        })?;
        attribute.common = common;
        to_world(&mut attribute.properties);
        Ok(attribute)
    }

    fn read_mtext(&mut self) -> Result<EntityType> {
        let mut mtext = MText::new();
        let mut common = EntityCommon::new();
        let mut chunks = String::new();
        let mut direction: Option<Vector3> = None;
        let mut rotation = 0.0;
        self.read_entity_record(&mut common, |r, _, pair| {
            match pair.code {
                10 | 20 | 30 => {
                    pair.apply_to(&mut mtext.insertion_point);
                }
                210 | 220 | 230 => {
                    pair.apply_to(&mut mtext.normal);
                }
                40 => mtext.height = pair.as_double(),
                41 => mtext.rectangle_width = pair.as_double(),
                44 => mtext.line_spacing_factor = pair.as_double(),
                73 => mtext.line_spacing_style = pair.as_i16(),
                71 => mtext.attachment_point = AttachmentPoint::from(pair.as_i16()),
                72 => mtext.drawing_direction = DrawingDirection::from(pair.as_i16()),
                3 | 1 => chunks.push_str(pair.as_str()),
                7 => mtext.style = r.string(pair),
                11 | 21 | 31 => {
                    pair.apply_to(direction.get_or_insert(Vector3::ZERO));
                }
                50 => rotation = pair.as_angle(),
                _ => {}
            }
            Ok(())
        })?;
        mtext.value = self.decode_text(&chunks);
        mtext.rotation = match direction {
            Some(direction) => {
                let local = world_to_object(direction, mtext.normal);
                normalize_angle(local.y.atan2(local.x))
            }
            None => rotation,
        };
        mtext.common = common;
        Ok(mtext.into())
    }

    // ─── Blocks ───

    fn read_insert(&mut self) -> Result<EntityType> {
        let mut insert = Insert::new("", Vector3::ZERO);
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |r, _, pair| {
            match pair.code {
                2 => insert.block_name = r.string(pair),
                10 | 20 | 30 => {
                    pair.apply_to(&mut insert.insert_point);
                }
                41 => insert.x_scale = pair.as_double(),
                42 => insert.y_scale = pair.as_double(),
                43 => insert.z_scale = pair.as_double(),
                50 => insert.rotation = pair.as_angle(),
                70 => insert.column_count = pair.as_i16(),
                71 => insert.row_count = pair.as_i16(),
                44 => insert.column_spacing = pair.as_double(),
                45 => insert.row_spacing = pair.as_double(),
                210 | 220 | 230 => {
                    pair.apply_to(&mut insert.normal);
                }
                _ => {}
            }
            Ok(())
        })?;
        insert.common = common;
        insert.insert_point = object_to_world(insert.insert_point, insert.normal);

        while let Some(pair) = self.reader.read_pair()? {
            match pair.as_str() {
                "ATTRIB" if pair.code == 0 => {
                    let attribute = self.read_attribute()?;
                    insert.attributes.push(attribute);
                }
                "SEQEND" if pair.code == 0 && !insert.attributes.is_empty() => {
                    insert.seqend_handle = self.read_seqend()?;
                    break;
                }
                _ => {
                    self.reader.push_back(pair);
                    break;
                }
            }
        }
        Ok(insert.into())
    }

    // ─── Planar ───

    /// Four corner points under codes 10 to 13
    fn read_corner(corners: &mut [Vector3; 4], pair: &DxfCodePair) -> bool {
        let index = match pair.code {
            10..=13 => pair.code - 10,
            20..=23 => pair.code - 20,
            30..=33 => pair.code - 30,
            _ => return false,
        };
        pair.apply_to(&mut corners[index as usize])
    }

    fn read_solid(&mut self) -> Result<EntityType> {
        let mut corners = [Vector3::ZERO; 4];
        let mut thickness = 0.0;
        let mut normal = Vector3::UNIT_Z;
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |_, _, pair| {
            if Self::read_corner(&mut corners, pair) {
                return Ok(());
            }
            match pair.code {
                39 => thickness = pair.as_double(),
                210 | 220 | 230 => {
                    pair.apply_to(&mut normal);
                }
                _ => {}
            }
            Ok(())
        })?;
        let [first, second, third, fourth] = corners;
        let mut solid = Solid::new(first, second, third, fourth);
        solid.thickness = thickness;
        solid.normal = normal;
        solid.common = common;
        Ok(solid.into())
    }

    fn read_face3d(&mut self) -> Result<EntityType> {
        let mut corners = [Vector3::ZERO; 4];
        let mut edges = 0;
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |_, _, pair| {
            if !Self::read_corner(&mut corners, pair) && pair.code == 70 {
                edges = pair.as_i16();
            }
            Ok(())
        })?;
        let [first, second, third, fourth] = corners;
        let mut face = Face3D::new(first, second, third, fourth);
        face.invisible_edges = InvisibleEdgeFlags::from_bits_truncate(edges);
        face.common = common;
        Ok(face.into())
    }

    // ─── Annotation ───

    fn read_leader(&mut self) -> Result<EntityType> {
        let mut leader = Leader::new();
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |r, _, pair| {
            match pair.code {
                3 => leader.dimension_style = r.string(pair),
                71 => leader.arrow_enabled = pair.as_bool(),
                72 => leader.path_type = LeaderPathType::from_value(pair.as_i16()),
                73 => leader.creation_type = LeaderCreationType::from_value(pair.as_i16()),
                74 => leader.hookline_direction = HooklineDirection::from_value(pair.as_i16()),
                75 => leader.hookline_enabled = pair.as_bool(),
                40 => leader.text_height = pair.as_double(),
                41 => leader.text_width = pair.as_double(),
                10 => leader
                    .vertices
                    .push(Vector3::new(pair.as_double(), 0.0, 0.0)),
                20 | 30 => {
                    if let Some(vertex) = leader.vertices.last_mut() {
                        pair.apply_to(vertex);
                    }
                }
                77 => leader.override_color = Color::from_index(pair.as_i16()),
                340 => leader.annotation_handle = pair.as_handle(),
                210 | 220 | 230 => {
                    pair.apply_to(&mut leader.normal);
                }
                _ => {}
            }
            Ok(())
        })?;
        leader.common = common;
        Ok(leader.into())
    }

    fn read_tolerance(&mut self) -> Result<EntityType> {
        let mut tolerance = Tolerance::new("", Vector3::ZERO);
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |r, _, pair| {
            match pair.code {
                3 => tolerance.dimension_style = r.string(pair),
                1 => tolerance.text = r.string(pair),
                10 | 20 | 30 => {
                    pair.apply_to(&mut tolerance.insertion_point);
                }
                11 | 21 | 31 => {
                    pair.apply_to(&mut tolerance.direction);
                }
                210 | 220 | 230 => {
                    pair.apply_to(&mut tolerance.normal);
                }
                _ => {}
            }
            Ok(())
        })?;
        tolerance.common = common;
        Ok(tolerance.into())
    }

    /// Vertex points are stored in world coordinates; the model keeps them
    /// in the plane of the multiline with a shared elevation
    fn read_mline(&mut self) -> Result<EntityType> {
        let mut mline = MLine::new();
        let mut common = EntityCommon::new();
        let mut start = Vector3::ZERO;
        let mut vertices: Vec<MLineVertexRecord> = Vec::new();
        self.read_entity_record(&mut common, |r, _, pair| {
            match pair.code {
                2 => mline.style_name = r.string(pair),
                340 => mline.style_handle = pair.as_handle(),
                40 => mline.scale = pair.as_double(),
                70 => mline.justification = MLineJustification::from(pair.as_i16()),
                71 => mline.flags = MLineFlags::from_bits_truncate(pair.as_i16()),
                10 | 20 | 30 => {
                    pair.apply_to(&mut start);
                }
                210 | 220 | 230 => {
                    pair.apply_to(&mut mline.normal);
                }
                11 => {
                    let mut vertex = MLineVertexRecord::default();
                    pair.apply_to(&mut vertex.position);
                    vertices.push(vertex);
                }
                21 | 31 | 12 | 22 | 32 | 13 | 23 | 33 => {
                    if let Some(vertex) = vertices.last_mut() {
                        let point = match pair.code {
                            21 | 31 => &mut vertex.position,
                            12 | 22 | 32 => &mut vertex.direction,
                            _ => &mut vertex.miter,
                        };
                        pair.apply_to(point);
                    }
                }
                74 => {
                    if let Some(vertex) = vertices.last_mut() {
                        vertex.segments.push(MLineSegment {
                            parameters: Vec::new(),
                            area_fill_parameters: Vec::new(),
                        });
                    }
                }
                41 | 42 => {
                    let segment = vertices
                        .last_mut()
                        .and_then(|vertex| vertex.segments.last_mut());
                    if let Some(segment) = segment {
                        match pair.code {
                            41 => segment.parameters.push(pair.as_double()),
                            _ => segment.area_fill_parameters.push(pair.as_double()),
                        }
                    }
                }
                _ => {}
            }
            Ok(())
        })?;

        let normal = mline.normal;
        mline.elevation = world_to_object(start, normal).z;
        mline.vertices = vertices
            .into_iter()
            .map(|record| {
                let mut vertex = MLineVertex::new(
                    world_to_object(record.position, normal).xy(),
                    world_to_object(record.direction, normal).xy(),
                    world_to_object(record.miter, normal).xy(),
                );
                vertex.segments = record.segments;
                vertex
            })
            .collect();
        mline.common = common;
        Ok(mline.into())
    }

    /// The file stores pixel vectors scaled by the raster units; the size is
    /// brought back to drawing units once the OBJECTS section is read
    fn read_raster_image(&mut self) -> Result<EntityType> {
        let mut image = RasterImage::new(Handle::NULL, Vector3::ZERO, 0.0, 0.0);
        let mut common = EntityCommon::new();
        let mut u = Vector3::UNIT_X;
        let mut v = Vector3::UNIT_Y;
        let mut pixels = Vector2::new(1.0, 1.0);
        let mut boundary = Vec::new();
        self.read_entity_record(&mut common, |_, _, pair| {
            match pair.code {
                10 | 20 | 30 => {
                    pair.apply_to(&mut image.position);
                }
                11 | 21 | 31 => {
                    pair.apply_to(&mut u);
                }
                12 | 22 | 32 => {
                    pair.apply_to(&mut v);
                }
                13 | 23 => {
                    pair.apply_to_2d(&mut pixels);
                }
                340 => image.definition = pair.as_handle(),
                360 => image.definition_reactor = pair.as_handle(),
                70 => image.display_flags = ImageDisplayFlags::from_bits_truncate(pair.as_i16()),
                280 => image.clipping = pair.as_bool(),
                281 => image.brightness = pair.as_i16().clamp(0, 100) as u8,
                282 => image.contrast = pair.as_i16().clamp(0, 100) as u8,
                283 => image.fade = pair.as_i16().clamp(0, 100) as u8,
                71 => image.clip_type = ClipType::from(pair.as_i16()),
                14 => boundary.push(Vector2::new(pair.as_double(), 0.0)),
                24 => {
                    if let Some(vertex) = boundary.last_mut() {
                        vertex.y = pair.as_double();
                    }
                }
                _ => {}
            }
            Ok(())
        })?;

        let normal = u.cross(&v);
        if normal.length() > 1e-12 {
            image.normal = normal.normalize();
        }
        let local = world_to_object(u, image.normal);
        image.rotation = normalize_angle(local.y.atan2(local.x));
        image.width = u.length() * pixels.x;
        image.height = v.length() * pixels.y;
        // The full-image rectangle is what the writer puts out for no clipping
        let full = [
            Vector2::new(-0.5, -0.5),
            Vector2::new(pixels.x - 0.5, pixels.y - 0.5),
        ];
        if boundary.as_slice() != full {
            image.clip_vertices = boundary;
        }
        image.common = common;
        Ok(image.into())
    }

    // ─── Paper space ───

    fn read_viewport(&mut self) -> Result<EntityType> {
        let mut viewport = Viewport::new();
        let mut common = EntityCommon::new();
        self.read_entity_record(&mut common, |r, _, pair| {
            match pair.code {
                10 | 20 | 30 => {
                    pair.apply_to(&mut viewport.center);
                }
                40 => viewport.width = pair.as_double(),
                41 => viewport.height = pair.as_double(),
                68 => viewport.status = pair.as_i16(),
                69 => viewport.id = pair.as_i16(),
                12 | 22 => {
                    pair.apply_to_2d(&mut viewport.view_center);
                }
                13 | 23 => {
                    pair.apply_to_2d(&mut viewport.snap_base);
                }
                14 | 24 => {
                    pair.apply_to_2d(&mut viewport.snap_spacing);
                }
                15 | 25 => {
                    pair.apply_to_2d(&mut viewport.grid_spacing);
                }
                16 | 26 | 36 => {
                    pair.apply_to(&mut viewport.view_direction);
                }
                17 | 27 | 37 => {
                    pair.apply_to(&mut viewport.view_target);
                }
                42 => viewport.lens_length = pair.as_double(),
                43 => viewport.front_clip_plane = pair.as_double(),
                44 => viewport.back_clip_plane = pair.as_double(),
                45 => viewport.view_height = pair.as_double(),
                50 => viewport.snap_angle = pair.as_angle(),
                51 => viewport.twist_angle = pair.as_angle(),
                72 => viewport.circle_zoom = pair.as_i16(),
                90 => viewport.flags = ViewportStatusFlags::from_bits_truncate(pair.as_i32()),
                340 => viewport.clip_boundary = pair.as_handle(),
                1 => viewport.style_sheet = r.string(pair),
                281 => viewport.render_mode = pair.as_i16(),
                71 => viewport.ucs_per_viewport = pair.as_bool(),
                74 => viewport.ucs_icon_visible = pair.as_bool(),
                110 | 120 | 130 => {
                    pair.apply_to(&mut viewport.ucs_origin);
                }
                111 | 121 | 131 => {
                    pair.apply_to(&mut viewport.ucs_x_axis);
                }
                112 | 122 | 132 => {
                    pair.apply_to(&mut viewport.ucs_y_axis);
                }
                79 => viewport.ortho_type = pair.as_i16(),
                _ => {}
            }
            Ok(())
        })?;
        viewport.common = common;
        Ok(viewport.into())
    }
}

/// Text points are stored in the object coordinate system
fn to_world(text: &mut TextProperties) {
    text.insertion_point = object_to_world(text.insertion_point, text.normal);
    if let Some(point) = text.alignment_point.as_mut() {
        *point = object_to_world(*point, text.normal);
    }
}

#[cfg(test)]
mod tests {
    use super::super::DxfReader;
    use crate::document::CadDocument;
    use crate::entities::*;
    use crate::io::dxf::{DxfWriter, DxfWriterConfiguration};
    use crate::objects::ImageDefinition;
    use crate::tables::BlockRecord;
    use crate::types::{Color, DrawingUnits, Handle, ImageUnits, Vector2, Vector3};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, PI};
    use std::io::Cursor;

    fn round_trip(doc: &CadDocument) -> CadDocument {
        let buf = DxfWriter::new(doc).write_to_vec().unwrap();
        DxfReader::from_reader(Cursor::new(buf)).unwrap().read().unwrap()
    }

    fn binary_round_trip(doc: &CadDocument) -> CadDocument {
        let buf = DxfWriter::new(doc)
            .with_configuration(DxfWriterConfiguration {
                binary: true,
                ..Default::default()
            })
            .write_to_vec()
            .unwrap();
        DxfReader::from_reader(Cursor::new(buf)).unwrap().read().unwrap()
    }

    fn only(doc: &CadDocument) -> &EntityType {
        let mut entities = doc.model_space_entities();
        let entity = entities.next().expect("no entity in model space");
        assert!(entities.next().is_none());
        entity
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_line_keeps_handle_and_layer() {
        let mut doc = CadDocument::new();
        let mut line = Line::from_points(Vector3::new(0.0, 0.0, 0.0), Vector3::new(10.0, 5.0, 1.0));
        line.common.layer = "0".to_string();
        let handle = doc.add_entity(line.clone());

        let read = round_trip(&doc);
        let EntityType::Line(read_line) = only(&read) else {
            panic!("expected a line");
        };
        assert_eq!(read_line.common.handle, handle);
        assert_eq!(read_line.start, line.start);
        assert_eq!(read_line.end, line.end);
    }

    #[test]
    fn test_circle_with_extrusion_comes_back_in_world_coordinates() {
        let mut doc = CadDocument::new();
        let normal = Vector3::new(0.0, 1.0, 1.0).normalize();
        let center = Vector3::new(3.0, -2.0, 7.0);
        doc.add_entity(Circle::from_center_radius(center, 2.5).with_normal(normal));

        let read = round_trip(&doc);
        let EntityType::Circle(circle) = only(&read) else {
            panic!("expected a circle");
        };
        assert!(circle.center.approx_eq(&center, 1e-9));
        assert!(circle.normal.approx_eq(&normal, 1e-12));
        assert_eq!(circle.radius, 2.5);
    }

    #[test]
    fn test_partial_ellipse_angles() {
        let mut doc = CadDocument::new();
        let ellipse = Ellipse::new(Vector3::new(1.0, 1.0, 0.0), 10.0, 4.0)
            .with_rotation(FRAC_PI_4)
            .with_angles(FRAC_PI_2, PI);
        doc.add_entity(ellipse);

        let read = round_trip(&doc);
        let EntityType::Ellipse(read) = only(&read) else {
            panic!("expected an ellipse");
        };
        assert!(close(read.major_axis, 10.0));
        assert!(close(read.minor_axis, 4.0));
        assert!(close(read.rotation, FRAC_PI_4));
        assert!(close(read.start_angle, FRAC_PI_2));
        assert!(close(read.end_angle, PI));
    }

    #[test]
    fn test_full_ellipse_stays_full() {
        let mut doc = CadDocument::new();
        doc.add_entity(Ellipse::new(Vector3::ZERO, 6.0, 3.0));
        let read = round_trip(&doc);
        let EntityType::Ellipse(read) = only(&read) else {
            panic!("expected an ellipse");
        };
        assert!(read.is_full());
    }

    #[test]
    fn test_polylines_and_meshes() {
        let mut doc = CadDocument::new();
        let square = [
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];
        doc.add_entity(Polyline2D::from_points(square, true));
        doc.add_entity(Polyline3D::from_points([Vector3::ZERO, Vector3::new(1.0, 2.0, 3.0)]));
        doc.add_entity(PolyfaceMesh::from_parts(
            [Vector3::ZERO, Vector3::UNIT_X, Vector3::UNIT_Y],
            vec![PolyfaceFace::triangle(1, 2, 3)],
        ));
        doc.add_entity(LwPolyline::from_points(square, true));

        for read in [round_trip(&doc), binary_round_trip(&doc)] {
            let entities: Vec<_> = read.model_space_entities().collect();
            assert_eq!(entities.len(), 4);
            for (read, written) in entities.iter().zip(doc.model_space_entities()) {
                match (read, written) {
                    (EntityType::Polyline2D(a), EntityType::Polyline2D(b)) => {
                        assert_eq!(a.vertices, b.vertices);
                        assert_eq!(a.seqend_handle, b.seqend_handle);
                        assert!(a.is_closed());
                    }
                    (EntityType::Polyline3D(a), EntityType::Polyline3D(b)) => {
                        assert_eq!(a.vertices, b.vertices);
                        assert_eq!(a.is_closed, b.is_closed);
                    }
                    (EntityType::PolyfaceMesh(a), EntityType::PolyfaceMesh(b)) => {
                        assert_eq!(a.vertices, b.vertices);
                        assert_eq!(a.faces, b.faces);
                        assert_eq!(a.seqend_handle, b.seqend_handle);
                    }
                    (EntityType::LwPolyline(a), EntityType::LwPolyline(b)) => {
                        assert_eq!(a.vertices, b.vertices);
                        assert!(a.is_closed);
                    }
                    (a, b) => panic!("{} read back as {}", b.dxf_name(), a.dxf_name()),
                }
            }
        }
    }

    #[test]
    fn test_long_mtext_is_joined() {
        let mut doc = CadDocument::new();
        let value = "0123456789".repeat(60);
        let mut mtext = MText::with_value(value.clone(), Vector3::new(1.0, 2.0, 0.0));
        mtext.rotation = FRAC_PI_2;
        doc.add_entity(mtext);

        let read = round_trip(&doc);
        let EntityType::MText(read) = only(&read) else {
            panic!("expected mtext");
        };
        assert_eq!(read.value, value);
        assert!(close(read.rotation, FRAC_PI_2));
    }

    #[test]
    fn test_insert_with_attributes_and_unit_scale() {
        let mut doc = CadDocument::new();
        doc.header.insertion_units = DrawingUnits::Millimeters;
        doc.add_block(BlockRecord::new("Door").with_units(DrawingUnits::Meters))
            .unwrap();
        doc.add_entity_to_block("Door", AttributeDefinition::new("NO", "Number", "1"))
            .unwrap();
        let insert = Insert::new("Door", Vector3::new(5.0, 5.0, 0.0))
            .with_uniform_scale(2.0)
            .with_attribute(Attribute::new("NO", "42").at(Vector3::new(5.0, 6.0, 0.0)));
        let handle = doc.add_entity(insert);

        let read = round_trip(&doc);
        let Some(EntityType::Insert(insert)) = read.entity(handle) else {
            panic!("insert missing");
        };
        assert!(close(insert.x_scale, 2.0));
        assert!(close(insert.z_scale, 2.0));
        assert_eq!(insert.attributes.len(), 1);
        assert_eq!(insert.attribute("NO").map(|a| a.value()), Some("42"));
        assert_eq!(insert.attributes[0].common.owner, handle);
        assert!(!insert.seqend_handle.is_null());

        let definitions: Vec<_> = read.entities_in("Door").collect();
        assert!(matches!(definitions.as_slice(), [EntityType::AttributeDefinition(_)]));
    }

    #[test]
    fn test_text_alignment_point() {
        let mut doc = CadDocument::new();
        let text = Text::with_value("Hello", Vector3::new(1.0, 1.0, 0.0)).with_alignment(
            TextHorizontalAlignment::Center,
            TextVerticalAlignment::Middle,
            Vector3::new(4.0, 1.0, 0.0),
        );
        doc.add_entity(text.clone());

        let read = round_trip(&doc);
        let EntityType::Text(read) = only(&read) else {
            panic!("expected text");
        };
        assert_eq!(read.properties, text.properties);
    }

    #[test]
    fn test_leader_vertices_and_flags() {
        let mut doc = CadDocument::new();
        let mut leader = Leader::from_vertices(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 2.0, 0.0),
            Vector3::new(4.0, 2.0, 0.5),
        ]);
        leader.path_type = LeaderPathType::Spline;
        leader.creation_type = LeaderCreationType::WithText;
        leader.hookline_direction = HooklineDirection::Same;
        leader.hookline_enabled = true;
        leader.text_height = 2.5;
        leader.text_width = 10.0;
        leader.override_color = Color::from_index(3);
        leader.annotation_handle = Handle::new(0x3A);
        doc.add_entity(leader.clone());

        for read in [round_trip(&doc), binary_round_trip(&doc)] {
            let EntityType::Leader(read) = only(&read) else {
                panic!("expected a leader");
            };
            let mut expected = leader.clone();
            expected.common = read.common.clone();
            assert_eq!(read, &expected);
        }
    }

    #[test]
    fn test_tolerance_frame() {
        let mut doc = CadDocument::new();
        let mut tolerance = Tolerance::new("{\\Fgdt;j}%%v0.05", Vector3::new(3.0, 4.0, 0.0));
        tolerance.direction = Vector3::new(0.0, 1.0, 0.0);
        doc.add_entity(tolerance.clone());

        let read = round_trip(&doc);
        let EntityType::Tolerance(read) = only(&read) else {
            panic!("expected a tolerance");
        };
        assert_eq!(read.text, tolerance.text);
        assert_eq!(read.insertion_point, tolerance.insertion_point);
        assert_eq!(read.direction, tolerance.direction);
        assert_eq!(read.dimension_style, "Standard");
    }

    #[test]
    fn test_mline_back_in_its_plane() {
        let mut doc = CadDocument::new();
        let points = [
            Vector2::new(0.0, 0.0),
            Vector2::new(10.0, 0.0),
            Vector2::new(10.0, 5.0),
        ];
        let mut mline = MLine::from_points(&points, &[0.5, -0.5], false);
        mline.elevation = 2.0;
        mline.normal = Vector3::new(0.0, -1.0, 1.0).normalize();
        mline.scale = 2.0;
        doc.add_entity(mline.clone());

        let read = round_trip(&doc);
        let EntityType::MLine(read) = only(&read) else {
            panic!("expected a multiline");
        };
        assert_eq!(read.style_name, "Standard");
        assert!(!read.style_handle.is_null());
        assert_eq!(read.scale, 2.0);
        assert_eq!(read.flags, mline.flags);
        assert!(close(read.elevation, 2.0));
        assert_eq!(read.vertices.len(), 3);
        for (read, written) in read.vertices.iter().zip(&mline.vertices) {
            assert!(close(read.position.x, written.position.x));
            assert!(close(read.position.y, written.position.y));
            assert!(close(read.direction.x, written.direction.x));
            assert!(close(read.miter.y, written.miter.y));
            assert_eq!(read.segments, written.segments);
        }
    }

    #[test]
    fn test_raster_image_size_and_rotation() {
        let mut doc = CadDocument::new();
        let definition = doc.add_image_definition(ImageDefinition::new("site.png", 400.0, 200.0));
        let mut image = RasterImage::new(definition, Vector3::new(5.0, 5.0, 0.0), 40.0, 20.0)
            .with_rotation(FRAC_PI_3);
        image.brightness = 70;
        image.clip_vertices = vec![Vector2::new(10.0, 10.0), Vector2::new(100.0, 80.0)];
        let handle = doc.add_entity(image);

        let read = round_trip(&doc);
        let Some(EntityType::RasterImage(read)) = read.entity(handle) else {
            panic!("image missing");
        };
        assert_eq!(read.definition, definition);
        assert!(!read.definition_reactor.is_null());
        assert!(close(read.width, 40.0));
        assert!(close(read.height, 20.0));
        assert!(close(read.rotation, FRAC_PI_3));
        assert!(read.normal.approx_eq(&Vector3::UNIT_Z, 1e-12));
        assert_eq!(read.brightness, 70);
        assert_eq!(read.clip_vertices.len(), 2);
    }

    #[test]
    fn test_raster_image_units_are_undone() {
        let mut doc = CadDocument::new();
        doc.header.insertion_units = DrawingUnits::Millimeters;
        let definition = doc.add_image_definition(ImageDefinition::new("plan.png", 100.0, 100.0));
        doc.raster_variables_mut().unwrap().units = ImageUnits::Meters;
        let handle = doc.add_entity(RasterImage::new(definition, Vector3::ZERO, 2.0, 1.0));

        let read = round_trip(&doc);
        let Some(EntityType::RasterImage(read)) = read.entity(handle) else {
            panic!("image missing");
        };
        assert!(close(read.width, 2.0), "width {}", read.width);
        assert!(close(read.height, 1.0));
        assert!(read.clip_vertices.is_empty());
    }

    #[test]
    fn test_unknown_entities_are_kept() {
        let text = "  0\nSECTION\n  2\nENTITIES\n  0\nHELIX\n  5\n2A\n  8\nSprings\n 40\n1.0\n  0\nHELIX\n  5\n2B\n  0\nENDSEC\n  0\nEOF\n";
        let doc = DxfReader::from_reader(Cursor::new(text.as_bytes().to_vec()))
            .unwrap()
            .read()
            .unwrap();
        let unknown: Vec<_> = doc
            .entities()
            .filter_map(|e| match e {
                EntityType::Unknown(u) => Some(u),
                _ => None,
            })
            .collect();
        assert_eq!(unknown.len(), 2);
        assert_eq!(unknown[0].dxf_name, "HELIX");
        assert_eq!(unknown[0].common.layer, "Springs");
        assert_eq!(
            doc.notifications
                .of_type(crate::notification::NotificationType::NotImplemented)
                .len(),
            1
        );
    }
}
