//! Entity encoders

use super::section_writer::SectionWriter;
use super::stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
use crate::entities::*;
use crate::error::{DxfError, Result};
use crate::objects::ObjectType;
use crate::types::units::conversion_factor;
use crate::types::{object_to_world, world_to_object, DxfVersion, Handle, Vector2, Vector3};
use std::f64::consts::TAU;

/// Longest MText piece written under one group code
const MTEXT_CHUNK: usize = 250;

impl<'a, W: DxfStreamWriter> SectionWriter<'a, W> {
    /// Write one entity with its extended data and sub-entities
    pub fn write_entity(&mut self, entity: &EntityType) -> Result<()> {
        self.state.require_entity_context()?;
        self.trace_entity(entity);

        match entity {
            EntityType::Point(point) => self.write_point(point)?,
            EntityType::Line(line) => self.write_line(line)?,
            EntityType::Ray(ray) => self.write_ray(ray)?,
            EntityType::XLine(xline) => self.write_xline(xline)?,
            EntityType::Circle(circle) => self.write_circle(circle)?,
            EntityType::Arc(arc) => self.write_arc(arc)?,
            EntityType::Ellipse(ellipse) => self.write_ellipse(ellipse)?,
            EntityType::LwPolyline(polyline) => self.write_lwpolyline(polyline)?,
            EntityType::Polyline2D(polyline) => self.write_polyline_2d(polyline)?,
            EntityType::Polyline3D(polyline) => self.write_polyline_3d(polyline)?,
            EntityType::PolyfaceMesh(mesh) => self.write_polyface_mesh(mesh)?,
            EntityType::Text(text) => self.write_text(text)?,
            EntityType::MText(mtext) => self.write_mtext(mtext)?,
            EntityType::AttributeDefinition(attdef) => self.write_attribute_definition(attdef)?,
            EntityType::Spline(spline) => self.write_spline(spline)?,
            EntityType::Hatch(hatch) => self.write_hatch(hatch)?,
            EntityType::Dimension(dimension) => self.write_dimension(dimension)?,
            EntityType::Insert(insert) => self.write_insert(insert)?,
            EntityType::Solid(solid) => self.write_solid(solid)?,
            EntityType::Face3D(face) => self.write_face3d(face)?,
            EntityType::Leader(leader) => self.write_leader(leader)?,
            EntityType::Tolerance(tolerance) => self.write_tolerance(tolerance)?,
            EntityType::MLine(mline) => self.write_mline(mline)?,
            EntityType::Viewport(viewport) => self.write_viewport(viewport)?,
            EntityType::RasterImage(image) => self.write_raster_image(image)?,
            EntityType::Unknown(unknown) => {
                return Err(DxfError::UnsupportedEntity(unknown.dxf_name.clone()));
            }
        }

        self.write_xdata(&entity.common().extended_data)?;

        match entity {
            EntityType::Polyline2D(polyline) => self.write_vertices_2d(polyline),
            EntityType::Polyline3D(polyline) => self.write_vertices_3d(polyline),
            EntityType::PolyfaceMesh(mesh) => self.write_polyface_records(mesh),
            EntityType::Insert(insert) => self.write_attributes(insert),
            _ => Ok(()),
        }
    }

    // ─── Common data ───

    pub(super) fn write_entity_header(&mut self, name: &str, common: &EntityCommon) -> Result<()> {
        let paper = self.is_paper_space(common.owner);
        self.write_entity_header_with(name, common, common.owner, paper)
    }

    fn write_entity_header_with(
        &mut self,
        name: &str,
        common: &EntityCommon,
        owner: Handle,
        paper: bool,
    ) -> Result<()> {
        self.writer.write_string(0, name)?;
        self.writer.write_handle(5, common.handle)?;
        self.write_reactors(&common.reactors)?;
        self.writer.write_handle(330, owner)?;
        self.writer.write_subclass("AcDbEntity")?;
        if paper {
            self.writer.write_i16(67, 1)?;
        }
        self.write_str(8, &common.layer)?;
        self.writer.write_color(62, common.color)?;
        if let Some(true_color) = common.color.true_color() {
            self.writer.write_i32(420, true_color)?;
        }
        if !common.transparency.is_by_layer() {
            self.writer.write_i32(440, common.transparency.to_alpha_value())?;
        }
        self.write_str(6, &common.line_type)?;
        self.writer.write_i16(370, common.line_weight.value())?;
        self.writer.write_double(48, common.line_type_scale)?;
        self.writer.write_flag(60, common.invisible)
    }

    /// Header of a VERTEX written under its polyline
    fn write_vertex_header(
        &mut self,
        handle: Handle,
        parent: &EntityCommon,
        with_line_type: bool,
    ) -> Result<()> {
        self.writer.write_string(0, "VERTEX")?;
        self.writer.write_handle(5, handle)?;
        self.writer.write_handle(330, parent.handle)?;
        self.writer.write_subclass("AcDbEntity")?;
        if self.is_paper_space(parent.owner) {
            self.writer.write_i16(67, 1)?;
        }
        self.write_str(8, &parent.layer)?;
        self.writer.write_color(62, parent.color)?;
        if with_line_type {
            self.write_str(6, &parent.line_type)?;
        }
        self.writer.write_subclass("AcDbVertex")
    }

    fn write_seqend(&mut self, handle: Handle, parent: &EntityCommon) -> Result<()> {
        self.writer.write_string(0, "SEQEND")?;
        self.writer.write_handle(5, handle)?;
        self.writer.write_handle(330, parent.handle)?;
        self.writer.write_subclass("AcDbEntity")?;
        self.write_str(8, &parent.layer)
    }

    // ─── Curves ───

    fn write_point(&mut self, point: &Point) -> Result<()> {
        self.write_entity_header("POINT", &point.common)?;
        self.writer.write_subclass("AcDbPoint")?;
        self.writer.write_point3d(10, point.location)?;
        self.writer.write_double(39, point.thickness)?;
        self.writer.write_normal(point.normal)?;
        self.writer.write_angle(50, point.rotation)
    }

    fn write_line(&mut self, line: &Line) -> Result<()> {
        self.write_entity_header("LINE", &line.common)?;
        self.writer.write_subclass("AcDbLine")?;
        self.writer.write_double(39, line.thickness)?;
        self.writer.write_point3d(10, line.start)?;
        self.writer.write_point3d(11, line.end)?;
        self.writer.write_normal(line.normal)
    }

    fn write_ray(&mut self, ray: &Ray) -> Result<()> {
        self.write_entity_header("RAY", &ray.common)?;
        self.writer.write_subclass("AcDbRay")?;
        self.writer.write_point3d(10, ray.base_point)?;
        self.writer.write_point3d(11, ray.direction)
    }

    fn write_xline(&mut self, xline: &XLine) -> Result<()> {
        self.write_entity_header("XLINE", &xline.common)?;
        self.writer.write_subclass("AcDbXline")?;
        self.writer.write_point3d(10, xline.base_point)?;
        self.writer.write_point3d(11, xline.direction)
    }

    fn write_circle_body(
        &mut self,
        center: Vector3,
        radius: f64,
        thickness: f64,
        normal: Vector3,
    ) -> Result<()> {
        self.writer.write_subclass("AcDbCircle")?;
        self.writer.write_point3d(10, world_to_object(center, normal))?;
        self.writer.write_double(40, radius)?;
        self.writer.write_double(39, thickness)?;
        self.writer.write_normal(normal)
    }

    fn write_circle(&mut self, circle: &Circle) -> Result<()> {
        self.write_entity_header("CIRCLE", &circle.common)?;
        self.write_circle_body(circle.center, circle.radius, circle.thickness, circle.normal)
    }

    fn write_arc(&mut self, arc: &Arc) -> Result<()> {
        self.write_entity_header("ARC", &arc.common)?;
        self.write_circle_body(arc.center, arc.radius, arc.thickness, arc.normal)?;
        self.writer.write_subclass("AcDbArc")?;
        self.writer.write_angle(50, arc.start_angle)?;
        self.writer.write_angle(51, arc.end_angle)
    }

    fn write_ellipse(&mut self, ellipse: &Ellipse) -> Result<()> {
        self.write_entity_header("ELLIPSE", &ellipse.common)?;
        self.writer.write_subclass("AcDbEllipse")?;
        self.writer.write_point3d(10, ellipse.center)?;
        let major = Vector2::new(ellipse.major_axis * 0.5, 0.0).rotate(ellipse.rotation);
        self.writer
            .write_point3d(11, object_to_world(major.with_z(0.0), ellipse.normal))?;
        self.writer.write_normal(ellipse.normal)?;
        self.writer.write_double(40, ellipse.ratio())?;
        let (start, end) = if ellipse.is_full() {
            (0.0, TAU)
        } else {
            (
                ellipse.parameter_at(ellipse.start_angle),
                ellipse.parameter_at(ellipse.end_angle),
            )
        };
        self.writer.write_double(41, start)?;
        self.writer.write_double(42, end)
    }

    fn write_spline(&mut self, spline: &Spline) -> Result<()> {
        self.write_entity_header("SPLINE", &spline.common)?;
        self.writer.write_subclass("AcDbSpline")?;
        self.writer.write_normal(spline.normal)?;
        self.writer.write_i16(70, spline.flags.bits())?;
        self.writer.write_i16(71, spline.degree)?;
        self.writer.write_i16(72, spline.knots.len() as i16)?;
        self.writer.write_i16(73, spline.control_points.len() as i16)?;
        self.writer.write_i16(74, spline.fit_points.len() as i16)?;
        self.writer.write_double(42, spline.knot_tolerance)?;
        self.writer.write_double(43, spline.control_point_tolerance)?;
        self.writer.write_double(44, spline.fit_tolerance)?;
        if let Some(tangent) = spline.start_tangent {
            self.writer.write_point3d(12, tangent)?;
        }
        if let Some(tangent) = spline.end_tangent {
            self.writer.write_point3d(13, tangent)?;
        }
        for knot in &spline.knots {
            self.writer.write_double(40, *knot)?;
        }
        if spline.is_rational() {
            for weight in &spline.weights {
                self.writer.write_double(41, *weight)?;
            }
        }
        for point in &spline.control_points {
            self.writer.write_point3d(10, *point)?;
        }
        for point in &spline.fit_points {
            self.writer.write_point3d(11, *point)?;
        }
        Ok(())
    }

    // ─── Polylines ───

    fn write_lwpolyline(&mut self, polyline: &LwPolyline) -> Result<()> {
        self.write_entity_header("LWPOLYLINE", &polyline.common)?;
        self.writer.write_subclass("AcDbPolyline")?;
        self.writer.write_i32(90, polyline.vertices.len() as i32)?;
        self.writer.write_i16(70, polyline.flags())?;
        self.writer.write_double(43, polyline.constant_width)?;
        self.writer.write_double(38, polyline.elevation)?;
        self.writer.write_double(39, polyline.thickness)?;
        for vertex in &polyline.vertices {
            self.writer.write_point2d(10, vertex.location)?;
            self.writer.write_double(40, vertex.start_width)?;
            self.writer.write_double(41, vertex.end_width)?;
            self.writer.write_double(42, vertex.bulge)?;
        }
        self.writer.write_normal(polyline.normal)
    }

    fn write_polyline_2d(&mut self, polyline: &Polyline2D) -> Result<()> {
        self.write_entity_header("POLYLINE", &polyline.common)?;
        self.writer.write_subclass("AcDb2dPolyline")?;
        self.writer.write_i16(66, 1)?;
        self.writer
            .write_point3d(10, Vector3::new(0.0, 0.0, polyline.elevation))?;
        self.writer.write_double(39, polyline.thickness)?;
        self.writer.write_i16(70, polyline.flags.bits())?;
        self.writer.write_double(40, polyline.start_width)?;
        self.writer.write_double(41, polyline.end_width)?;
        self.writer.write_normal(polyline.normal)
    }

    fn write_vertices_2d(&mut self, polyline: &Polyline2D) -> Result<()> {
        for vertex in &polyline.vertices {
            self.write_vertex_header(vertex.handle, &polyline.common, true)?;
            self.writer.write_subclass("AcDb2dVertex")?;
            self.writer.write_point3d(10, vertex.location.with_z(0.0))?;
            self.writer.write_double(40, vertex.start_width)?;
            self.writer.write_double(41, vertex.end_width)?;
            self.writer.write_double(42, vertex.bulge)?;
            self.writer.write_i16(70, vertex.flags.bits())?;
        }
        self.write_seqend(polyline.seqend_handle, &polyline.common)
    }

    fn write_polyline_3d(&mut self, polyline: &Polyline3D) -> Result<()> {
        self.write_entity_header("POLYLINE", &polyline.common)?;
        self.writer.write_subclass("AcDb3dPolyline")?;
        self.writer.write_i16(66, 1)?;
        self.writer.write_point3d(10, Vector3::ZERO)?;
        self.writer.write_i16(70, polyline.flags())
    }

    fn write_vertices_3d(&mut self, polyline: &Polyline3D) -> Result<()> {
        for vertex in &polyline.vertices {
            self.write_vertex_header(vertex.handle, &polyline.common, false)?;
            self.writer.write_subclass("AcDb3dPolylineVertex")?;
            self.writer.write_point3d(10, vertex.location)?;
            self.writer.write_i16(70, 32)?;
        }
        self.write_seqend(polyline.seqend_handle, &polyline.common)
    }

    fn write_polyface_mesh(&mut self, mesh: &PolyfaceMesh) -> Result<()> {
        self.write_entity_header("POLYLINE", &mesh.common)?;
        self.writer.write_subclass("AcDbPolyFaceMesh")?;
        self.writer.write_i16(66, 1)?;
        self.writer.write_point3d(10, Vector3::ZERO)?;
        self.writer.write_i16(70, 64)?;
        self.writer.write_i16(71, mesh.vertices.len() as i16)?;
        self.writer.write_i16(72, mesh.faces.len() as i16)
    }

    fn write_polyface_records(&mut self, mesh: &PolyfaceMesh) -> Result<()> {
        for vertex in &mesh.vertices {
            self.write_vertex_header(vertex.handle, &mesh.common, false)?;
            self.writer.write_subclass("AcDbPolyFaceMeshVertex")?;
            self.writer.write_point3d(10, vertex.location)?;
            self.writer.write_i16(70, 192)?;
        }
        for face in &mesh.faces {
            self.write_vertex_header(face.handle, &mesh.common, false)?;
            self.writer.write_subclass("AcDbFaceRecord")?;
            self.writer.write_point3d(10, Vector3::ZERO)?;
            self.writer.write_i16(70, 128)?;
            for (code, index) in (71..).zip(face.indices) {
                if code == 74 && index == 0 {
                    continue;
                }
                self.writer.write_i16(code, index)?;
            }
        }
        self.write_seqend(mesh.seqend_handle, &mesh.common)
    }

    // ─── Text ───

    /// First `AcDbText` block, shared by TEXT, ATTDEF and ATTRIB
    fn write_text_properties(&mut self, text: &TextProperties) -> Result<()> {
        self.writer.write_subclass("AcDbText")?;
        self.writer
            .write_point3d(10, world_to_object(text.insertion_point, text.normal))?;
        if text.thickness != 0.0 {
            self.writer.write_double(39, text.thickness)?;
        }
        self.writer.write_double(40, text.height)?;
        self.write_str(1, &text.value)?;
        self.writer.write_angle(50, text.rotation)?;
        self.writer.write_double(41, text.width_factor)?;
        self.writer.write_angle(51, text.oblique_angle)?;
        self.write_str(7, &text.style)?;
        self.writer.write_i16(71, text.mirror.bits())?;
        self.writer.write_i16(72, text.horizontal_alignment as i16)?;
        if let Some(alignment) = text.alignment_point {
            self.writer
                .write_point3d(11, world_to_object(alignment, text.normal))?;
        }
        self.writer.write_normal(text.normal)
    }

    fn write_text(&mut self, text: &Text) -> Result<()> {
        self.write_entity_header("TEXT", &text.common)?;
        self.write_text_properties(&text.properties)?;
        self.writer.write_subclass("AcDbText")?;
        self.writer
            .write_i16(73, text.properties.vertical_alignment as i16)
    }

    fn write_attribute_fields(
        &mut self,
        tag: &str,
        flags: &AttributeFlags,
        field_length: i16,
        properties: &TextProperties,
        lock_position: bool,
    ) -> Result<()> {
        self.write_str(2, tag)?;
        self.writer.write_i16(70, flags.to_bits())?;
        self.writer.write_i16(73, field_length)?;
        self.writer
            .write_i16(74, properties.vertical_alignment as i16)?;
        if self.version >= DxfVersion::AC1018 {
            self.writer.write_byte(280, lock_position as u8)?;
        }
        Ok(())
    }

    fn write_attribute_definition(&mut self, attdef: &AttributeDefinition) -> Result<()> {
        self.write_entity_header("ATTDEF", &attdef.common)?;
        self.write_text_properties(&attdef.properties)?;
        self.writer.write_subclass("AcDbAttributeDefinition")?;
        self.write_attribute_fields(
            &attdef.tag,
            &attdef.flags,
            attdef.field_length,
            &attdef.properties,
            attdef.lock_position,
        )?;
        self.write_str(3, &attdef.prompt)
    }

    fn write_attributes(&mut self, insert: &Insert) -> Result<()> {
        if insert.attributes.is_empty() {
            return Ok(());
        }
        let paper = self.is_paper_space(insert.common.owner);
        for attribute in &insert.attributes {
            self.write_entity_header_with(
                "ATTRIB",
                &attribute.common,
                insert.common.handle,
                paper,
            )?;
            self.write_text_properties(&attribute.properties)?;
            self.writer.write_subclass("AcDbAttribute")?;
            self.write_attribute_fields(
                &attribute.tag,
                &attribute.flags,
                attribute.field_length,
                &attribute.properties,
                attribute.lock_position,
            )?;
            self.write_xdata(&attribute.common.extended_data)?;
        }
        self.write_seqend(insert.seqend_handle, &insert.common)
    }

    fn write_mtext(&mut self, mtext: &MText) -> Result<()> {
        self.write_entity_header("MTEXT", &mtext.common)?;
        self.writer.write_subclass("AcDbMText")?;
        self.writer.write_point3d(10, mtext.insertion_point)?;
        self.writer.write_normal(mtext.normal)?;
        self.writer.write_double(40, mtext.height)?;
        self.writer.write_double(41, mtext.rectangle_width)?;
        self.writer.write_double(44, mtext.line_spacing_factor)?;
        self.writer.write_i16(73, mtext.line_spacing_style)?;
        self.writer.write_i16(71, mtext.attachment_point as i16)?;
        self.writer.write_i16(72, mtext.drawing_direction as i16)?;

        // Chunk sizes count the escaped text
        let encoded = self.encoder.encode(&mtext.value).into_owned();
        let chunks = split_chunks(&encoded, MTEXT_CHUNK);
        if let Some((last, rest)) = chunks.split_last() {
            for chunk in rest {
                self.writer.write_string(3, chunk)?;
            }
            self.writer.write_string(1, last)?;
        }

        self.write_str(7, &mtext.style)?;
        let (sin, cos) = mtext.rotation.sin_cos();
        self.writer
            .write_point3d(11, object_to_world(Vector3::new(cos, sin, 0.0), mtext.normal))
    }

    // ─── Blocks ───

    fn write_insert(&mut self, insert: &Insert) -> Result<()> {
        let document = self.document;
        let block = document
            .block_records
            .get(&insert.block_name)
            .ok_or_else(|| DxfError::missing("block", &insert.block_name))?;
        let factor = conversion_factor(block.units, self.owner_units(insert.common.owner));

        self.write_entity_header("INSERT", &insert.common)?;
        self.writer.write_subclass("AcDbBlockReference")?;
        if !insert.attributes.is_empty() {
            self.writer.write_i16(66, 1)?;
        }
        self.write_str(2, &insert.block_name)?;
        self.writer
            .write_point3d(10, world_to_object(insert.insert_point, insert.normal))?;
        self.writer.write_double(41, insert.x_scale * factor)?;
        self.writer.write_double(42, insert.y_scale * factor)?;
        self.writer.write_double(43, insert.z_scale * factor)?;
        self.writer.write_angle(50, insert.rotation)?;
        self.writer.write_i16(70, insert.column_count)?;
        self.writer.write_i16(71, insert.row_count)?;
        self.writer.write_double(44, insert.column_spacing)?;
        self.writer.write_double(45, insert.row_spacing)?;
        self.writer.write_normal(insert.normal)
    }

    // ─── Planar ───

    fn write_solid(&mut self, solid: &Solid) -> Result<()> {
        self.write_entity_header("SOLID", &solid.common)?;
        self.writer.write_subclass("AcDbTrace")?;
        self.writer.write_point3d(10, solid.first_corner)?;
        self.writer.write_point3d(11, solid.second_corner)?;
        self.writer.write_point3d(12, solid.third_corner)?;
        self.writer.write_point3d(13, solid.fourth_corner)?;
        self.writer.write_double(39, solid.thickness)?;
        self.writer.write_normal(solid.normal)
    }

    fn write_face3d(&mut self, face: &Face3D) -> Result<()> {
        self.write_entity_header("3DFACE", &face.common)?;
        self.writer.write_subclass("AcDbFace")?;
        self.writer.write_point3d(10, face.first_corner)?;
        self.writer.write_point3d(11, face.second_corner)?;
        self.writer.write_point3d(12, face.third_corner)?;
        self.writer.write_point3d(13, face.fourth_corner)?;
        self.writer.write_i16(70, face.invisible_edges.bits())
    }

    // ─── Annotation ───

    fn write_leader(&mut self, leader: &Leader) -> Result<()> {
        self.write_entity_header("LEADER", &leader.common)?;
        self.writer.write_subclass("AcDbLeader")?;
        self.write_str(3, &leader.dimension_style)?;
        self.writer.write_flag(71, leader.arrow_enabled)?;
        self.writer.write_i16(72, leader.path_type as i16)?;
        self.writer.write_i16(73, leader.creation_type as i16)?;
        self.writer.write_i16(74, leader.hookline_direction as i16)?;
        self.writer.write_flag(75, leader.hookline_enabled)?;
        self.writer.write_double(40, leader.text_height)?;
        self.writer.write_double(41, leader.text_width)?;
        self.writer.write_i16(76, leader.vertices.len() as i16)?;
        for vertex in &leader.vertices {
            self.writer.write_point3d(10, *vertex)?;
        }
        self.writer.write_color(77, leader.override_color)?;
        self.writer.write_handle(340, leader.annotation_handle)?;
        self.writer.write_normal(leader.normal)
    }

    fn write_tolerance(&mut self, tolerance: &Tolerance) -> Result<()> {
        self.write_entity_header("TOLERANCE", &tolerance.common)?;
        self.writer.write_subclass("AcDbFcf")?;
        self.write_str(3, &tolerance.dimension_style)?;
        self.writer.write_point3d(10, tolerance.insertion_point)?;
        self.write_str(1, &tolerance.text)?;
        self.writer.write_normal(tolerance.normal)?;
        self.writer.write_point3d(11, tolerance.direction)
    }

    fn write_mline(&mut self, mline: &MLine) -> Result<()> {
        let document = self.document;
        let style = document
            .mline_style(&mline.style_name)
            .ok_or_else(|| DxfError::missing("multiline style", &mline.style_name))?;

        self.write_entity_header("MLINE", &mline.common)?;
        self.writer.write_subclass("AcDbMline")?;
        self.write_str(2, &mline.style_name)?;
        self.writer.write_handle(340, style.handle)?;
        self.writer.write_double(40, mline.scale)?;
        self.writer.write_i16(70, mline.justification as i16)?;
        self.writer.write_i16(71, mline.flags.bits())?;
        self.writer.write_i16(72, mline.vertices.len() as i16)?;
        self.writer.write_i16(73, style.elements.len() as i16)?;

        let normal = mline.normal;
        let to_world = |p: Vector2, z: f64| object_to_world(p.with_z(z), normal);
        let start = mline
            .vertices
            .first()
            .map(|v| v.position)
            .unwrap_or(Vector2::ZERO);
        self.writer
            .write_point3d(10, to_world(start, mline.elevation))?;
        self.writer.write_normal(normal)?;

        for vertex in &mline.vertices {
            self.writer
                .write_point3d(11, to_world(vertex.position, mline.elevation))?;
            self.writer.write_point3d(12, to_world(vertex.direction, 0.0))?;
            self.writer.write_point3d(13, to_world(vertex.miter, 0.0))?;
            for segment in &vertex.segments {
                self.writer.write_i16(74, segment.parameters.len() as i16)?;
                for parameter in &segment.parameters {
                    self.writer.write_double(41, *parameter)?;
                }
                self.writer
                    .write_i16(75, segment.area_fill_parameters.len() as i16)?;
                for parameter in &segment.area_fill_parameters {
                    self.writer.write_double(42, *parameter)?;
                }
            }
        }
        Ok(())
    }

    // ─── Paper space and images ───

    fn write_viewport(&mut self, viewport: &Viewport) -> Result<()> {
        self.write_entity_header("VIEWPORT", &viewport.common)?;
        self.writer.write_subclass("AcDbViewport")?;
        self.writer.write_point3d(10, viewport.center)?;
        self.writer.write_double(40, viewport.width)?;
        self.writer.write_double(41, viewport.height)?;
        self.writer.write_i16(68, viewport.status)?;
        self.writer.write_i16(69, viewport.id)?;
        self.writer.write_point2d(12, viewport.view_center)?;
        self.writer.write_point2d(13, viewport.snap_base)?;
        self.writer.write_point2d(14, viewport.snap_spacing)?;
        self.writer.write_point2d(15, viewport.grid_spacing)?;
        self.writer.write_point3d(16, viewport.view_direction)?;
        self.writer.write_point3d(17, viewport.view_target)?;
        self.writer.write_double(42, viewport.lens_length)?;
        self.writer.write_double(43, viewport.front_clip_plane)?;
        self.writer.write_double(44, viewport.back_clip_plane)?;
        self.writer.write_double(45, viewport.view_height)?;
        self.writer.write_angle(50, viewport.snap_angle)?;
        self.writer.write_angle(51, viewport.twist_angle)?;
        self.writer.write_i16(72, viewport.circle_zoom)?;
        self.writer.write_i32(90, viewport.flags.bits())?;
        if !viewport.clip_boundary.is_null() {
            self.writer.write_handle(340, viewport.clip_boundary)?;
        }
        self.write_str(1, &viewport.style_sheet)?;
        self.writer.write_byte(281, viewport.render_mode as u8)?;
        self.writer.write_flag(71, viewport.ucs_per_viewport)?;
        self.writer.write_flag(74, viewport.ucs_icon_visible)?;
        if self.version >= DxfVersion::AC1018 {
            self.writer.write_point3d(110, viewport.ucs_origin)?;
            self.writer.write_point3d(111, viewport.ucs_x_axis)?;
            self.writer.write_point3d(112, viewport.ucs_y_axis)?;
            self.writer.write_i16(79, viewport.ortho_type)?;
        }
        Ok(())
    }

    fn write_raster_image(&mut self, image: &RasterImage) -> Result<()> {
        let document = self.document;
        let definition = match document.object(image.definition) {
            Some(ObjectType::ImageDefinition(definition)) => definition,
            _ => {
                return Err(DxfError::missing(
                    "image definition",
                    image.definition.to_hex(),
                ))
            }
        };
        let factor = document
            .raster_variables()
            .map(|variables| {
                conversion_factor(
                    variables.units.drawing_units(),
                    document.header.insertion_units,
                )
            })
            .unwrap_or(1.0);
        let pixels = definition.size_in_pixels;
        let u = Vector2::new(image.width / pixels.x, 0.0).rotate(image.rotation);
        let v = Vector2::new(0.0, image.height / pixels.y).rotate(image.rotation);

        self.write_entity_header("IMAGE", &image.common)?;
        self.writer.write_subclass("AcDbRasterImage")?;
        self.writer.write_i32(90, 0)?;
        self.writer.write_point3d(10, image.position)?;
        self.writer
            .write_point3d(11, object_to_world(u.with_z(0.0), image.normal) * factor)?;
        self.writer
            .write_point3d(12, object_to_world(v.with_z(0.0), image.normal) * factor)?;
        self.writer.write_point2d(13, pixels)?;
        self.writer.write_handle(340, image.definition)?;
        self.writer.write_i16(70, image.display_flags.bits())?;
        self.writer.write_byte(280, image.clipping as u8)?;
        self.writer.write_byte(281, image.brightness)?;
        self.writer.write_byte(282, image.contrast)?;
        self.writer.write_byte(283, image.fade)?;
        self.writer.write_handle(360, image.definition_reactor)?;
        self.writer.write_i16(71, image.clip_type as i16)?;
        let boundary = image.clip_boundary(pixels);
        self.writer.write_i32(91, boundary.len() as i32)?;
        for vertex in boundary {
            self.writer.write_point2d(14, vertex)?;
        }
        Ok(())
    }
}

/// Split `text` into pieces of at most `size` characters
fn split_chunks(text: &str, size: usize) -> Vec<&str> {
    if text.is_empty() {
        return vec![""];
    }
    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut rest = text;
    while !rest.is_empty() {
        let end = match rest.char_indices().nth(size) {
            Some((index, _)) => escape_boundary(rest, index),
            None => rest.len(),
        };
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// Move a cut back to the start of a `\U+XXXX` escape it would split
fn escape_boundary(text: &str, cut: usize) -> usize {
    let backslash = text[..cut]
        .char_indices()
        .rev()
        .take(6)
        .find(|(_, c)| *c == '\\')
        .map(|(index, _)| index);
    match backslash {
        Some(start) if start > 0 && text[start..].starts_with("\\U+") => start,
        _ => cut,
    }
}
