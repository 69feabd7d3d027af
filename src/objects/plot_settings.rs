//! Plot settings carried by every layout

/// Plot paper units (group code 72)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotPaperUnits {
    #[default]
    Inches = 0,
    Millimeters = 1,
    Pixels = 2,
}

impl PlotPaperUnits {
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => PlotPaperUnits::Millimeters,
            2 => PlotPaperUnits::Pixels,
            _ => PlotPaperUnits::Inches,
        }
    }

    pub fn to_code(self) -> i16 {
        self as i16
    }
}

/// Plot rotation (group code 73)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotRotation {
    #[default]
    None = 0,
    /// 90 degrees counter-clockwise
    Degrees90 = 1,
    Degrees180 = 2,
    /// 90 degrees clockwise
    Degrees270 = 3,
}

impl PlotRotation {
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => PlotRotation::Degrees90,
            2 => PlotRotation::Degrees180,
            3 => PlotRotation::Degrees270,
            _ => PlotRotation::None,
        }
    }

    pub fn to_code(self) -> i16 {
        self as i16
    }
}

/// Plot layout flags (group code 70)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlotFlags {
    pub plot_viewport_borders: bool,
    pub show_plot_styles: bool,
    pub plot_centered: bool,
    pub plot_hidden: bool,
    pub use_standard_scale: bool,
    pub plot_plot_styles: bool,
    pub scale_lineweights: bool,
    pub print_lineweights: bool,
    pub draw_viewports_first: bool,
    pub model_type: bool,
}

impl PlotFlags {
    /// Create from the raw code 70 value
    pub fn from_bits(bits: i16) -> Self {
        Self {
            plot_viewport_borders: (bits & 1) != 0,
            show_plot_styles: (bits & 2) != 0,
            plot_centered: (bits & 4) != 0,
            plot_hidden: (bits & 8) != 0,
            use_standard_scale: (bits & 16) != 0,
            plot_plot_styles: (bits & 32) != 0,
            scale_lineweights: (bits & 64) != 0,
            print_lineweights: (bits & 128) != 0,
            draw_viewports_first: (bits & 512) != 0,
            model_type: (bits & 1024) != 0,
        }
    }

    /// Convert to the raw code 70 value
    pub fn to_bits(self) -> i16 {
        let mut bits = 0;
        if self.plot_viewport_borders { bits |= 1; }
        if self.show_plot_styles { bits |= 2; }
        if self.plot_centered { bits |= 4; }
        if self.plot_hidden { bits |= 8; }
        if self.use_standard_scale { bits |= 16; }
        if self.plot_plot_styles { bits |= 32; }
        if self.scale_lineweights { bits |= 64; }
        if self.print_lineweights { bits |= 128; }
        if self.draw_viewports_first { bits |= 512; }
        if self.model_type { bits |= 1024; }
        bits
    }
}

/// Unprintable paper margins in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaperMargin {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl PaperMargin {
    pub fn uniform(margin: f64) -> Self {
        Self {
            left: margin,
            bottom: margin,
            right: margin,
            top: margin,
        }
    }
}

/// Plot settings (the `AcDbPlotSettings` subclass of a layout)
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    /// Page setup name
    pub page_name: String,
    /// Printer or plotter configuration file
    pub printer_name: String,
    /// Paper size name
    pub paper_size: String,
    /// Plot view name
    pub plot_view_name: String,
    /// Current style sheet
    pub current_style_sheet: String,
    pub margins: PaperMargin,
    pub paper_width: f64,
    pub paper_height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    /// Plot window lower left corner
    pub window_lower_left: (f64, f64),
    /// Plot window upper right corner
    pub window_upper_right: (f64, f64),
    pub scale_numerator: f64,
    pub scale_denominator: f64,
    pub flags: PlotFlags,
    pub paper_units: PlotPaperUnits,
    pub rotation: PlotRotation,
    /// Factor for the unit conversion of the print scale
    pub print_scale: f64,
    /// Paper image origin
    pub paper_image_origin: (f64, f64),
}

impl PlotSettings {
    pub fn new(page_name: impl Into<String>) -> Self {
        Self {
            page_name: page_name.into(),
            printer_name: "none_device".to_string(),
            paper_size: "ISO_A4_(210.00_x_297.00_MM)".to_string(),
            plot_view_name: String::new(),
            current_style_sheet: String::new(),
            margins: PaperMargin::uniform(7.5),
            paper_width: 210.0,
            paper_height: 297.0,
            origin_x: 0.0,
            origin_y: 0.0,
            window_lower_left: (0.0, 0.0),
            window_upper_right: (0.0, 0.0),
            scale_numerator: 1.0,
            scale_denominator: 1.0,
            flags: PlotFlags {
                use_standard_scale: true,
                print_lineweights: true,
                ..PlotFlags::default()
            },
            paper_units: PlotPaperUnits::Millimeters,
            rotation: PlotRotation::None,
            print_scale: 1.0,
            paper_image_origin: (0.0, 0.0),
        }
    }

    /// Plot scale as a single factor
    pub fn scale_factor(&self) -> f64 {
        if self.scale_denominator == 0.0 {
            1.0
        } else {
            self.scale_numerator / self.scale_denominator
        }
    }
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self::new("")
    }
}
