//! Drawing units and unit conversion factors
//!
//! `$INSUNITS`, block records and raster variables each name a unit. The
//! writer scales insert and image vectors by the factor between two units.

/// Drawing units as stored in `$INSUNITS` and block records (code 70)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i16)]
pub enum DrawingUnits {
    #[default]
    Unitless = 0,
    Inches = 1,
    Feet = 2,
    Miles = 3,
    Millimeters = 4,
    Centimeters = 5,
    Meters = 6,
    Kilometers = 7,
    Microinches = 8,
    Mils = 9,
    Yards = 10,
    Angstroms = 11,
    Nanometers = 12,
    Microns = 13,
    Decimeters = 14,
    Decameters = 15,
    Hectometers = 16,
    Gigameters = 17,
    AstronomicalUnits = 18,
    LightYears = 19,
    Parsecs = 20,
    USSurveyFeet = 21,
    USSurveyInches = 22,
    USSurveyYards = 23,
    USSurveyMiles = 24,
}

impl DrawingUnits {
    /// Convert from the raw code value; unknown values map to `Unitless`
    pub fn from_i16(value: i16) -> Self {
        use DrawingUnits::*;
        match value {
            1 => Inches,
            2 => Feet,
            3 => Miles,
            4 => Millimeters,
            5 => Centimeters,
            6 => Meters,
            7 => Kilometers,
            8 => Microinches,
            9 => Mils,
            10 => Yards,
            11 => Angstroms,
            12 => Nanometers,
            13 => Microns,
            14 => Decimeters,
            15 => Decameters,
            16 => Hectometers,
            17 => Gigameters,
            18 => AstronomicalUnits,
            19 => LightYears,
            20 => Parsecs,
            21 => USSurveyFeet,
            22 => USSurveyInches,
            23 => USSurveyYards,
            24 => USSurveyMiles,
            _ => Unitless,
        }
    }

    /// Raw code value
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Length of one unit in meters, `None` for unitless
    pub fn meters(self) -> Option<f64> {
        use DrawingUnits::*;
        let m = match self {
            Unitless => return None,
            Inches => 0.0254,
            Feet => 0.3048,
            Miles => 1609.344,
            Millimeters => 0.001,
            Centimeters => 0.01,
            Meters => 1.0,
            Kilometers => 1000.0,
            Microinches => 0.0254e-6,
            Mils => 0.0254e-3,
            Yards => 0.9144,
            Angstroms => 1.0e-10,
            Nanometers => 1.0e-9,
            Microns => 1.0e-6,
            Decimeters => 0.1,
            Decameters => 10.0,
            Hectometers => 100.0,
            Gigameters => 1.0e9,
            AstronomicalUnits => 149_597_870_700.0,
            LightYears => 9_460_730_472_580_800.0,
            Parsecs => 30_856_775_814_913_670.0,
            USSurveyFeet => 1200.0 / 3937.0,
            USSurveyInches => 100.0 / 3937.0,
            USSurveyYards => 3600.0 / 3937.0,
            USSurveyMiles => 6_336_000.0 / 3937.0,
        };
        Some(m)
    }
}

/// Units of raster variables and image definitions (code 72 / 281)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i16)]
pub enum ImageUnits {
    #[default]
    Unitless = 0,
    Millimeters = 1,
    Centimeters = 2,
    Meters = 3,
    Kilometers = 4,
    Inches = 5,
    Feet = 6,
    Yards = 7,
    Miles = 8,
}

impl ImageUnits {
    /// Convert from the raw code value; unknown values map to `Unitless`
    pub fn from_i16(value: i16) -> Self {
        match value {
            1 => ImageUnits::Millimeters,
            2 => ImageUnits::Centimeters,
            3 => ImageUnits::Meters,
            4 => ImageUnits::Kilometers,
            5 => ImageUnits::Inches,
            6 => ImageUnits::Feet,
            7 => ImageUnits::Yards,
            8 => ImageUnits::Miles,
            _ => ImageUnits::Unitless,
        }
    }

    /// Equivalent drawing unit
    pub fn drawing_units(self) -> DrawingUnits {
        match self {
            ImageUnits::Unitless => DrawingUnits::Unitless,
            ImageUnits::Millimeters => DrawingUnits::Millimeters,
            ImageUnits::Centimeters => DrawingUnits::Centimeters,
            ImageUnits::Meters => DrawingUnits::Meters,
            ImageUnits::Kilometers => DrawingUnits::Kilometers,
            ImageUnits::Inches => DrawingUnits::Inches,
            ImageUnits::Feet => DrawingUnits::Feet,
            ImageUnits::Yards => DrawingUnits::Yards,
            ImageUnits::Miles => DrawingUnits::Miles,
        }
    }
}

/// Factor that converts a length in `from` units into `to` units
///
/// Unitless on either side means no conversion.
pub fn conversion_factor(from: DrawingUnits, to: DrawingUnits) -> f64 {
    match (from.meters(), to.meters()) {
        (Some(f), Some(t)) if from != to => f / t,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_millimeters() {
        let factor = conversion_factor(DrawingUnits::Inches, DrawingUnits::Millimeters);
        assert!((factor - 25.4).abs() < 1e-12);
    }

    #[test]
    fn test_same_and_unitless() {
        assert_eq!(conversion_factor(DrawingUnits::Feet, DrawingUnits::Feet), 1.0);
        assert_eq!(conversion_factor(DrawingUnits::Unitless, DrawingUnits::Meters), 1.0);
        assert_eq!(conversion_factor(DrawingUnits::Meters, DrawingUnits::Unitless), 1.0);
    }

    #[test]
    fn test_raw_value_roundtrip() {
        for raw in 0..=24 {
            assert_eq!(DrawingUnits::from_i16(raw).as_i16(), raw);
        }
        assert_eq!(DrawingUnits::from_i16(99), DrawingUnits::Unitless);
    }

    #[test]
    fn test_image_units_mapping() {
        assert_eq!(ImageUnits::Inches.drawing_units(), DrawingUnits::Inches);
        assert_eq!(ImageUnits::from_i16(3), ImageUnits::Meters);
    }
}
