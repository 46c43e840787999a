use serde::{Deserialize, Serialize};

pub const DPI: f64 = 96.0;
pub const CM_PER_INCH: f64 = 2.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "px")]
    Pixel,
    #[serde(rename = "in")]
    Inch,
    #[serde(rename = "cm")]
    Centimeter,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Pixel, Unit::Inch, Unit::Centimeter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Pixel => "Pixels (px)",
            Unit::Inch => "Inches (in)",
            Unit::Centimeter => "Centimeters (cm)",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Pixel => "px",
            Unit::Inch => "in",
            Unit::Centimeter => "cm",
        }
    }

    fn to_pixels(&self, value: f64) -> f64 {
        match self {
            Unit::Pixel => value,
            Unit::Inch => value * DPI,
            Unit::Centimeter => (value / CM_PER_INCH) * DPI,
        }
    }

    fn from_pixels(&self, pixels: f64) -> f64 {
        match self {
            Unit::Pixel => pixels,
            Unit::Inch => pixels / DPI,
            Unit::Centimeter => (pixels / DPI) * CM_PER_INCH,
        }
    }
}

/// Converts `value` from one unit to another by way of pixels at [`DPI`].
///
/// Same-unit conversions return `value` untouched. NaN handling is left to
/// the caller.
pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    if from == to {
        return value;
    }
    to.from_pixels(from.to_pixels(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
    Bmp,
    Gif,
    Tiff,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Webp,
        OutputFormat::Bmp,
        OutputFormat::Gif,
        OutputFormat::Tiff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Webp => "WEBP",
            OutputFormat::Bmp => "BMP",
            OutputFormat::Gif => "GIF",
            OutputFormat::Tiff => "TIFF",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Gif => "gif",
            OutputFormat::Tiff => "tiff",
        }
    }

    /// Lossy formats are the only ones where `quality` changes the output.
    pub fn uses_quality(&self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::Webp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `None` for a degenerate image.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_inch_is_ninety_six_pixels() {
        assert_eq!(convert(1.0, Unit::Inch, Unit::Pixel), 96.0);
        assert_eq!(convert(96.0, Unit::Pixel, Unit::Inch), 1.0);
    }

    #[test]
    fn centimeters_convert_via_inches() {
        assert!((convert(2.54, Unit::Centimeter, Unit::Pixel) - 96.0).abs() < 1e-9);
        assert!((convert(1.0, Unit::Inch, Unit::Centimeter) - 2.54).abs() < 1e-9);
    }

    #[test]
    fn identity_returns_nan_unchanged() {
        assert!(convert(f64::NAN, Unit::Inch, Unit::Inch).is_nan());
    }

    #[test]
    fn zero_height_has_no_ratio() {
        assert_eq!(Dimensions::new(10, 0).aspect_ratio(), None);
        assert_eq!(Dimensions::new(400, 200).aspect_ratio(), Some(2.0));
    }

    #[test]
    fn units_use_form_symbols_in_toml() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            unit: Unit,
            format: OutputFormat,
        }
        let parsed: Wrapper = toml::from_str("unit = \"cm\"\nformat = \"WEBP\"").unwrap();
        assert_eq!(parsed.unit, Unit::Centimeter);
        assert_eq!(parsed.format, OutputFormat::Webp);
    }

    fn unit() -> impl Strategy<Value = Unit> {
        prop_oneof![Just(Unit::Pixel), Just(Unit::Inch), Just(Unit::Centimeter)]
    }

    proptest! {
        #[test]
        fn same_unit_is_exact(v in proptest::num::f64::ANY, u in unit()) {
            let out = convert(v, u, u);
            prop_assert!(out == v || (out.is_nan() && v.is_nan()));
        }

        #[test]
        fn inch_pixel_round_trip(v in -1.0e6f64..1.0e6) {
            let back = convert(convert(v, Unit::Inch, Unit::Pixel), Unit::Pixel, Unit::Inch);
            prop_assert!((back - v).abs() <= 1e-9 * v.abs().max(1.0));
        }

        #[test]
        fn any_pair_round_trips(v in -1.0e6f64..1.0e6, a in unit(), b in unit()) {
            let back = convert(convert(v, a, b), b, a);
            prop_assert!((back - v).abs() <= 1e-9 * v.abs().max(1.0));
        }
    }
}
