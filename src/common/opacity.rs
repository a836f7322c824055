use std::fmt;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Layer opacity, always within `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Opacity(f64);

impl Opacity {
    pub const OPAQUE: Self = Self(1.0);
    pub const TRANSPARENT: Self = Self(0.0);

    /// Starting value of every overlay group's slider.
    pub const OVERLAY_DEFAULT: Self = Self(0.7);

    /// Clamp `value` into range; NaN (a non-numeric slider reading) yields `fallback`.
    pub fn new(value: f64, fallback: Opacity) -> Self {
        // `+ 0.0` turns -0.0 into 0.0 so the readout never shows "-0.0".
        if value.is_nan() { fallback } else { Self(value.clamp(0.0, 1.0) + 0.0) }
    }

    /// Parse raw slider text. Anything that is not a number yields `fallback`.
    pub fn parse(input: &str, fallback: Opacity) -> Self {
        input.trim().parse::<f64>()
            .map(|value| Self::new(value, fallback))
            .unwrap_or(fallback)
    }

    #[inline] pub fn value(self) -> f64 { self.0 }

    /// Value shown next to a slider, rounded to one decimal.
    pub fn display(self) -> String { self.to_string() }
}

impl Default for Opacity {
    fn default() -> Self { Self::OPAQUE }
}

impl fmt::Display for Opacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl TryFrom<f64> for Opacity {
    type Error = anyhow::Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&value) {
            bail!("opacity {value} is outside [0, 1]");
        }
        Ok(Self(value + 0.0))
    }
}

impl From<Opacity> for f64 {
    fn from(opacity: Opacity) -> f64 { opacity.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_numeric_input() {
        assert_eq!(Opacity::new(1.7, Opacity::OPAQUE).value(), 1.0);
        assert_eq!(Opacity::new(-0.2, Opacity::OPAQUE).value(), 0.0);
        assert_eq!(Opacity::new(0.35, Opacity::OPAQUE).value(), 0.35);
        assert_eq!(Opacity::new(f64::INFINITY, Opacity::TRANSPARENT).value(), 1.0);
    }

    #[test]
    fn nan_falls_back() {
        assert_eq!(Opacity::new(f64::NAN, Opacity::OVERLAY_DEFAULT), Opacity::OVERLAY_DEFAULT);
        assert_eq!(Opacity::new(f64::NAN, Opacity::OPAQUE), Opacity::OPAQUE);
    }

    #[test]
    fn parses_slider_text() {
        assert_eq!(Opacity::parse("0.4", Opacity::OPAQUE).value(), 0.4);
        assert_eq!(Opacity::parse(" 0 ", Opacity::OPAQUE).value(), 0.0);
        assert_eq!(Opacity::parse("", Opacity::OPAQUE), Opacity::OPAQUE);
        assert_eq!(Opacity::parse("abc", Opacity::OVERLAY_DEFAULT), Opacity::OVERLAY_DEFAULT);
        assert_eq!(Opacity::parse("NaN", Opacity::OVERLAY_DEFAULT), Opacity::OVERLAY_DEFAULT);
        assert_eq!(Opacity::parse("3", Opacity::OPAQUE).value(), 1.0);
    }

    #[test]
    fn displays_one_decimal_in_range() {
        for raw in ["-4", "-0", "-0.0", "0.04", "0.05", "0.449", "0.96", "12", "", "x"] {
            let shown = Opacity::parse(raw, Opacity::OVERLAY_DEFAULT).display();
            let parsed: f64 = shown.parse().unwrap();
            assert!((0.0..=1.0).contains(&parsed), "{raw} -> {shown}");
            assert_eq!(shown.split('.').nth(1).map(str::len), Some(1), "{raw} -> {shown}");
        }
        assert_eq!(Opacity::OVERLAY_DEFAULT.display(), "0.7");
        assert_eq!(Opacity::new(-0.0, Opacity::OPAQUE).display(), "0.0");
        assert_eq!(Opacity::parse("-0", Opacity::OVERLAY_DEFAULT).display(), "0.0");
        assert_eq!(Opacity::new(-0.0, Opacity::OPAQUE).to_string(), "0.0");
    }

    #[test]
    fn deserializing_rejects_out_of_range() {
        assert_eq!(serde_json::from_str::<Opacity>("0.5").unwrap().value(), 0.5);
        assert!(serde_json::from_str::<Opacity>("1.5").is_err());
        assert_eq!(serde_json::from_str::<Opacity>("-0.0").unwrap().display(), "0.0");
    }
}
