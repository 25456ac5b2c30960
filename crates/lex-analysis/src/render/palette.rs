//! Diverging color scale for correlation values.

use plotters::style::RGBColor;

const COLD: (u8, u8, u8) = (59, 76, 192);
const NEUTRAL: (u8, u8, u8) = (221, 221, 221);
const WARM: (u8, u8, u8) = (180, 4, 38);

/// Cells without a defined correlation.
pub(crate) const UNDEFINED: RGBColor = RGBColor(160, 160, 160);

/// Blue through light gray to red over `[-1, 1]`.
pub(crate) fn diverging(value: f64) -> RGBColor {
    if value.is_nan() {
        return UNDEFINED;
    }
    let t = (value.clamp(-1.0, 1.0) + 1.0) / 2.0;
    let (from, to, fraction) = if t < 0.5 {
        (COLD, NEUTRAL, t * 2.0)
    } else {
        (NEUTRAL, WARM, (t - 0.5) * 2.0)
    };
    RGBColor(
        lerp(from.0, to.0, fraction),
        lerp(from.1, to.1, fraction),
        lerp(from.2, to.2, fraction),
    )
}

/// Whether a cell of this value needs light text to stay readable.
pub(crate) fn needs_light_text(value: f64) -> bool {
    value.abs() > 0.6
}

fn lerp(from: u8, to: u8, fraction: f64) -> u8 {
    let value = from as f64 + (to as f64 - from as f64) * fraction;
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diverging_endpoints() {
        assert_eq!(diverging(-1.0), RGBColor(59, 76, 192));
        assert_eq!(diverging(0.0), RGBColor(221, 221, 221));
        assert_eq!(diverging(1.0), RGBColor(180, 4, 38));
    }

    #[test]
    fn test_diverging_clamps_out_of_range() {
        assert_eq!(diverging(-3.0), diverging(-1.0));
        assert_eq!(diverging(2.5), diverging(1.0));
    }

    #[test]
    fn test_diverging_nan_is_undefined() {
        assert_eq!(diverging(f64::NAN), UNDEFINED);
    }

    #[test]
    fn test_light_text_for_strong_values() {
        assert!(needs_light_text(0.99));
        assert!(needs_light_text(-0.8));
        assert!(!needs_light_text(0.1));
        assert!(!needs_light_text(f64::NAN));
    }
}
