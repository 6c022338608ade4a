//! Number formatting for the status line.

use glam::Vec3;

/// Formats `x` with `digits` significant digits, like C's `%g`.
///
/// Fixed notation is used when the decimal exponent lies in `[-5, digits)`,
/// scientific notation otherwise. Trailing zeros are removed in both cases.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn format_significant(x: f32, digits: usize) -> String {
    let digits = digits.max(1);
    if x == 0.0 {
        return "0".to_string();
    }
    if !x.is_finite() {
        return format!("{x}");
    }

    // Round first: 9.9996 at four digits has exponent 1, not 0.
    let sci = format!("{:.*e}", digits - 1, x);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -5 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            strip_trailing_zeros(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{x:.decimals$}")).to_string()
    }
}

/// Formats the three components separated by single spaces.
#[must_use]
pub fn format_vec3(v: Vec3, digits: usize) -> String {
    format!(
        "{} {} {}",
        format_significant(v.x, digits),
        format_significant(v.y, digits),
        format_significant(v.z, digits)
    )
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_notation() {
        assert_eq!(format_significant(1.0, 4), "1");
        assert_eq!(format_significant(0.5, 4), "0.5");
        assert_eq!(format_significant(1.23456, 4), "1.235");
        assert_eq!(format_significant(-12.5, 4), "-12.5");
        assert_eq!(format_significant(1234.0, 4), "1234");
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(format_significant(12346.0, 4), "1.235e+04");
        assert_eq!(format_significant(0.000_001_5, 4), "1.5e-06");
    }

    #[test]
    fn test_rounding_bumps_exponent() {
        assert_eq!(format_significant(9.99996, 4), "10");
    }

    #[test]
    fn test_zero() {
        assert_eq!(format_significant(0.0, 4), "0");
        assert_eq!(format_significant(-0.0, 4), "0");
    }

    #[test]
    fn test_format_vec3() {
        assert_eq!(format_vec3(Vec3::new(0.0, -1.5, 2.0), 4), "0 -1.5 2");
    }
}
