//! Unit conversion utilities.
//!
//! DrawingML positions and sizes are integer EMUs (English Metric Units);
//! run font sizes are hundredths of a point.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;

/// Inches to EMUs, rounded to the nearest unit.
#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn emu_to_inches(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_INCH as f64
}

#[inline]
pub fn pt_to_emu(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64).round() as i64
}

/// Points to the centipoint value used by `sz` and `spcPts` attributes.
#[inline]
pub fn pt_to_centipoints(pt: f64) -> i64 {
    (pt * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_conversions() {
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(inches_to_emu(0.2), 182_880);
        assert_eq!(inches_to_emu(-0.5), -457_200);
        assert!((emu_to_inches(12_192_000) - 13.333).abs() < 0.001);
    }

    #[test]
    fn test_point_conversions() {
        assert_eq!(pt_to_emu(1.0), 12_700);
        assert_eq!(pt_to_centipoints(36.0), 3600);
        assert_eq!(pt_to_centipoints(5.0), 500);
    }
}
