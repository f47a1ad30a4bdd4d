//! Unit conversion at the legacy-data boundary
//!
//! Legacy spreadsheet values are recorded in inches; the calculator works in
//! millimetres.

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Convert a length in inches to millimetres
pub fn inches_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

/// Convert a feed rate in in/min to mm/min
pub fn ipm_to_mm_per_min(inches_per_minute: f64) -> f64 {
    inches_per_minute * MM_PER_INCH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_mm() {
        assert_eq!(inches_to_mm(5.0), 127.0);
        assert_eq!(inches_to_mm(10.0), 254.0);
        assert_eq!(ipm_to_mm_per_min(0.8), 0.8 * 25.4);
    }
}
