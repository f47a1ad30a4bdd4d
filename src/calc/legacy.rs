//! Side-by-side comparison with legacy spreadsheet rows
//!
//! Legacy rows record sizes in inches, feed in in/min and times as strings
//! such as `12.5 MINS`. Values are converted to millimetres before they
//! reach the calculator.
//!
//! Two sheet layouts are supported: gun-drill rows tabulated at 5" and 10"
//! ([`LegacyRecord`]) and per-operation rows with their own length
//! ([`LegacyOperation`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calc::Calculator;
use crate::core::error::{CalcError, LegacyValueError};
use crate::core::params::{DrillingParameters, JobOptions};
use crate::core::units::{inches_to_mm, ipm_to_mm_per_min};
use crate::formula::round_to;

/// Lengths the legacy sheet tabulates, in inches
pub const SHORT_LENGTH_IN: f64 = 5.0;
pub const LONG_LENGTH_IN: f64 = 10.0;

/// The sheet's grinding column is "every 10 inches"; compared as a regrind
/// every 10 features
pub const LEGACY_GRINDING_FREQUENCY: u32 = 10;

/// One legacy spreadsheet row, already parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyRecord {
    pub material_grade: String,
    /// inches
    pub drill_size: f64,
    pub rpm: f64,
    /// in/min
    pub feed_rate: f64,
    /// Cutting time for 5"
    #[serde(default)]
    pub cutting_time_5in: Option<f64>,
    /// Total time for 10"
    #[serde(default)]
    pub total_time_10in: Option<f64>,
    /// Grinding time for every 10"
    #[serde(default)]
    pub grinding_time: Option<f64>,
    /// Tool setup after grinding
    #[serde(default)]
    pub setup_time: Option<f64>,
    /// Wall thickness inspection time
    #[serde(default)]
    pub inspection_time: Option<f64>,
}

impl LegacyRecord {
    /// Drilling parameters in millimetres for a given length in inches
    pub fn parameters(&self, length_in: f64) -> DrillingParameters {
        DrillingParameters::new(
            inches_to_mm(self.drill_size),
            inches_to_mm(length_in),
            self.rpm,
            ipm_to_mm_per_min(self.feed_rate),
            self.material_grade.clone(),
        )
    }

    /// Job options matching the legacy 10" total.
    ///
    /// One feature with tool wear; wall inspection only when the sheet has an
    /// inspection time; legacy setup and grinding times used as overrides.
    pub fn job_options(&self) -> JobOptions {
        JobOptions {
            number_of_features: 1,
            tool_wear_consideration: true,
            wall_thickness_inspection: self.inspection_time.is_some(),
            custom_setup_time: self.setup_time,
            custom_grinding_time: self.grinding_time,
            grinding_frequency: 1,
        }
    }

    /// `2 × t5 + grind + setup + inspection`, when all four are recorded.
    /// Not rounded.
    pub fn reconstructed_total_10in(&self) -> Option<f64> {
        match (
            self.cutting_time_5in,
            self.grinding_time,
            self.setup_time,
            self.inspection_time,
        ) {
            (Some(t5), Some(grind), Some(setup), Some(insp)) => {
                Some(2.0 * t5 + grind + setup + insp)
            }
            _ => None,
        }
    }
}

/// Legacy values next to calculated ones
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyComparison {
    pub material_grade: String,
    pub drill_size_in: f64,
    pub rpm: f64,
    pub feed_rate_ipm: f64,

    pub legacy_cutting_time_5in: Option<f64>,
    pub calculated_cutting_time_5in: f64,
    pub cutting_time_5in_delta: Option<f64>,
    pub calculated_cutting_time_10in: f64,

    pub legacy_total_time_10in: Option<f64>,
    pub legacy_reconstructed_total_10in: Option<f64>,
    pub calculated_total_time_10in: f64,
    pub total_time_10in_delta: Option<f64>,

    pub legacy_grinding_time: Option<f64>,
    pub calculated_grinding_time: f64,
    pub legacy_setup_time: Option<f64>,
    pub calculated_setup_time: f64,
    pub legacy_inspection_time: Option<f64>,
    pub calculated_inspection_time: f64,
}

/// One row of a per-operation sheet, already parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyOperation {
    pub material_grade: String,
    /// Operation as written, e.g. `DRILL 0.375"`
    pub operation: String,
    /// Drill size in inches, `None` for operations other than drilling
    pub drill_size: Option<f64>,
    /// inches
    pub length: f64,
    pub rpm: f64,
    /// in/min
    pub feed_rate: f64,
    /// Recorded time taken
    #[serde(default)]
    pub time_taken: Option<f64>,
}

impl LegacyOperation {
    /// Build a row, reading the drill size out of the operation text
    pub fn new(
        material_grade: impl Into<String>,
        operation: impl Into<String>,
        length: f64,
        rpm: f64,
        feed_rate: f64,
        time_taken: Option<f64>,
    ) -> Result<Self, LegacyValueError> {
        let operation = operation.into();
        Ok(Self {
            material_grade: material_grade.into(),
            drill_size: parse_drill_operation(&operation)?,
            operation,
            length,
            rpm,
            feed_rate,
            time_taken,
        })
    }

    /// Drilling parameters in millimetres, for drilling operations only
    pub fn parameters(&self) -> Option<DrillingParameters> {
        self.drill_size.map(|drill_size| {
            DrillingParameters::new(
                inches_to_mm(drill_size),
                inches_to_mm(self.length),
                self.rpm,
                ipm_to_mm_per_min(self.feed_rate),
                self.material_grade.clone(),
            )
        })
    }
}

/// Legacy operation time next to the calculated cutting time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationComparison {
    pub material_grade: String,
    pub operation: String,
    pub drill_size_in: Option<f64>,
    pub length_in: f64,
    pub rpm: f64,
    pub feed_rate_ipm: f64,
    pub legacy_time_taken: Option<f64>,
    /// `None` for operations other than drilling
    pub calculated_cutting_time: Option<f64>,
    pub cutting_time_delta: Option<f64>,
}

fn delta(calculated: f64, legacy: Option<f64>) -> Option<f64> {
    legacy.map(|legacy| round_to(calculated - legacy, 2))
}

impl Calculator {
    /// Recompute a legacy row and line the numbers up against it.
    ///
    /// The 10" total uses the legacy setup and grinding times with one
    /// feature per regrind. The component columns are estimated on their
    /// own, grinding at [`LEGACY_GRINDING_FREQUENCY`].
    pub fn compare_legacy(&self, record: &LegacyRecord) -> Result<LegacyComparison, CalcError> {
        let long = record.parameters(LONG_LENGTH_IN);
        let short = self.cutting_time(&long.with_length(inches_to_mm(SHORT_LENGTH_IN)))?;
        let cutting_long = self.cutting_time(&long)?;
        let breakdown = self.standard_time(&long, &record.job_options())?;

        let setup = self.setup_time(
            long.drill_size,
            &long.material_grade,
            long.length_to_drill,
            record.setup_time,
        )?;
        let grinding = self.grinding_time(
            long.drill_size,
            long.length_to_drill,
            LEGACY_GRINDING_FREQUENCY,
            record.grinding_time,
        )?;
        let inspection =
            self.inspection_time(long.length_to_drill, record.inspection_time.is_some(), 1)?;

        debug!(
            material = %record.material_grade,
            total = breakdown.total_standard_time,
            legacy_total = ?record.total_time_10in,
            "legacy row compared"
        );

        Ok(LegacyComparison {
            material_grade: record.material_grade.clone(),
            drill_size_in: record.drill_size,
            rpm: record.rpm,
            feed_rate_ipm: record.feed_rate,
            legacy_cutting_time_5in: record.cutting_time_5in,
            calculated_cutting_time_5in: short,
            cutting_time_5in_delta: delta(short, record.cutting_time_5in),
            calculated_cutting_time_10in: cutting_long,
            legacy_total_time_10in: record.total_time_10in,
            legacy_reconstructed_total_10in: record.reconstructed_total_10in(),
            calculated_total_time_10in: breakdown.total_standard_time,
            total_time_10in_delta: delta(breakdown.total_standard_time, record.total_time_10in),
            legacy_grinding_time: record.grinding_time,
            calculated_grinding_time: grinding,
            legacy_setup_time: record.setup_time,
            calculated_setup_time: setup,
            legacy_inspection_time: record.inspection_time,
            calculated_inspection_time: inspection,
        })
    }

    /// Compare one legacy operation row. Only drilling operations get a
    /// calculated time.
    pub fn compare_operation(
        &self,
        operation: &LegacyOperation,
    ) -> Result<OperationComparison, CalcError> {
        let calculated = operation
            .parameters()
            .map(|params| self.cutting_time(&params))
            .transpose()?;

        debug!(
            material = %operation.material_grade,
            operation = %operation.operation,
            calculated = ?calculated,
            legacy = ?operation.time_taken,
            "legacy operation compared"
        );

        Ok(OperationComparison {
            material_grade: operation.material_grade.clone(),
            operation: operation.operation.clone(),
            drill_size_in: operation.drill_size,
            length_in: operation.length,
            rpm: operation.rpm,
            feed_rate_ipm: operation.feed_rate,
            legacy_time_taken: operation.time_taken,
            calculated_cutting_time: calculated,
            cutting_time_delta: calculated.and_then(|c| delta(c, operation.time_taken)),
        })
    }
}

/// Drill size in inches from an operation such as `DRILL 0.375"`.
/// Operations that are not drilling give `None`.
pub fn parse_drill_operation(raw: &str) -> Result<Option<f64>, LegacyValueError> {
    let upper = raw.to_uppercase();
    if !upper.contains("DRILL") {
        return Ok(None);
    }
    let size = upper.replace("DRILL", "").replace('"', "");
    parse_number("drill size", size.trim(), raw).map(Some)
}

/// Parse an inch value such as `0.299"`
pub fn parse_inches(raw: &str) -> Result<f64, LegacyValueError> {
    parse_number("inch", raw.replace('"', "").trim(), raw)
}

/// Parse a feed rate such as `0.8 IN/MIN`
pub fn parse_feed_rate(raw: &str) -> Result<f64, LegacyValueError> {
    parse_number("feed rate", strip_unit(raw, &["IN/MIN"]), raw)
}

/// Parse a time such as `12.5 MINS` or `3 MIN`. A blank cell is `None`.
pub fn parse_minutes(raw: &str) -> Result<Option<f64>, LegacyValueError> {
    let value = strip_unit(raw, &["MINS", "MIN"]);
    if value.is_empty() {
        return Ok(None);
    }
    parse_number("time", value, raw).map(Some)
}

fn strip_unit<'a>(raw: &'a str, units: &[&str]) -> &'a str {
    let trimmed = raw.trim();
    for unit in units {
        let split = trimmed.len().saturating_sub(unit.len());
        if let (Some(head), Some(tail)) = (trimmed.get(..split), trimmed.get(split..)) {
            if tail.eq_ignore_ascii_case(unit) {
                return head.trim_end();
            }
        }
    }
    trimmed
}

fn parse_number(field: &'static str, value: &str, raw: &str) -> Result<f64, LegacyValueError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LegacyValueError {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LegacyRecord {
        LegacyRecord {
            material_grade: "13CR".to_string(),
            drill_size: 0.299,
            rpm: 1800.0,
            feed_rate: 0.8,
            cutting_time_5in: Some(6.5),
            total_time_10in: Some(30.0),
            grinding_time: Some(7.0),
            setup_time: Some(5.0),
            inspection_time: Some(1.5),
        }
    }

    #[test]
    fn test_parse_inches() {
        assert_eq!(parse_inches("0.299\"").unwrap(), 0.299);
        assert_eq!(parse_inches(" 1.5 ").unwrap(), 1.5);
        assert!(parse_inches("abc\"").is_err());
    }

    #[test]
    fn test_parse_feed_rate() {
        assert_eq!(parse_feed_rate("0.8 IN/MIN").unwrap(), 0.8);
        assert_eq!(parse_feed_rate("1.25 in/min").unwrap(), 1.25);
        assert_eq!(parse_feed_rate("2").unwrap(), 2.0);
        let err = parse_feed_rate("fast").unwrap_err();
        assert_eq!(err.field, "feed rate");
        assert_eq!(err.to_string(), "Invalid legacy feed rate value 'fast'");
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("12.5 MINS").unwrap(), Some(12.5));
        assert_eq!(parse_minutes("3 MIN").unwrap(), Some(3.0));
        assert_eq!(parse_minutes("4.75").unwrap(), Some(4.75));
        assert_eq!(parse_minutes("   ").unwrap(), None);
        assert!(parse_minutes("N/A").is_err());
    }

    #[test]
    fn test_parameters_are_converted_to_mm() {
        let params = record().parameters(LONG_LENGTH_IN);
        assert!((params.drill_size - 7.5946).abs() < 1e-9);
        assert_eq!(params.length_to_drill, 254.0);
        assert!((params.feed_rate - 20.32).abs() < 1e-9);
        assert_eq!(params.rpm, 1800.0);
    }

    #[test]
    fn test_reconstructed_total_needs_all_parts() {
        assert_eq!(record().reconstructed_total_10in(), Some(26.5));

        let uneven = LegacyRecord {
            cutting_time_5in: Some(6.33),
            grinding_time: Some(7.1),
            setup_time: Some(5.2),
            inspection_time: Some(1.45),
            ..record()
        };
        // Raw sum, not rounded to 26.41
        let total = uneven.reconstructed_total_10in().unwrap();
        assert_eq!(total, 2.0 * 6.33 + 7.1 + 5.2 + 1.45);
        assert!((total - 26.41).abs() < 1e-9);

        let partial = LegacyRecord {
            setup_time: None,
            ..record()
        };
        assert_eq!(partial.reconstructed_total_10in(), None);
    }

    #[test]
    fn test_compare_with_legacy_overrides() {
        let cmp = Calculator::default().compare_legacy(&record()).unwrap();

        assert_eq!(cmp.calculated_cutting_time_5in, 6.25);
        assert_eq!(cmp.calculated_cutting_time_10in, 12.5);
        assert_eq!(cmp.cutting_time_5in_delta, Some(-0.25));

        assert_eq!(cmp.calculated_setup_time, 5.0);
        assert_eq!(cmp.calculated_grinding_time, 7.0);
        assert_eq!(cmp.calculated_inspection_time, 1.84);
        assert_eq!(cmp.calculated_total_time_10in, 28.61);
        assert_eq!(cmp.legacy_reconstructed_total_10in, Some(26.5));
        assert_eq!(cmp.total_time_10in_delta, Some(-1.39));
    }

    #[test]
    fn test_compare_without_legacy_times() {
        let bare = LegacyRecord {
            cutting_time_5in: None,
            total_time_10in: None,
            grinding_time: None,
            setup_time: None,
            inspection_time: None,
            ..record()
        };
        let cmp = Calculator::default().compare_legacy(&bare).unwrap();

        assert_eq!(cmp.calculated_setup_time, 5.13);
        // Regrind every 10, unlike the freq=1 total
        assert_eq!(cmp.calculated_grinding_time, 0.25);
        assert_eq!(cmp.calculated_inspection_time, 1.02);
        assert_eq!(cmp.calculated_total_time_10in, 22.52);
        assert_eq!(cmp.cutting_time_5in_delta, None);
        assert_eq!(cmp.total_time_10in_delta, None);
        assert_eq!(cmp.legacy_reconstructed_total_10in, None);
    }

    #[test]
    fn test_compare_keeps_custom_setup_unrounded() {
        let cmp = Calculator::default()
            .compare_legacy(&LegacyRecord {
                setup_time: Some(5.125),
                ..record()
            })
            .unwrap();
        assert_eq!(cmp.calculated_setup_time, 5.125);
        assert_eq!(cmp.calculated_grinding_time, 7.0);
    }

    #[test]
    fn test_compare_known_material() {
        let cmp = Calculator::default()
            .compare_legacy(&LegacyRecord {
                material_grade: "Stainless Steel".to_string(),
                cutting_time_5in: None,
                total_time_10in: None,
                grinding_time: None,
                setup_time: None,
                inspection_time: None,
                ..record()
            })
            .unwrap();
        assert_eq!(cmp.calculated_cutting_time_10in, 18.75);
        assert_eq!(cmp.calculated_setup_time, 6.67);
        assert_eq!(cmp.calculated_total_time_10in, 30.44);
    }

    #[test]
    fn test_parse_drill_operation() {
        assert_eq!(parse_drill_operation("DRILL 0.375\"").unwrap(), Some(0.375));
        assert_eq!(parse_drill_operation("drill .5").unwrap(), Some(0.5));
        assert_eq!(parse_drill_operation("THREAD MILL").unwrap(), None);
        assert_eq!(parse_drill_operation("ROUGH FMJ FARM TOOL").unwrap(), None);
        let err = parse_drill_operation("DRILL & TAP").unwrap_err();
        assert_eq!(err.field, "drill size");
    }

    #[test]
    fn test_compare_drill_operation() {
        let op = LegacyOperation::new("LOW CHROME", "DRILL 0.375\"", 2.0, 1800.0, 0.8, Some(3.0))
            .unwrap();
        let cmp = Calculator::default().compare_operation(&op).unwrap();
        assert_eq!(cmp.drill_size_in, Some(0.375));
        assert_eq!(cmp.calculated_cutting_time, Some(2.75));
        assert_eq!(cmp.cutting_time_delta, Some(-0.25));

        let op = LegacyOperation::new("Steel", "DRILL 0.375\"", 3.5, 1500.0, 1.2, None).unwrap();
        let cmp = Calculator::default().compare_operation(&op).unwrap();
        assert_eq!(cmp.calculated_cutting_time, Some(2.92));
        assert_eq!(cmp.cutting_time_delta, None);
    }

    #[test]
    fn test_non_drill_operation_has_no_calculated_time() {
        let op = LegacyOperation::new("LOW CHROME", "THREAD MILL", 1.0, 900.0, 4.0, Some(2.5))
            .unwrap();
        let cmp = Calculator::default().compare_operation(&op).unwrap();
        assert_eq!(cmp.calculated_cutting_time, None);
        assert_eq!(cmp.cutting_time_delta, None);
        assert_eq!(cmp.legacy_time_taken, Some(2.5));
    }
}
