//! Parameter validation
//!
//! Every rule is checked independently and all violations are reported
//! together, in a fixed order, so the joined message is stable.

use serde::{Deserialize, Serialize};

use crate::calc::Calculator;
use crate::core::config::ValidationLimits;
use crate::core::params::{DrillingParameters, JobOptions};

/// Loosely-typed parameter bag as supplied by an adapter.
///
/// The four drilling parameters are required; an absent one is treated as 0
/// and fails its "greater than 0" rule. `number_of_features` and
/// `grinding_frequency` default to valid values when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterBag {
    pub drill_size: Option<f64>,
    pub length_to_drill: Option<f64>,
    pub rpm: Option<f64>,
    pub feed_rate: Option<f64>,
    pub number_of_features: Option<i64>,
    pub grinding_frequency: Option<i64>,
}

impl ParameterBag {
    pub fn from_job(params: &DrillingParameters, options: &JobOptions) -> Self {
        Self {
            drill_size: Some(params.drill_size),
            length_to_drill: Some(params.length_to_drill),
            rpm: Some(params.rpm),
            feed_rate: Some(params.feed_rate),
            number_of_features: Some(i64::from(options.number_of_features)),
            grinding_frequency: Some(i64::from(options.grinding_frequency)),
        }
    }
}

/// Outcome of validating a [`ParameterBag`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// All messages joined with `"; "`, empty when valid
    pub error_message: String,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            error_message: errors.join("; "),
            errors,
        }
    }
}

/// Check a parameter bag against the given limits
pub fn validate_parameters(bag: &ParameterBag, limits: &ValidationLimits) -> ValidationResult {
    let mut errors = Vec::new();

    check_required(
        &mut errors,
        bag.drill_size,
        limits.max_drill_size,
        "Drill size must be greater than 0",
        format!("Drill size exceeds maximum supported size ({}mm)", limits.max_drill_size),
    );
    check_required(
        &mut errors,
        bag.length_to_drill,
        limits.max_length_to_drill,
        "Length to drill must be greater than 0",
        format!(
            "Length to drill exceeds maximum supported length ({}mm)",
            limits.max_length_to_drill
        ),
    );
    check_required(
        &mut errors,
        bag.rpm,
        limits.max_rpm,
        "RPM must be greater than 0",
        format!("RPM exceeds maximum supported value ({})", limits.max_rpm),
    );
    check_required(
        &mut errors,
        bag.feed_rate,
        limits.max_feed_rate,
        "Feed rate must be greater than 0",
        format!(
            "Feed rate exceeds maximum supported value ({} mm/min)",
            limits.max_feed_rate
        ),
    );

    if let Some(n) = bag.number_of_features {
        if n <= 0 {
            errors.push("Number of features must be greater than 0".to_string());
        } else if n > limits.max_number_of_features {
            errors.push(format!(
                "Number of features exceeds maximum supported value ({})",
                limits.max_number_of_features
            ));
        }
    }

    if let Some(freq) = bag.grinding_frequency {
        if freq <= 0 {
            errors.push("Grinding frequency must be greater than 0".to_string());
        }
    }

    ValidationResult::from_errors(errors)
}

fn check_required(
    errors: &mut Vec<String>,
    value: Option<f64>,
    max: f64,
    not_positive: &str,
    too_large: String,
) {
    let value = value.unwrap_or(0.0);
    if value.is_nan() || value <= 0.0 {
        errors.push(not_positive.to_string());
    } else if value > max {
        errors.push(too_large);
    }
}

impl Calculator {
    /// Validate against this calculator's configured limits
    pub fn validate(&self, bag: &ParameterBag) -> ValidationResult {
        validate_parameters(bag, &self.config().limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(d: f64, l: f64, rpm: f64, f: f64, n: Option<i64>) -> ParameterBag {
        ParameterBag {
            drill_size: Some(d),
            length_to_drill: Some(l),
            rpm: Some(rpm),
            feed_rate: Some(f),
            number_of_features: n,
            grinding_frequency: None,
        }
    }

    fn check(bag: &ParameterBag) -> ValidationResult {
        validate_parameters(bag, &ValidationLimits::default())
    }

    #[test]
    fn test_maximum_values_are_valid() {
        let result = check(&bag(50.0, 1000.0, 10000.0, 1000.0, Some(100)));
        assert!(result.is_valid);
        assert_eq!(result.error_message, "");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_drill_size_boundary() {
        assert!(check(&bag(50.0, 100.0, 1800.0, 80.0, None)).is_valid);

        let result = check(&bag(50.01, 100.0, 1800.0, 80.0, None));
        assert!(!result.is_valid);
        assert!(result.error_message.contains("exceeds maximum supported size"));
        assert_eq!(
            result.error_message,
            "Drill size exceeds maximum supported size (50mm)"
        );
    }

    #[test]
    fn test_all_violations_reported_in_order() {
        let result = check(&bag(0.0, 1001.0, -1.0, 1000.5, Some(0)));
        assert_eq!(
            result.error_message,
            "Drill size must be greater than 0; \
             Length to drill exceeds maximum supported length (1000mm); \
             RPM must be greater than 0; \
             Feed rate exceeds maximum supported value (1000 mm/min); \
             Number of features must be greater than 0"
        );
        assert_eq!(result.errors.len(), 5);
    }

    #[test]
    fn test_missing_required_parameters() {
        let result = check(&ParameterBag {
            number_of_features: Some(101),
            ..ParameterBag::default()
        });
        assert_eq!(
            result.error_message,
            "Drill size must be greater than 0; \
             Length to drill must be greater than 0; \
             RPM must be greater than 0; \
             Feed rate must be greater than 0; \
             Number of features exceeds maximum supported value (100)"
        );
    }

    #[test]
    fn test_absent_feature_count_is_valid() {
        assert!(check(&bag(10.0, 100.0, 1800.0, 80.0, None)).is_valid);
    }

    #[test]
    fn test_nan_fails_positive_rule() {
        let result = check(&bag(f64::NAN, 100.0, 1800.0, 80.0, None));
        assert_eq!(result.errors, vec!["Drill size must be greater than 0"]);
    }

    #[test]
    fn test_grinding_frequency_rule_comes_last() {
        let mut b = bag(10.0, 100.0, 0.0, 80.0, None);
        b.grinding_frequency = Some(0);
        assert_eq!(
            check(&b).error_message,
            "RPM must be greater than 0; Grinding frequency must be greater than 0"
        );
    }

    #[test]
    fn test_limits_come_from_config() {
        let limits = ValidationLimits {
            max_drill_size: 60.0,
            max_rpm: 12000.5,
            ..ValidationLimits::default()
        };
        let result = validate_parameters(&bag(55.0, 100.0, 13000.0, 80.0, None), &limits);
        assert_eq!(
            result.error_message,
            "RPM exceeds maximum supported value (12000.5)"
        );
    }

    #[test]
    fn test_from_job() {
        let params = DrillingParameters::new(10.0, 100.0, 1800.0, 80.0, "steel");
        let bag = ParameterBag::from_job(&params, &JobOptions::default());
        assert_eq!(bag.number_of_features, Some(1));
        assert_eq!(bag.grinding_frequency, Some(10));
        assert!(Calculator::default().validate(&bag).is_valid);
    }
}
