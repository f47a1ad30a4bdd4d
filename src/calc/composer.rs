//! Aggregate standard-time composer

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calc::validator::ParameterBag;
use crate::calc::Calculator;
use crate::core::error::CalcError;
use crate::core::params::{DrillingParameters, JobOptions};
use crate::formula::{names, round_to, FormulaId, Inputs};

/// Time breakdown for a complete drilling job (minutes, 2 decimals)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    pub cutting_time_per_feature: f64,
    pub total_cutting_time: f64,
    pub setup_time: f64,
    pub grinding_time_per_feature: f64,
    pub total_grinding_time: f64,
    pub inspection_time: f64,
    pub tool_wear_factor_applied: bool,
    pub tool_wear_additional_time: f64,
    pub total_standard_time: f64,
    pub number_of_features: u32,
}

impl Calculator {
    /// Compose the four leaf estimates into a job breakdown.
    ///
    /// Tool wear is applied to the combined per-feature figure before it is
    /// multiplied by the feature count; inspection enters the per-feature
    /// figure as its per-feature share and is then added once more as an
    /// aggregate. Inputs are not range-checked here; see
    /// [`Calculator::checked_standard_time`].
    pub fn standard_time(
        &self,
        params: &DrillingParameters,
        options: &JobOptions,
    ) -> Result<TimeBreakdown, CalcError> {
        let cutting = self.cutting_time(params)?;
        let setup = self.setup_time(
            params.drill_size,
            &params.material_grade,
            params.length_to_drill,
            options.custom_setup_time,
        )?;
        let grinding = self.grinding_time(
            params.drill_size,
            params.length_to_drill,
            options.grinding_frequency,
            options.custom_grinding_time,
        )?;
        let inspection = self.inspection_time(
            params.length_to_drill,
            options.wall_thickness_inspection,
            options.number_of_features,
        )?;

        let mut inputs = Inputs::new()
            .with(names::CUTTING_TIME, cutting)
            .with(names::SETUP_TIME, setup)
            .with(names::GRINDING_TIME, grinding)
            .with(names::INSPECTION_TIME, inspection)
            .with(names::NUMBER_OF_FEATURES, options.number_of_features)
            .with(names::TOOL_WEAR_CONSIDERATION, options.tool_wear_consideration);

        let per_feature = self.eval(FormulaId::PerFeatureTime, &inputs)?;
        inputs.set(names::PER_FEATURE_TIME, per_feature);

        let breakdown = TimeBreakdown {
            cutting_time_per_feature: round_to(cutting, 2),
            total_cutting_time: self.eval(FormulaId::TotalCuttingTime, &inputs)?,
            setup_time: round_to(setup, 2),
            grinding_time_per_feature: round_to(grinding, 2),
            total_grinding_time: self.eval(FormulaId::TotalGrindingTime, &inputs)?,
            inspection_time: round_to(inspection, 2),
            tool_wear_factor_applied: options.tool_wear_consideration,
            tool_wear_additional_time: self.eval(FormulaId::ToolWearAdditionalTime, &inputs)?,
            total_standard_time: self.eval(FormulaId::TotalStandardTime, &inputs)?,
            number_of_features: options.number_of_features,
        };

        debug!(
            per_feature,
            total = breakdown.total_standard_time,
            features = options.number_of_features,
            "standard time composed"
        );
        Ok(breakdown)
    }

    /// Validate the inputs, then compose. Every violated constraint is
    /// reported in one [`CalcError::InvalidParameters`].
    pub fn checked_standard_time(
        &self,
        params: &DrillingParameters,
        options: &JobOptions,
    ) -> Result<TimeBreakdown, CalcError> {
        let validation = self.validate(&ParameterBag::from_job(params, options));
        if !validation.is_valid {
            return Err(CalcError::InvalidParameters(validation.error_message));
        }
        self.standard_time(params, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> (DrillingParameters, JobOptions) {
        (
            DrillingParameters::new(10.0, 100.0, 1800.0, 80.0, "Steel"),
            JobOptions {
                number_of_features: 1,
                tool_wear_consideration: true,
                wall_thickness_inspection: true,
                custom_setup_time: None,
                custom_grinding_time: None,
                grinding_frequency: 10,
            },
        )
    }

    fn compose(params: &DrillingParameters, options: &JobOptions) -> TimeBreakdown {
        Calculator::default().standard_time(params, options).unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let (params, options) = baseline();
        let b = compose(&params, &options);

        assert_eq!(
            b,
            TimeBreakdown {
                cutting_time_per_feature: 1.38,
                total_cutting_time: 3.56,
                setup_time: 6.57,
                grinding_time_per_feature: 0.3,
                total_grinding_time: 0.3,
                inspection_time: 1.81,
                tool_wear_factor_applied: true,
                tool_wear_additional_time: 0.07,
                total_standard_time: 11.94,
                number_of_features: 1,
            }
        );
    }

    #[test]
    fn test_multiple_features() {
        let (params, mut options) = baseline();
        options.number_of_features = 2;
        let b = compose(&params, &options);

        assert_eq!(b.cutting_time_per_feature, 1.38);
        assert_eq!(b.total_cutting_time, 7.13);
        assert_eq!(b.total_grinding_time, 0.6);
        assert_eq!(b.inspection_time, 3.63);
        assert_eq!(b.tool_wear_additional_time, 0.14);
        assert_eq!(b.total_standard_time, 17.33);
        assert_eq!(b.number_of_features, 2);
    }

    #[test]
    fn test_without_tool_wear() {
        let (params, mut options) = baseline();
        options.tool_wear_consideration = false;
        let b = compose(&params, &options);

        assert!(!b.tool_wear_factor_applied);
        assert_eq!(b.tool_wear_additional_time, 0.0);
        assert_eq!(b.total_cutting_time, 3.49);
        assert_eq!(b.total_standard_time, 11.87);
    }

    #[test]
    fn test_tool_wear_law() {
        let (params, options) = baseline();
        for features in [1, 2, 7] {
            let with_wear = compose(&params, &JobOptions { number_of_features: features, ..options.clone() });
            let without = compose(
                &params,
                &JobOptions {
                    number_of_features: features,
                    tool_wear_consideration: false,
                    ..options.clone()
                },
            );

            let n = f64::from(features);
            let per_feature_before_wear = with_wear.cutting_time_per_feature
                + with_wear.grinding_time_per_feature
                + with_wear.inspection_time / n;
            let expected = round_to(per_feature_before_wear * 0.02 * n, 2);
            let delta = with_wear.total_standard_time - without.total_standard_time;
            assert!(
                (delta - expected).abs() <= 0.011,
                "features={} delta={} expected={}",
                features,
                delta,
                expected
            );
        }
    }

    #[test]
    fn test_longer_length() {
        let (params, options) = baseline();
        let b = compose(&params.with_length(500.0), &options);

        assert_eq!(b.cutting_time_per_feature, 6.88);
        assert_eq!(b.total_cutting_time, 9.24);
        assert_eq!(b.setup_time, 6.83);
        assert_eq!(b.grinding_time_per_feature, 0.31);
        assert_eq!(b.inspection_time, 1.87);
        assert_eq!(b.tool_wear_additional_time, 0.18);
        assert_eq!(b.total_standard_time, 17.94);
    }

    #[test]
    fn test_hard_materials() {
        let (mut params, options) = baseline();

        params.material_grade = "Stainless Steel".to_string();
        let b = compose(&params, &options);
        assert_eq!(b.cutting_time_per_feature, 2.06);
        assert_eq!(b.total_cutting_time, 4.25);
        assert_eq!(b.total_standard_time, 12.63);

        params.material_grade = "Titanium".to_string();
        let b = compose(&params, &options);
        assert_eq!(b.cutting_time_per_feature, 2.48);
        assert_eq!(b.total_cutting_time, 4.68);
        assert_eq!(b.total_standard_time, 13.06);
    }

    #[test]
    fn test_custom_overrides() {
        let (params, options) = baseline();

        let b = compose(
            &params,
            &JobOptions {
                custom_setup_time: Some(15.0),
                ..options.clone()
            },
        );
        assert_eq!(b.setup_time, 15.0);
        assert_eq!(b.total_standard_time, 20.37);

        let b = compose(
            &params,
            &JobOptions {
                custom_grinding_time: Some(5.0),
                ..options
            },
        );
        assert_eq!(b.grinding_time_per_feature, 5.0);
        assert_eq!(b.total_cutting_time, 8.35);
        assert_eq!(b.tool_wear_additional_time, 0.17);
        assert_eq!(b.total_standard_time, 16.73);
    }

    #[test]
    fn test_three_features_plain() {
        let (params, _) = baseline();
        let options = JobOptions {
            number_of_features: 3,
            tool_wear_consideration: false,
            wall_thickness_inspection: false,
            ..JobOptions::default()
        };
        let b = compose(&params, &options);

        assert_eq!(b.total_cutting_time, 8.06);
        assert_eq!(b.total_grinding_time, 0.9);
        assert_eq!(b.inspection_time, 3.02);
        assert_eq!(b.total_standard_time, 17.65);
    }

    #[test]
    fn test_zero_features_is_a_formula_error() {
        let (params, mut options) = baseline();
        options.number_of_features = 0;
        let err = Calculator::default().standard_time(&params, &options).unwrap_err();
        assert!(matches!(err, CalcError::Formula { formula: "PerFeatureTime", .. }));
    }

    #[test]
    fn test_checked_rejects_invalid_parameters() {
        let (mut params, options) = baseline();
        params.drill_size = 50.01;
        params.feed_rate = 0.0;
        let err = Calculator::default()
            .checked_standard_time(&params, &options)
            .unwrap_err();
        match err {
            CalcError::InvalidParameters(message) => assert_eq!(
                message,
                "Drill size exceeds maximum supported size (50mm); Feed rate must be greater than 0"
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_checked_accepts_valid_parameters() {
        let (params, options) = baseline();
        let calc = Calculator::default();
        assert_eq!(
            calc.checked_standard_time(&params, &options).unwrap(),
            calc.standard_time(&params, &options).unwrap()
        );
    }

    #[test]
    fn test_breakdown_serializes_with_field_names() {
        let (params, options) = baseline();
        let json = serde_json::to_value(compose(&params, &options)).unwrap();
        assert_eq!(json["total_standard_time"], 11.94);
        assert_eq!(json["tool_wear_factor_applied"], true);
        assert_eq!(json["number_of_features"], 1);
    }
}
