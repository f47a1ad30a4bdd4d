//! Leaf estimators: cutting, setup, grinding and inspection time

use tracing::debug;

use crate::calc::Calculator;
use crate::core::error::CalcError;
use crate::core::params::DrillingParameters;
use crate::formula::{names, FormulaId, Inputs};

impl Calculator {
    /// Cutting time per feature in minutes, rounded to 2 decimals.
    ///
    /// `feed_rate` and `drill_size` must be non-zero; a zero divisor is
    /// reported as [`CalcError::Formula`].
    pub fn cutting_time(&self, params: &DrillingParameters) -> Result<f64, CalcError> {
        let inputs = Inputs::new()
            .with(names::DRILL_SIZE, params.drill_size)
            .with(names::LENGTH_TO_DRILL, params.length_to_drill)
            .with(names::RPM, params.rpm)
            .with(names::FEED_RATE, params.feed_rate)
            .with(names::MATERIAL_GRADE, params.material_grade.as_str());

        let minutes = self.eval(FormulaId::CuttingTime, &inputs)?;
        debug!(
            material = %params.material_grade,
            known_material = self.config().material_factors.contains(&params.material_grade),
            material_factor = self.config().material_factors.factor(&params.material_grade),
            minutes,
            "cutting time"
        );
        Ok(minutes)
    }

    /// Setup time in minutes. A custom value is returned as given.
    pub fn setup_time(
        &self,
        drill_size: f64,
        material_grade: &str,
        length_to_drill: f64,
        custom_setup_time: Option<f64>,
    ) -> Result<f64, CalcError> {
        let inputs = Inputs::new()
            .with(names::DRILL_SIZE, drill_size)
            .with(names::MATERIAL_GRADE, material_grade)
            .with(names::LENGTH_TO_DRILL, length_to_drill)
            .with(names::CUSTOM_SETUP_TIME, custom_setup_time);

        let minutes = self.eval(FormulaId::SetupTime, &inputs)?;
        debug!(
            hard_material = self.config().is_hard_setup_material(material_grade),
            custom = custom_setup_time.is_some(),
            minutes,
            "setup time"
        );
        Ok(minutes)
    }

    /// Grinding time per feature in minutes. A custom value is returned as
    /// given and is not divided by `grinding_frequency`.
    pub fn grinding_time(
        &self,
        drill_size: f64,
        length_to_drill: f64,
        grinding_frequency: u32,
        custom_grinding_time: Option<f64>,
    ) -> Result<f64, CalcError> {
        let inputs = Inputs::new()
            .with(names::DRILL_SIZE, drill_size)
            .with(names::LENGTH_TO_DRILL, length_to_drill)
            .with(names::GRINDING_FREQUENCY, grinding_frequency)
            .with(names::CUSTOM_GRINDING_TIME, custom_grinding_time);

        let minutes = self.eval(FormulaId::GrindingTime, &inputs)?;
        debug!(grinding_frequency, custom = custom_grinding_time.is_some(), minutes, "grinding time");
        Ok(minutes)
    }

    /// Inspection time in minutes, already aggregated over all features
    pub fn inspection_time(
        &self,
        length_to_drill: f64,
        wall_thickness_inspection: bool,
        number_of_features: u32,
    ) -> Result<f64, CalcError> {
        let inputs = Inputs::new()
            .with(names::LENGTH_TO_DRILL, length_to_drill)
            .with(names::WALL_THICKNESS_INSPECTION, wall_thickness_inspection)
            .with(names::NUMBER_OF_FEATURES, number_of_features);

        let minutes = self.eval(FormulaId::InspectionTime, &inputs)?;
        debug!(wall_thickness_inspection, number_of_features, minutes, "inspection time");
        Ok(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CalculatorConfig;
    use crate::core::material::MaterialFactorTable;
    use crate::formula::FormulaError;

    fn calc() -> Calculator {
        Calculator::default()
    }

    fn cutting(d: f64, l: f64, rpm: f64, f: f64, grade: &str) -> f64 {
        calc()
            .cutting_time(&DrillingParameters::new(d, l, rpm, f, grade))
            .unwrap()
    }

    #[test]
    fn test_cutting_time_reference_values() {
        // rpm ratio ≈ 1.414 → 1.1
        assert_eq!(cutting(10.0, 100.0, 1800.0, 80.0, "Steel"), 1.38);
        // on the optimal band
        assert_eq!(cutting(10.0, 100.0, 1273.0, 80.0, "aluminum"), 1.0);
        // small drill penalty
        assert_eq!(cutting(4.0, 100.0, 3183.0, 80.0, "steel"), 1.38);
        assert_eq!(cutting(25.0, 250.0, 500.0, 100.0, "titanium"), 5.17);
        assert_eq!(cutting(15.0, 100.0, 700.0, 50.0, "brass"), 1.89);
        // far below optimal → 1.25
        assert_eq!(cutting(30.0, 300.0, 100.0, 60.0, "cast iron"), 7.91);
        // ratio ≈ 0.71 → 1.1
        assert_eq!(cutting(10.0, 100.0, 900.0, 80.0, "copper"), 1.17);
        assert_eq!(cutting(8.0, 200.0, 1200.0, 40.0, "STAINLESS STEEL"), 8.25);
    }

    #[test]
    fn test_cutting_time_is_deterministic() {
        let params = DrillingParameters::new(12.7, 254.0, 1500.0, 45.0, "Titanium");
        let first = calc().cutting_time(&params).unwrap();
        let second = calc().cutting_time(&params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_material_matches_steel() {
        assert_eq!(
            cutting(10.0, 100.0, 1800.0, 80.0, "unobtainium"),
            cutting(10.0, 100.0, 1800.0, 80.0, "steel")
        );
    }

    #[test]
    fn test_zero_feed_rate_is_a_formula_error() {
        let err = calc()
            .cutting_time(&DrillingParameters::new(10.0, 100.0, 1800.0, 0.0, "steel"))
            .unwrap_err();
        match err {
            CalcError::Formula { formula, source } => {
                assert_eq!(formula, "CuttingTime");
                assert_eq!(
                    source,
                    FormulaError::DivisionByZero {
                        divisor: "FeedRate".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_setup_time_reference_values() {
        // 5.0 × 1.3 × 1.01 = 6.565 (binary value just above the tie)
        assert_eq!(calc().setup_time(10.0, "steel", 100.0, None).unwrap(), 6.57);
        assert_eq!(calc().setup_time(25.0, "aluminum", 200.0, None).unwrap(), 7.65);
        assert_eq!(calc().setup_time(15.0, "titanium", 0.0001, None).unwrap(), 7.8);
    }

    #[test]
    fn test_setup_size_tiers_are_exclusive() {
        // 10 is not > 10: base tier
        assert_eq!(calc().setup_time(10.0, "brass", 0.0, None).unwrap(), 5.0);
        assert_eq!(calc().setup_time(10.5, "brass", 0.0, None).unwrap(), 6.0);
        assert_eq!(calc().setup_time(20.5, "brass", 0.0, None).unwrap(), 7.5);
    }

    #[test]
    fn test_custom_setup_time_overrides() {
        for (d, grade, l) in [(5.0, "steel", 10.0), (45.0, "titanium", 900.0), (12.0, "x", 1.0)] {
            assert_eq!(calc().setup_time(d, grade, l, Some(15.0)).unwrap(), 15.0);
        }
        // Returned verbatim, not rounded
        assert_eq!(calc().setup_time(10.0, "steel", 100.0, Some(3.14159)).unwrap(), 3.14159);
    }

    #[test]
    fn test_grinding_time_reference_values() {
        assert_eq!(calc().grinding_time(10.0, 100.0, 10, None).unwrap(), 0.3);
        assert_eq!(calc().grinding_time(20.0, 1000.0, 1, None).unwrap(), 3.68);
        assert_eq!(calc().grinding_time(5.0, 100.0, 10, None).unwrap(), 0.25);
    }

    #[test]
    fn test_custom_grinding_time_not_divided() {
        assert_eq!(calc().grinding_time(10.0, 100.0, 10, Some(7.5)).unwrap(), 7.5);
        assert_eq!(calc().grinding_time(30.0, 900.0, 3, Some(7.5)).unwrap(), 7.5);
    }

    #[test]
    fn test_zero_grinding_frequency_is_a_formula_error() {
        let err = calc().grinding_time(10.0, 100.0, 0, None).unwrap_err();
        assert!(matches!(
            err,
            CalcError::Formula {
                source: FormulaError::DivisionByZero { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_inspection_time_reference_values() {
        assert_eq!(calc().inspection_time(100.0, true, 1).unwrap(), 1.81);
        assert_eq!(calc().inspection_time(100.0, false, 3).unwrap(), 3.02);
        assert_eq!(calc().inspection_time(1000.0, true, 10).unwrap(), 19.44);
    }

    #[test]
    fn test_every_component_increases_with_length() {
        let c = calc();
        let lengths = [50.0, 200.0, 400.0, 800.0];
        let mut previous: Option<[f64; 4]> = None;
        for l in lengths {
            let current = [
                c.cutting_time(&DrillingParameters::new(10.0, l, 1273.0, 80.0, "steel"))
                    .unwrap(),
                c.setup_time(10.0, "steel", l, None).unwrap(),
                c.grinding_time(20.0, l, 1, None).unwrap(),
                c.inspection_time(l, true, 10).unwrap(),
            ];
            if let Some(prev) = previous {
                for (p, n) in prev.iter().zip(current.iter()) {
                    assert!(n > p, "{:?} should exceed {:?}", current, prev);
                }
            }
            previous = Some(current);
        }
    }

    #[test]
    fn test_alternative_material_table() {
        let config = CalculatorConfig {
            material_factors: MaterialFactorTable::from_entries([("steel", 2.0)]),
            ..CalculatorConfig::default()
        };
        let custom = Calculator::new(config);
        let params = DrillingParameters::new(10.0, 100.0, 1273.0, 80.0, "steel");
        assert_eq!(custom.cutting_time(&params).unwrap(), 2.5);
        // aluminum is no longer in the table → neutral
        let params = DrillingParameters::new(10.0, 100.0, 1273.0, 80.0, "aluminum");
        assert_eq!(custom.cutting_time(&params).unwrap(), 1.25);
    }
}
