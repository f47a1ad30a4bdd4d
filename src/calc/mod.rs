//! Standard time calculator
//!
//! [`Calculator`] owns an immutable [`CalculatorConfig`] and the
//! [`FormulaSet`] built from it. Each estimator evaluates its canonical
//! formula tree; the composer chains the four leaf results into a
//! [`TimeBreakdown`]. Calls share no mutable state, so one calculator can be
//! used from any number of threads.

pub mod composer;
pub mod estimators;
pub mod legacy;
pub mod validator;

pub use composer::TimeBreakdown;
pub use legacy::{LegacyComparison, LegacyOperation, LegacyRecord, OperationComparison};
pub use validator::{ParameterBag, ValidationResult};

use crate::core::config::CalculatorConfig;
use crate::core::error::CalcError;
use crate::formula::{evaluate_number, FormulaId, FormulaSet, Inputs};

/// Gun-drilling standard time calculator
#[derive(Debug, Clone)]
pub struct Calculator {
    config: CalculatorConfig,
    formulas: FormulaSet,
}

impl Calculator {
    pub fn new(config: CalculatorConfig) -> Self {
        let formulas = FormulaSet::from_config(&config);
        Self { config, formulas }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn formulas(&self) -> &FormulaSet {
        &self.formulas
    }

    /// Evaluate one formula of the set against named inputs
    pub fn eval(&self, id: FormulaId, inputs: &Inputs) -> Result<f64, CalcError> {
        evaluate_number(&self.formulas.get(id).expr, inputs).map_err(|source| {
            CalcError::Formula {
                formula: id.output_name(),
                source,
            }
        })
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}
