//! CLI command implementations

pub mod calc;
pub mod compare;
pub mod completions;
pub mod component;
pub mod config;
pub mod formula;
pub mod validate;

use miette::Result;

use crate::calc::Calculator;
use crate::cli::GlobalOpts;
use crate::core::CalculatorConfig;

/// Build a calculator from the layered configuration
pub fn load_calculator(global: &GlobalOpts) -> Result<Calculator> {
    let config = CalculatorConfig::load(global.config.as_deref())?;
    Ok(Calculator::new(config))
}
