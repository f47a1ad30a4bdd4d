//! Library error types

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::formula::FormulaError;

/// Errors from the standard time calculator
#[derive(Debug, Error, Diagnostic)]
pub enum CalcError {
    /// A formula could not be evaluated (usually a zero divisor)
    #[error("Failed to evaluate {formula}")]
    #[diagnostic(code(gundrill::calc::formula))]
    Formula {
        formula: &'static str,
        #[source]
        #[diagnostic_source]
        source: FormulaError,
    },

    /// Parameters failed validation
    #[error("Invalid parameters: {0}")]
    #[diagnostic(
        code(gundrill::calc::invalid_parameters),
        help("run `gundrill validate` to see every violated constraint")
    )]
    InvalidParameters(String),
}

/// Errors from loading calculator configuration
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {}", .path.display())]
    #[diagnostic(code(gundrill::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", .path.display())]
    #[diagnostic(
        code(gundrill::config::parse),
        help("check the YAML syntax and key names; `gundrill config show` prints a valid file")
    )]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    #[diagnostic(code(gundrill::config::invalid))]
    Invalid { key: String, message: String },
}

/// A legacy spreadsheet cell that could not be read as a number
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[error("Invalid legacy {field} value '{value}'")]
#[diagnostic(
    code(gundrill::legacy::value),
    help("expected a number, optionally with its unit (e.g. 0.299\", 0.8 IN/MIN, 12.5 MINS)")
)]
pub struct LegacyValueError {
    pub field: &'static str,
    pub value: String,
}
