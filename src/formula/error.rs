//! Formula error types

use miette::Diagnostic;
use thiserror::Error;

/// Result type for formula evaluation
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while evaluating a formula tree
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum FormulaError {
    /// A name was neither bound by `With` nor supplied as an input
    #[error("Unknown name: {0}")]
    #[diagnostic(
        code(gundrill::formula::unknown_name),
        help("every input referenced by a formula must be supplied before evaluation")
    )]
    UnknownName(String),

    /// An operand had the wrong value type
    #[error("Type mismatch in {context}: expected {expected}, found {found}")]
    #[diagnostic(code(gundrill::formula::type_mismatch))]
    TypeMismatch {
        context: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Division by zero
    #[error("Division by zero: {divisor} evaluated to 0")]
    #[diagnostic(
        code(gundrill::formula::division_by_zero),
        help("feed rate, drill size, grinding frequency and number of features must all be greater than 0")
    )]
    DivisionByZero { divisor: String },
}
