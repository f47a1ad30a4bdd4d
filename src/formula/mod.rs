//! Formula engine
//!
//! This module provides:
//! - Expression trees for every estimator ([`Expr`])
//! - A single evaluator ([`evaluate`])
//! - Rule-expression text export ([`render`], [`render_pretty`])
//! - The canonical formula set built from a [`crate::core::CalculatorConfig`]

pub mod error;
pub mod eval;
pub mod expr;
pub mod library;
pub mod render;

pub use error::{FormulaError, FormulaResult};
pub use eval::{evaluate, evaluate_number, round_to, Inputs, Value};
pub use expr::{BinaryOp, Expr};
pub use library::{names, Formula, FormulaId, FormulaSet};
pub use render::{render, render_pretty};
