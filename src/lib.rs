//! gundrill: gun-drilling standard time calculator
//!
//! Estimates machining time for gun-drilling jobs from physical parameters,
//! validates inputs against supported ranges, compares results with legacy
//! spreadsheet rows, and exports every formula as rule-expression text.
//!
//! ```
//! use gundrill::calc::Calculator;
//! use gundrill::core::{DrillingParameters, JobOptions};
//!
//! let calc = Calculator::default();
//! let params = DrillingParameters::new(10.0, 100.0, 1800.0, 80.0, "Steel");
//! let options = JobOptions {
//!     wall_thickness_inspection: true,
//!     ..JobOptions::default()
//! };
//! let breakdown = calc.checked_standard_time(&params, &options).unwrap();
//! assert_eq!(breakdown.total_standard_time, 11.94);
//! ```

pub mod calc;
pub mod cli;
pub mod core;
pub mod formula;
