//! Core module - configuration, inputs and shared types

pub mod config;
pub mod error;
pub mod material;
pub mod params;
pub mod units;

pub use config::{CalculatorConfig, ConfigOverlay, ValidationLimits};
pub use error::{CalcError, ConfigError, LegacyValueError};
pub use material::MaterialFactorTable;
pub use params::{DrillingParameters, JobOptions};
