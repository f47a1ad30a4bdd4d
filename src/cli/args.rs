//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    calc::CalcArgs, compare::CompareCommands, completions::CompletionsArgs,
    component::ComponentCommands, config::ConfigCommands, formula::FormulaArgs,
    validate::ValidateArgs,
};
use crate::core::params::{DrillingParameters, JobOptions};
use crate::core::units::{inches_to_mm, ipm_to_mm_per_min};

#[derive(Parser)]
#[command(name = "gundrill")]
#[command(author, version, about = "Gun-drilling standard time calculator")]
#[command(long_about = "Estimates standard machining time for gun-drilling jobs from drill size, \
    length, RPM, feed rate and material grade, checks the numbers against legacy spreadsheet \
    rows, and exports the formulas as rule expressions.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging to stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Extra config file, applied after the global and project files
    #[arg(long, global = true, env = "GUNDRILL_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate the full standard time breakdown for a job
    Calc(CalcArgs),

    /// Calculate a single time component
    #[command(subcommand)]
    Component(ComponentCommands),

    /// Check parameters against the supported ranges
    Validate(ValidateArgs),

    /// Print formulas as rule-expression text
    Formula(FormulaArgs),

    /// Compare legacy spreadsheet rows with calculated times
    #[command(subcommand)]
    Compare(CompareCommands),

    /// Show effective configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Styled table for terminals
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

/// Drilling parameters shared by several commands
#[derive(clap::Args, Clone, Debug)]
pub struct DrillArgs {
    /// Drill diameter (mm, or inches with --inches)
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub drill_size: f64,

    /// Length to drill (mm, or inches with --inches)
    #[arg(long, short = 'l', allow_negative_numbers = true)]
    pub length: f64,

    /// Spindle speed
    #[arg(long, short = 'r', allow_negative_numbers = true)]
    pub rpm: f64,

    /// Feed rate (mm/min, or in/min with --inches)
    #[arg(long, allow_negative_numbers = true)]
    pub feed_rate: f64,

    /// Material grade (case-insensitive; unknown grades use factor 1.0)
    #[arg(long, short = 'm', default_value = "steel")]
    pub material: String,

    /// Read drill size and length in inches and feed rate in in/min
    #[arg(long)]
    pub inches: bool,
}

/// Job options for the full breakdown
#[derive(clap::Args, Clone, Debug)]
pub struct JobArgs {
    /// Number of features (holes) in the job
    #[arg(long, short = 'n', default_value_t = 1)]
    pub features: u32,

    /// Skip the tool-wear surcharge
    #[arg(long)]
    pub no_tool_wear: bool,

    /// Include wall thickness inspection
    #[arg(long, short = 'w')]
    pub wall_inspection: bool,

    /// Fixed setup time in minutes, replacing the estimate
    #[arg(long)]
    pub setup_time: Option<f64>,

    /// Fixed grinding time in minutes, replacing the estimate
    #[arg(long)]
    pub grinding_time: Option<f64>,

    /// Features drilled between regrinds
    #[arg(long, default_value_t = 10)]
    pub grinding_frequency: u32,
}

impl DrillArgs {
    /// Parameters in millimetres
    pub fn to_parameters(&self) -> DrillingParameters {
        if self.inches {
            DrillingParameters::new(
                inches_to_mm(self.drill_size),
                inches_to_mm(self.length),
                self.rpm,
                ipm_to_mm_per_min(self.feed_rate),
                self.material.clone(),
            )
        } else {
            DrillingParameters::new(
                self.drill_size,
                self.length,
                self.rpm,
                self.feed_rate,
                self.material.clone(),
            )
        }
    }
}

impl JobArgs {
    pub fn to_options(&self) -> JobOptions {
        JobOptions {
            number_of_features: self.features,
            tool_wear_consideration: !self.no_tool_wear,
            wall_thickness_inspection: self.wall_inspection,
            custom_setup_time: self.setup_time,
            custom_grinding_time: self.grinding_time,
            grinding_frequency: self.grinding_frequency,
        }
    }
}
