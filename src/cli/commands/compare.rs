//! `gundrill compare` command - Legacy spreadsheet rows vs calculator
//!
//! Values are given as they appear in the legacy sheet: sizes in inches
//! (`0.299"`), feed in in/min (`0.8 IN/MIN`) and times in minutes
//! (`12.5 MINS`).

use clap::Subcommand;
use miette::Result;

use crate::calc::legacy::{parse_feed_rate, parse_inches, parse_minutes};
use crate::calc::{LegacyOperation, LegacyRecord};
use crate::cli::commands::load_calculator;
use crate::cli::output::print_record;
use crate::cli::GlobalOpts;
use crate::core::error::LegacyValueError;

#[derive(Subcommand, Debug)]
pub enum CompareCommands {
    /// Gun-drill row tabulated at 5" and 10"
    Row(CompareRowArgs),

    /// Single operation row with its own length (e.g. DRILL 0.375")
    Operation(CompareOperationArgs),
}

#[derive(clap::Args, Debug)]
pub struct CompareRowArgs {
    /// Material grade as written in the sheet
    #[arg(long, short = 'm')]
    pub material: String,

    /// Drill size in inches (e.g. 0.299")
    #[arg(long, short = 'd', value_parser = parse_inches)]
    pub drill_size: f64,

    /// Spindle speed
    #[arg(long, short = 'r')]
    pub rpm: f64,

    /// Feed rate in in/min (e.g. "0.8 IN/MIN")
    #[arg(long, value_parser = parse_feed_rate)]
    pub feed_rate: f64,

    /// Legacy cutting time for 5"
    #[arg(long = "time-5in", value_parser = minutes)]
    pub time_5in: Option<f64>,

    /// Legacy total time for 10"
    #[arg(long = "total-10in", value_parser = minutes)]
    pub total_10in: Option<f64>,

    /// Legacy grinding time for every 10"
    #[arg(long, value_parser = minutes)]
    pub grinding_time: Option<f64>,

    /// Legacy tool setup time after grinding
    #[arg(long, value_parser = minutes)]
    pub setup_time: Option<f64>,

    /// Legacy wall thickness inspection time
    #[arg(long, value_parser = minutes)]
    pub inspection_time: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct CompareOperationArgs {
    /// Material grade as written in the sheet
    #[arg(long, short = 'm')]
    pub material: String,

    /// Operation as written in the sheet (e.g. 'DRILL 0.375"')
    #[arg(long, short = 'o')]
    pub operation: String,

    /// Length in inches
    #[arg(long, short = 'l', value_parser = parse_inches)]
    pub length: f64,

    /// Spindle speed
    #[arg(long, short = 'r')]
    pub rpm: f64,

    /// Feed rate in in/min (e.g. "0.8 IN/MIN")
    #[arg(long, value_parser = parse_feed_rate)]
    pub feed_rate: f64,

    /// Legacy time taken
    #[arg(long, value_parser = minutes)]
    pub time_taken: Option<f64>,
}

impl CompareRowArgs {
    pub fn to_record(&self) -> LegacyRecord {
        LegacyRecord {
            material_grade: self.material.trim().to_string(),
            drill_size: self.drill_size,
            rpm: self.rpm,
            feed_rate: self.feed_rate,
            cutting_time_5in: self.time_5in,
            total_time_10in: self.total_10in,
            grinding_time: self.grinding_time,
            setup_time: self.setup_time,
            inspection_time: self.inspection_time,
        }
    }
}

impl CompareOperationArgs {
    pub fn to_operation(&self) -> Result<LegacyOperation, LegacyValueError> {
        LegacyOperation::new(
            self.material.trim(),
            self.operation.trim(),
            self.length,
            self.rpm,
            self.feed_rate,
            self.time_taken,
        )
    }
}

/// A time flag must carry a value; a blank cell is expressed by omitting it
fn minutes(raw: &str) -> Result<f64, LegacyValueError> {
    parse_minutes(raw)?.ok_or_else(|| LegacyValueError {
        field: "time",
        value: raw.to_string(),
    })
}

pub fn run(cmd: CompareCommands, global: &GlobalOpts) -> Result<()> {
    let calculator = load_calculator(global)?;
    match cmd {
        CompareCommands::Row(args) => {
            let comparison = calculator.compare_legacy(&args.to_record())?;
            print_record(&comparison, global.format)
        }
        CompareCommands::Operation(args) => {
            let comparison = calculator.compare_operation(&args.to_operation()?)?;
            print_record(&comparison, global.format)
        }
    }
}
