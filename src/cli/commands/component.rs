//! `gundrill component` command - Single time components

use clap::Subcommand;
use miette::Result;
use serde::Serialize;

use crate::cli::args::DrillArgs;
use crate::cli::commands::load_calculator;
use crate::cli::helpers::format_minutes;
use crate::cli::output::{print_record, Field, Record};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::units::inches_to_mm;

#[derive(Subcommand, Debug)]
pub enum ComponentCommands {
    /// Cutting time per feature
    Cutting(DrillArgs),

    /// Setup time for the job
    Setup(SetupArgs),

    /// Grinding time per feature
    Grinding(GrindingArgs),

    /// Inspection time across all features
    Inspection(InspectionArgs),
}

#[derive(clap::Args, Debug)]
pub struct SetupArgs {
    /// Drill diameter (mm, or inches with --inches)
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub drill_size: f64,

    /// Length to drill (mm, or inches with --inches)
    #[arg(long, short = 'l', allow_negative_numbers = true)]
    pub length: f64,

    /// Material grade
    #[arg(long, short = 'm', default_value = "steel")]
    pub material: String,

    /// Fixed setup time in minutes, returned as given
    #[arg(long)]
    pub custom: Option<f64>,

    /// Read drill size and length in inches
    #[arg(long)]
    pub inches: bool,
}

#[derive(clap::Args, Debug)]
pub struct GrindingArgs {
    /// Drill diameter (mm, or inches with --inches)
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub drill_size: f64,

    /// Length to drill (mm, or inches with --inches)
    #[arg(long, short = 'l', allow_negative_numbers = true)]
    pub length: f64,

    /// Features drilled between regrinds
    #[arg(long, default_value_t = 10)]
    pub grinding_frequency: u32,

    /// Fixed grinding time in minutes, returned as given
    #[arg(long)]
    pub custom: Option<f64>,

    /// Read drill size and length in inches
    #[arg(long)]
    pub inches: bool,
}

#[derive(clap::Args, Debug)]
pub struct InspectionArgs {
    /// Length to drill (mm, or inches with --inches)
    #[arg(long, short = 'l', allow_negative_numbers = true)]
    pub length: f64,

    /// Include wall thickness inspection
    #[arg(long, short = 'w')]
    pub wall_inspection: bool,

    /// Number of features
    #[arg(long, short = 'n', default_value_t = 1)]
    pub features: u32,

    /// Read length in inches
    #[arg(long)]
    pub inches: bool,
}

/// One component estimate
#[derive(Debug, Serialize)]
pub struct ComponentTime {
    pub component: &'static str,
    pub minutes: f64,
}

impl Record for ComponentTime {
    fn title(&self) -> String {
        format!("{} time: {} min", self.component, format_minutes(self.minutes))
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            ("component", self.component.to_string()),
            ("minutes", format_minutes(self.minutes)),
        ]
    }
}

pub fn run(cmd: ComponentCommands, global: &GlobalOpts) -> Result<()> {
    let calculator = load_calculator(global)?;

    let result = match cmd {
        ComponentCommands::Cutting(args) => ComponentTime {
            component: "cutting",
            minutes: calculator.cutting_time(&args.to_parameters())?,
        },
        ComponentCommands::Setup(args) => {
            let (drill, length) = lengths_mm(args.drill_size, args.length, args.inches);
            ComponentTime {
                component: "setup",
                minutes: calculator.setup_time(drill, &args.material, length, args.custom)?,
            }
        }
        ComponentCommands::Grinding(args) => {
            let (drill, length) = lengths_mm(args.drill_size, args.length, args.inches);
            ComponentTime {
                component: "grinding",
                minutes: calculator.grinding_time(
                    drill,
                    length,
                    args.grinding_frequency,
                    args.custom,
                )?,
            }
        }
        ComponentCommands::Inspection(args) => {
            let length = if args.inches {
                inches_to_mm(args.length)
            } else {
                args.length
            };
            ComponentTime {
                component: "inspection",
                minutes: calculator.inspection_time(length, args.wall_inspection, args.features)?,
            }
        }
    };

    if global.quiet && global.format == OutputFormat::Auto {
        println!("{}", format_minutes(result.minutes));
        return Ok(());
    }
    print_record(&result, global.format)
}

fn lengths_mm(drill_size: f64, length: f64, inches: bool) -> (f64, f64) {
    if inches {
        (inches_to_mm(drill_size), inches_to_mm(length))
    } else {
        (drill_size, length)
    }
}
