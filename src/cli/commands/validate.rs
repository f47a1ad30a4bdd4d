//! `gundrill validate` command - Check parameters against supported ranges

use console::style;
use miette::Result;

use crate::calc::ParameterBag;
use crate::cli::commands::load_calculator;
use crate::cli::output::print_record;
use crate::cli::{GlobalOpts, OutputFormat};

/// Every parameter is optional here so missing ones are reported, not
/// rejected by the argument parser
#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Drill diameter (mm)
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub drill_size: Option<f64>,

    /// Length to drill (mm)
    #[arg(long, short = 'l', allow_negative_numbers = true)]
    pub length: Option<f64>,

    /// Spindle speed
    #[arg(long, short = 'r', allow_negative_numbers = true)]
    pub rpm: Option<f64>,

    /// Feed rate (mm/min)
    #[arg(long, allow_negative_numbers = true)]
    pub feed_rate: Option<f64>,

    /// Number of features
    #[arg(long, short = 'n', allow_negative_numbers = true)]
    pub features: Option<i64>,

    /// Features drilled between regrinds
    #[arg(long, allow_negative_numbers = true)]
    pub grinding_frequency: Option<i64>,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let calculator = load_calculator(global)?;
    let bag = ParameterBag {
        drill_size: args.drill_size,
        length_to_drill: args.length,
        rpm: args.rpm,
        feed_rate: args.feed_rate,
        number_of_features: args.features,
        grinding_frequency: args.grinding_frequency,
    };

    let result = calculator.validate(&bag);

    if global.format == OutputFormat::Auto {
        if result.is_valid {
            if !global.quiet {
                println!("{} Parameters are valid", style("✓").green().bold());
            }
        } else {
            for error in &result.errors {
                println!("{} {}", style("✗").red(), error);
            }
        }
    } else {
        print_record(&result, global.format)?;
    }

    if result.is_valid {
        Ok(())
    } else {
        Err(miette::miette!(
            code = "gundrill::validate",
            "Validation failed: {}",
            result.error_message
        ))
    }
}
