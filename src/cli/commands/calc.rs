//! `gundrill calc` command - Full standard time breakdown

use console::style;
use miette::Result;

use crate::cli::args::{DrillArgs, JobArgs};
use crate::cli::commands::load_calculator;
use crate::cli::helpers::format_minutes;
use crate::cli::output::print_record;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct CalcArgs {
    #[command(flatten)]
    pub drill: DrillArgs,

    #[command(flatten)]
    pub job: JobArgs,
}

pub fn run(args: CalcArgs, global: &GlobalOpts) -> Result<()> {
    let calculator = load_calculator(global)?;
    let params = args.drill.to_parameters();
    let options = args.job.to_options();

    let breakdown = calculator.checked_standard_time(&params, &options)?;

    // Quiet auto output is just the total, for scripts
    if global.quiet && global.format == OutputFormat::Auto {
        println!("{}", format_minutes(breakdown.total_standard_time));
        return Ok(());
    }

    print_record(&breakdown, global.format)?;

    if global.format == OutputFormat::Auto && !global.quiet {
        println!(
            "{} {} {:.2}mm x {:.2}mm @ {} RPM, {:.2} mm/min",
            style("⚙").cyan(),
            style(&params.material_grade).yellow(),
            params.drill_size,
            params.length_to_drill,
            params.rpm,
            params.feed_rate
        );
    }

    Ok(())
}
