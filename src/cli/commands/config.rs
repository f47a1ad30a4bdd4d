//! `gundrill config` command - Configuration inspection
//!
//! Shows the effective calculator configuration and where it comes from.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::{CalculatorConfig, ENV_TOOL_WEAR_FACTOR};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show built-in defaults, ignoring all config files
    #[arg(long)]
    pub defaults: bool,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(global),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = if args.defaults {
        CalculatorConfig::default()
    } else {
        CalculatorConfig::load(global.config.as_deref())?
    };

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Auto if !global.quiet => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            print!("{}", serde_yml::to_string(&config).into_diagnostic()?);

            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Environment variables ({})", ENV_TOOL_WEAR_FACTOR);
            println!("  2. --config file");
            println!("  3. Project config (.gundrill.yaml)");
            println!("  4. Global config (~/.config/gundrill/config.yaml)");
            println!("  5. Built-in defaults");
        }
        _ => {
            print!("{}", serde_yml::to_string(&config).into_diagnostic()?);
        }
    }

    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let global_path = CalculatorConfig::global_config_path();
    let project_path = CalculatorConfig::project_config_path(&cwd);

    if global.quiet {
        for path in CalculatorConfig::sources(&cwd, global.config.as_deref()) {
            println!("{}", path.display());
        }
        return Ok(());
    }

    match global_path {
        Some(path) => print_path("Global", &path),
        None => println!("{}: (no home directory)", style("Global").bold()),
    }
    print_path("Project", &project_path);
    if let Some(explicit) = &global.config {
        print_path("Explicit", explicit);
    }

    Ok(())
}

fn print_path(label: &str, path: &Path) {
    let status = if path.is_file() {
        style("✓").green()
    } else {
        style("(not found)").dim()
    };
    println!("{}: {} {}", style(label).bold(), path.display(), status);
}
