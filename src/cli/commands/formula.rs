//! `gundrill formula` command - Export formulas as rule-expression text

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::load_calculator;
use crate::cli::helpers::truncate_str;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::formula::{Formula, FormulaId};

#[derive(clap::Args, Debug)]
pub struct FormulaArgs {
    /// Formula to print (e.g. cutting-time, total-standard-time); all when omitted
    pub name: Option<FormulaId>,

    /// Break long expressions across indented lines
    #[arg(long, short = 'p')]
    pub pretty: bool,
}

/// Exported form of one formula
#[derive(Debug, Serialize)]
pub struct FormulaExport {
    pub name: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub inputs: Vec<String>,
    pub expression: String,
}

impl FormulaExport {
    fn new(formula: &Formula, pretty: bool) -> Self {
        Self {
            name: formula.id.output_name(),
            slug: formula.id.slug(),
            description: formula.id.description(),
            inputs: formula.inputs(),
            expression: if pretty {
                formula.to_pretty_text()
            } else {
                formula.to_text()
            },
        }
    }
}

pub fn run(args: FormulaArgs, global: &GlobalOpts) -> Result<()> {
    let calculator = load_calculator(global)?;
    let formulas = calculator.formulas();

    let exports: Vec<FormulaExport> = match args.name {
        Some(id) => vec![FormulaExport::new(formulas.get(id), args.pretty)],
        None => formulas
            .iter()
            .map(|f| FormulaExport::new(f, args.pretty))
            .collect(),
    };

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&exports).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&exports).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Tsv | OutputFormat::Csv => {
            let delimiter = if global.format == OutputFormat::Tsv { b'\t' } else { b',' };
            let mut writer = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(std::io::stdout());
            writer
                .write_record(["name", "inputs", "expression"])
                .into_diagnostic()?;
            for export in &exports {
                let inputs = export.inputs.join(" ");
                writer
                    .write_record([export.name, inputs.as_str(), export.expression.as_str()])
                    .into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md => {
            for export in &exports {
                println!("### {}\n", export.name);
                println!("{}\n", export.description);
                println!("```\n{}\n```\n", export.expression);
            }
        }
        OutputFormat::Auto => {
            if exports.len() > 1 && global.quiet {
                // One expression per line for piping
                for export in &exports {
                    println!("{}", export.expression);
                }
            } else if exports.len() == 1 {
                let export = &exports[0];
                if !global.quiet {
                    println!(
                        "{} {}",
                        style(export.name).bold().underlined(),
                        style(export.description).dim()
                    );
                    println!("{} {}\n", style("Inputs:").dim(), export.inputs.join(", "));
                }
                println!("{}", export.expression);
            } else {
                let mut builder = Builder::default();
                builder.push_record(["Formula", "Inputs", "Expression"]);
                for export in &exports {
                    builder.push_record([
                        export.name.to_string(),
                        export.inputs.len().to_string(),
                        truncate_str(&export.expression, 60),
                    ]);
                }
                println!("{}", builder.build().with(Style::rounded()));
                println!();
                println!(
                    "{} formula(s). Use {} to print one in full.",
                    style(exports.len()).cyan(),
                    style("gundrill formula <name>").yellow()
                );
            }
        }
    }

    Ok(())
}
