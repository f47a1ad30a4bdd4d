//! Result output in the format selected by `--format`
//!
//! Every command result implements [`Record`]: YAML and JSON serialize the
//! value itself, the tabular formats use its field list.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::calc::{LegacyComparison, OperationComparison, TimeBreakdown, ValidationResult};
use crate::cli::helpers::{format_delta, format_flag, format_minutes, format_optional};
use crate::cli::OutputFormat;

/// A field label and its display value
pub type Field = (&'static str, String);

/// A command result that can be shown as a field/value table
pub trait Record: Serialize {
    /// Heading shown above the table in `auto` format
    fn title(&self) -> String;

    fn fields(&self) -> Vec<Field>;
}

/// Print a record to stdout
pub fn print_record<R: Record>(record: &R, format: OutputFormat) -> Result<()> {
    print!("{}", render_record(record, format)?);
    Ok(())
}

/// Render a record in the given format
pub fn render_record<R: Record>(record: &R, format: OutputFormat) -> Result<String> {
    let output = match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(record).into_diagnostic()?;
            format!("{}\n", json)
        }
        OutputFormat::Yaml => serde_yml::to_string(record).into_diagnostic()?,
        OutputFormat::Csv => delimited(&record.fields(), b',')?,
        OutputFormat::Tsv => delimited(&record.fields(), b'\t')?,
        OutputFormat::Md => {
            format!("{}\n", field_table(&record.fields()).with(Style::markdown()))
        }
        OutputFormat::Auto => format!(
            "{}\n{}\n",
            style(record.title()).bold(),
            field_table(&record.fields()).with(Style::rounded())
        ),
    };
    Ok(output)
}

fn field_table(fields: &[Field]) -> tabled::Table {
    let mut builder = Builder::default();
    builder.push_record(["Field".to_string(), "Value".to_string()]);
    for (label, value) in fields {
        builder.push_record([label.to_string(), value.clone()]);
    }
    builder.build()
}

/// Header row of labels followed by one row of values
fn delimited(fields: &[Field], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer
        .write_record(fields.iter().map(|(label, _)| *label))
        .into_diagnostic()?;
    writer
        .write_record(fields.iter().map(|(_, value)| value.as_str()))
        .into_diagnostic()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| miette::miette!("Failed to flush output: {}", e))?;
    String::from_utf8(bytes).into_diagnostic()
}

impl Record for TimeBreakdown {
    fn title(&self) -> String {
        format!(
            "Standard time for {} feature(s): {} min",
            self.number_of_features,
            format_minutes(self.total_standard_time)
        )
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            ("cutting_time_per_feature", format_minutes(self.cutting_time_per_feature)),
            ("total_cutting_time", format_minutes(self.total_cutting_time)),
            ("setup_time", format_minutes(self.setup_time)),
            ("grinding_time_per_feature", format_minutes(self.grinding_time_per_feature)),
            ("total_grinding_time", format_minutes(self.total_grinding_time)),
            ("inspection_time", format_minutes(self.inspection_time)),
            ("tool_wear_factor_applied", format_flag(self.tool_wear_factor_applied)),
            ("tool_wear_additional_time", format_minutes(self.tool_wear_additional_time)),
            ("total_standard_time", format_minutes(self.total_standard_time)),
            ("number_of_features", self.number_of_features.to_string()),
        ]
    }
}

impl Record for ValidationResult {
    fn title(&self) -> String {
        if self.is_valid {
            "Parameters are valid".to_string()
        } else {
            format!("{} constraint(s) violated", self.errors.len())
        }
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            ("is_valid", format_flag(self.is_valid)),
            ("error_message", self.error_message.clone()),
        ]
    }
}

impl Record for LegacyComparison {
    fn title(&self) -> String {
        format!(
            "Legacy comparison: {} {}\" @ {} RPM",
            self.material_grade, self.drill_size_in, self.rpm
        )
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            ("material_grade", self.material_grade.clone()),
            ("drill_size_in", self.drill_size_in.to_string()),
            ("rpm", self.rpm.to_string()),
            ("feed_rate_ipm", self.feed_rate_ipm.to_string()),
            ("legacy_cutting_time_5in", format_optional(self.legacy_cutting_time_5in)),
            ("calculated_cutting_time_5in", format_minutes(self.calculated_cutting_time_5in)),
            ("cutting_time_5in_delta", format_delta(self.cutting_time_5in_delta)),
            ("calculated_cutting_time_10in", format_minutes(self.calculated_cutting_time_10in)),
            ("legacy_total_time_10in", format_optional(self.legacy_total_time_10in)),
            (
                "legacy_reconstructed_total_10in",
                format_optional(self.legacy_reconstructed_total_10in),
            ),
            ("calculated_total_time_10in", format_minutes(self.calculated_total_time_10in)),
            ("total_time_10in_delta", format_delta(self.total_time_10in_delta)),
            ("legacy_grinding_time", format_optional(self.legacy_grinding_time)),
            ("calculated_grinding_time", format_minutes(self.calculated_grinding_time)),
            ("legacy_setup_time", format_optional(self.legacy_setup_time)),
            ("calculated_setup_time", format_minutes(self.calculated_setup_time)),
            ("legacy_inspection_time", format_optional(self.legacy_inspection_time)),
            ("calculated_inspection_time", format_minutes(self.calculated_inspection_time)),
        ]
    }
}

impl Record for OperationComparison {
    fn title(&self) -> String {
        format!("Legacy operation: {} {}", self.material_grade, self.operation)
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            ("material_grade", self.material_grade.clone()),
            ("operation", self.operation.clone()),
            (
                "drill_size_in",
                self.drill_size_in.map_or_else(|| "-".to_string(), |d| d.to_string()),
            ),
            ("length_in", self.length_in.to_string()),
            ("rpm", self.rpm.to_string()),
            ("feed_rate_ipm", self.feed_rate_ipm.to_string()),
            ("legacy_time_taken", format_optional(self.legacy_time_taken)),
            ("calculated_cutting_time", format_optional(self.calculated_cutting_time)),
            ("cutting_time_delta", format_delta(self.cutting_time_delta)),
        ]
    }
}
