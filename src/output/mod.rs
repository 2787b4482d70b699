mod error_output;
mod json;
mod progress;
mod text;

pub use error_output::{ErrorOutput, print_error_full};
pub use json::JsonFormatter;
pub use progress::RunProgress;
pub use text::{ColorMode, TextFormatter};

use std::path::Path;

use crate::aggregate::RunReport;
use crate::error::Result;

/// Renders a finished run.
pub trait OutputFormatter {
    /// # Errors
    /// Returns an error if the formatting fails.
    fn format(&self, report: &RunReport) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// Format `report` and write it to `path`, or stdout when `path` is `None`.
///
/// # Errors
/// Returns an error if formatting or writing fails.
pub fn write_report(
    report: &RunReport,
    format: OutputFormat,
    color: ColorMode,
    path: Option<&Path>,
) -> Result<()> {
    let content = match format {
        OutputFormat::Text => TextFormatter::new(color).format(report)?,
        OutputFormat::Json => JsonFormatter.format(report)?,
    };
    match path {
        Some(path) => std::fs::write(path, content)?,
        None => print!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
