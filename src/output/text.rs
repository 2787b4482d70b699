use std::fmt::Write;

use crate::aggregate::{InspectionReport, PresenceMatrix, RunReport, RunResult};
use crate::error::Result;
use crate::policy::{MISSING_LOCATION, NO_CHECK_LOCATION};

use super::OutputFormatter;

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Auto-detect: use colors if stdout is a TTY and `NO_COLOR` is not set
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub(crate) fn enabled_for_stdout(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                std::io::IsTerminal::is_terminal(&std::io::stdout())
            }
        }
    }
}

pub(crate) mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

const CHECK_HEADERS: [&str; 5] = ["unit", "supervisor", "category", "location", "video-present"];
const MATERIALS_HEADERS: [&str; 4] = ["unit", "supervisor", "category", "materials-present"];

/// Aligned plain-text tables.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self {
            use_colors: mode.enabled_for_stdout(),
        }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{}", ansi::RESET)
        } else {
            text.to_string()
        }
    }

    fn format_matrix(&self, matrix: &PresenceMatrix, out: &mut String) {
        let mut headers = vec!["name".to_string()];
        headers.extend(matrix.columns().iter().cloned());
        let rows: Vec<Vec<String>> = matrix
            .rows()
            .map(|(name, values)| {
                std::iter::once(name.to_string())
                    .chain(values.iter().map(u8::to_string))
                    .collect()
            })
            .collect();
        render_table(&headers, &rows, out);

        let cells = matrix.row_count() * matrix.columns().len();
        let present = matrix
            .rows()
            .map(|(_, values)| values.iter().filter(|v| **v == 1).count())
            .sum::<usize>();
        let _ = writeln!(
            out,
            "\nSummary: {} names x {} branches, {} present, {} absent",
            matrix.row_count(),
            matrix.columns().len(),
            self.paint(&present.to_string(), ansi::GREEN),
            self.paint(&(cells - present).to_string(), ansi::RED),
        );
    }

    fn format_inspection(&self, report: &InspectionReport, out: &mut String) {
        let _ = writeln!(out, "{}", self.paint("Checks", ansi::BOLD));
        let check_rows: Vec<Vec<String>> = report
            .checks
            .iter()
            .map(|c| {
                vec![
                    c.unit.clone(),
                    c.supervisor.clone(),
                    c.category.clone(),
                    c.location.clone(),
                    c.video_present.to_string(),
                ]
            })
            .collect();
        render_table(&CHECK_HEADERS.map(String::from), &check_rows, out);

        let _ = writeln!(out, "\n{}", self.paint("Materials", ansi::BOLD));
        let material_rows: Vec<Vec<String>> = report
            .materials
            .iter()
            .map(|m| {
                vec![
                    m.unit.clone(),
                    m.supervisor.clone(),
                    m.category.clone(),
                    m.materials_present.to_string(),
                ]
            })
            .collect();
        render_table(&MATERIALS_HEADERS.map(String::from), &material_rows, out);

        let synthetic = report
            .checks
            .iter()
            .filter(|c| c.location == NO_CHECK_LOCATION || c.location == MISSING_LOCATION)
            .count();
        let with_video = report.checks.iter().filter(|c| c.video_present == 1).count();
        let _ = writeln!(
            out,
            "\nSummary: {} check rows ({} synthetic, {} with video), {} materials categories",
            report.checks.len(),
            self.paint(&synthetic.to_string(), ansi::YELLOW),
            self.paint(&with_video.to_string(), ansi::GREEN),
            report.materials.len(),
        );
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &RunReport) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} ({:.2}s)\n",
            self.paint(report.artifact(), ansi::CYAN),
            report.elapsed().as_secs_f64()
        );

        match report.result() {
            RunResult::Presence(matrix) => self.format_matrix(matrix, &mut out),
            RunResult::Inspection(inspection) => self.format_inspection(inspection, &mut out),
        }

        if report.has_failures() {
            let _ = writeln!(
                out,
                "\n{}",
                self.paint(
                    &format!("Failed branches: {}", report.failures().len()),
                    ansi::RED
                )
            );
            for failure in report.failures() {
                let _ = writeln!(out, "  ✗ {}: {}", failure.branch, failure.message);
            }
        }

        Ok(out)
    }
}

/// Left-aligned columns separated by two spaces, padded by character count.
fn render_table(headers: &[String], rows: &[Vec<String>], out: &mut String) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut line = |cells: &[String]| {
        let joined = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", joined.trim_end());
    };

    line(headers);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(&rule);
    for row in rows {
        line(row);
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
