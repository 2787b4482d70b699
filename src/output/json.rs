use serde::Serialize;

use crate::aggregate::{InspectionReport, PresenceMatrix, RunReport, RunResult};
use crate::error::Result;

use super::OutputFormatter;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    artifact: &'a str,
    elapsed_ms: u64,
    failures: Vec<JsonFailure<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matrix: Option<JsonMatrix<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<Vec<JsonCheck<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    materials: Option<Vec<JsonMaterials<'a>>>,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    branch: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonMatrix<'a> {
    columns: &'a [String],
    rows: Vec<JsonRow<'a>>,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    values: &'a [u8],
}

#[derive(Serialize)]
struct JsonCheck<'a> {
    unit: &'a str,
    supervisor: &'a str,
    category: &'a str,
    location: &'a str,
    #[serde(rename = "video-present")]
    video_present: u8,
}

#[derive(Serialize)]
struct JsonMaterials<'a> {
    unit: &'a str,
    supervisor: &'a str,
    category: &'a str,
    #[serde(rename = "materials-present")]
    materials_present: u8,
}

fn convert_matrix(matrix: &PresenceMatrix) -> JsonMatrix<'_> {
    JsonMatrix {
        columns: matrix.columns(),
        rows: matrix
            .rows()
            .map(|(name, values)| JsonRow { name, values })
            .collect(),
    }
}

fn convert_inspection(report: &InspectionReport) -> (Vec<JsonCheck<'_>>, Vec<JsonMaterials<'_>>) {
    let checks = report
        .checks
        .iter()
        .map(|c| JsonCheck {
            unit: &c.unit,
            supervisor: &c.supervisor,
            category: &c.category,
            location: &c.location,
            video_present: c.video_present,
        })
        .collect();
    let materials = report
        .materials
        .iter()
        .map(|m| JsonMaterials {
            unit: &m.unit,
            supervisor: &m.supervisor,
            category: &m.category,
            materials_present: m.materials_present,
        })
        .collect();
    (checks, materials)
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RunReport) -> Result<String> {
        let mut output = JsonOutput {
            artifact: report.artifact(),
            elapsed_ms: u64::try_from(report.elapsed().as_millis()).unwrap_or(u64::MAX),
            failures: report
                .failures()
                .iter()
                .map(|f| JsonFailure {
                    branch: &f.branch,
                    message: &f.message,
                })
                .collect(),
            matrix: None,
            checks: None,
            materials: None,
        };

        match report.result() {
            RunResult::Presence(matrix) => output.matrix = Some(convert_matrix(matrix)),
            RunResult::Inspection(inspection) => {
                let (checks, materials) = convert_inspection(inspection);
                output.checks = Some(checks);
                output.materials = Some(materials);
            }
        }

        let mut json = serde_json::to_string_pretty(&output)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
