//! Result types and the aggregation step that assembles them.
//!
//! Per-branch records arrive in completion order; everything here orders them
//! by the pre-enumerated branch list instead, so output is deterministic.

use std::time::Duration;

use indexmap::IndexMap;

/// Presence of one expected name in one report branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub expected_name: String,
    pub report_name: String,
    pub present: u8,
}

/// One check instance (real or synthetic) of a check category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub unit: String,
    pub supervisor: String,
    pub category: String,
    pub location: String,
    pub video_present: u8,
}

/// Presence of any content in a materials category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialsRecord {
    pub unit: String,
    pub supervisor: String,
    pub category: String,
    pub materials_present: u8,
}

/// Dense expected-name × branch table of 0/1 values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceMatrix {
    columns: Vec<String>,
    rows: IndexMap<String, Vec<u8>>,
}

impl PresenceMatrix {
    /// An all-zero matrix. Rows follow `expected` order (duplicates collapse
    /// into the first occurrence), columns follow `columns` order.
    #[must_use]
    pub fn zeroed(expected: &[String], columns: Vec<String>) -> Self {
        let width = columns.len();
        let rows = expected
            .iter()
            .map(|name| (name.clone(), vec![0; width]))
            .collect();
        Self { columns, rows }
    }

    /// Set one cell. Unknown names or out-of-range columns are ignored.
    pub fn set(&mut self, expected_name: &str, column: usize, present: u8) {
        if let Some(cell) = self
            .rows
            .get_mut(expected_name)
            .and_then(|row| row.get_mut(column))
        {
            *cell = u8::from(present > 0);
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in configured order: `(expected name, one value per column)`.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Value of one cell, by names.
    #[must_use]
    pub fn get(&self, expected_name: &str, column: &str) -> Option<u8> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(expected_name)?.get(idx).copied()
    }

    /// Flatten into one record per cell, row-major.
    #[must_use]
    pub fn records(&self) -> Vec<MatchRecord> {
        self.rows
            .iter()
            .flat_map(|(name, values)| {
                self.columns
                    .iter()
                    .zip(values)
                    .map(move |(column, value)| MatchRecord {
                        expected_name: name.clone(),
                        report_name: column.clone(),
                        present: *value,
                    })
            })
            .collect()
    }
}

/// The two ordered record sequences of a hierarchical inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionReport {
    pub checks: Vec<CheckRecord>,
    pub materials: Vec<MaterialsRecord>,
}

impl InspectionReport {
    pub fn extend(&mut self, other: Self) {
        self.checks.extend(other.checks);
        self.materials.extend(other.materials);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    Presence(PresenceMatrix),
    Inspection(InspectionReport),
}

/// A branch whose traversal failed and was excluded or zero-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    pub branch: String,
    pub message: String,
}

/// Everything one run produces. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RunReport {
    result: RunResult,
    artifact: String,
    elapsed: Duration,
    failures: Vec<BranchFailure>,
}

impl RunReport {
    #[must_use]
    pub const fn new(
        result: RunResult,
        artifact: String,
        elapsed: Duration,
        failures: Vec<BranchFailure>,
    ) -> Self {
        Self {
            result,
            artifact,
            elapsed,
            failures,
        }
    }

    #[must_use]
    pub const fn result(&self) -> &RunResult {
        &self.result
    }

    /// Name the export layer should give the produced table(s).
    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn failures(&self) -> &[BranchFailure] {
        &self.failures
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Build the dense matrix from per-branch records.
///
/// `records[i]` belongs to `branches[i]`; `None` (a failed branch with no
/// fallback) leaves that column at zero, as do names a branch did not report.
#[must_use]
pub fn build_matrix(
    expected: &[String],
    branches: &[String],
    records: Vec<Option<Vec<MatchRecord>>>,
) -> PresenceMatrix {
    let mut matrix = PresenceMatrix::zeroed(expected, branches.to_vec());
    for (column, branch_records) in records.into_iter().enumerate() {
        for record in branch_records.into_iter().flatten() {
            matrix.set(&record.expected_name, column, record.present);
        }
    }
    matrix
}

/// Concatenate per-unit reports in unit order, skipping failed units.
#[must_use]
pub fn concat_inspection(reports: Vec<Option<InspectionReport>>) -> InspectionReport {
    let mut combined = InspectionReport::default();
    for report in reports.into_iter().flatten() {
        combined.extend(report);
    }
    combined
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
