use crate::aggregate::{MatchRecord, RunResult, build_matrix};
use crate::error::Result;
use crate::matcher;
use crate::source::{DirectorySource, LogicalPath};

use super::{TraversalPolicy, Unit};

const ARTIFACT_NAME: &str = "presence";

/// One level deep: every expected name must have at least one matching file
/// in every report branch.
#[derive(Debug, Clone)]
pub struct FlatPresence {
    expected: Vec<String>,
}

impl FlatPresence {
    #[must_use]
    pub const fn new(expected: Vec<String>) -> Self {
        Self { expected }
    }

    #[must_use]
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    fn records_for(&self, report: &str, files: &[String]) -> Vec<MatchRecord> {
        self.expected
            .iter()
            .map(|name| MatchRecord {
                expected_name: name.clone(),
                report_name: report.to_string(),
                present: u8::from(matcher::any_matches(files, name)),
            })
            .collect()
    }
}

impl TraversalPolicy for FlatPresence {
    type Records = Vec<MatchRecord>;

    /// Report branches are the root's child directories. With fewer than two
    /// the root's own files are listed once: a lone branch keeps its name as
    /// the column, a root without any is named after itself.
    fn enumerate_units<S: DirectorySource>(&self, source: &mut S) -> Result<Vec<Unit>> {
        let mut dirs = source.list_directories(&LogicalPath::root())?;
        if dirs.len() > 1 {
            return Ok(dirs.iter().map(|name| Unit::child_of_root(name)).collect());
        }
        let name = dirs.pop().unwrap_or_else(|| source.root_name());
        Ok(vec![Unit {
            name,
            path: LogicalPath::root(),
        }])
    }

    fn emit_records<S: DirectorySource>(
        &self,
        source: &mut S,
        unit: &Unit,
    ) -> Result<Vec<MatchRecord>> {
        let files = source.list_files(&unit.path)?;
        Ok(self.records_for(&unit.name, &files))
    }

    fn fallback_records(&self, unit: &Unit) -> Option<Vec<MatchRecord>> {
        Some(self.records_for(&unit.name, &[]))
    }

    fn aggregate(&self, units: &[Unit], records: Vec<Option<Vec<MatchRecord>>>) -> RunResult {
        let columns: Vec<String> = units.iter().map(|u| u.name.clone()).collect();
        RunResult::Presence(build_matrix(&self.expected, &columns, records))
    }

    fn artifact_name(&self, _period: Option<&str>) -> String {
        ARTIFACT_NAME.to_string()
    }
}

#[cfg(test)]
#[path = "flat_tests.rs"]
mod tests;
