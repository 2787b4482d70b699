use tracing::{debug, warn};

use crate::aggregate::{CheckRecord, InspectionReport, MaterialsRecord, RunResult, concat_inspection};
use crate::error::{ReportGuardError, Result};
use crate::matcher;
use crate::source::{DirectoryEntry, DirectorySource, LogicalPath};

use super::{TraversalPolicy, Unit};

/// Location label of a padding row for a check category with too few instances.
pub const NO_CHECK_LOCATION: &str = "no-check-found";
/// Location label of the extra row for a non-exempt supervisor below the
/// expected instance count.
pub const MISSING_LOCATION: &str = "missing";

const ARTIFACT_PREFIX: &str = "inspection";

/// Thresholds and name rules of the hierarchical inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionRules {
    /// Case-insensitive substring that marks a check category.
    pub check_marker: String,
    /// Supervisor name substrings that suppress the "missing" row.
    pub exempt_supervisors: Vec<String>,
    /// Instance names that are never counted.
    pub instance_denylist: Vec<String>,
    /// Check rows are padded up to this count.
    pub min_checks: usize,
    /// Fewer real instances than this adds a "missing" row.
    pub expected_checks: usize,
}

impl Default for InspectionRules {
    fn default() -> Self {
        Self {
            check_marker: "check".to_string(),
            exempt_supervisors: Vec::new(),
            instance_denylist: vec!["Thumbs.db".to_string()],
            min_checks: 3,
            expected_checks: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Check,
    Materials,
}

/// unit / supervisor / category / instance.
#[derive(Debug, Clone)]
pub struct HierarchicalInspection {
    rules: InspectionRules,
    marker: String,
}

impl HierarchicalInspection {
    #[must_use]
    pub fn new(rules: InspectionRules) -> Self {
        let marker = rules.check_marker.to_lowercase();
        Self { rules, marker }
    }

    #[must_use]
    pub const fn rules(&self) -> &InspectionRules {
        &self.rules
    }

    #[must_use]
    pub fn classify_category(&self, name: &str) -> CategoryKind {
        if name.to_lowercase().contains(&self.marker) {
            CategoryKind::Check
        } else {
            CategoryKind::Materials
        }
    }

    fn is_exempt(&self, supervisor: &str) -> bool {
        self.rules
            .exempt_supervisors
            .iter()
            .any(|token| !token.is_empty() && supervisor.contains(token.as_str()))
    }

    fn is_denied(&self, instance: &str) -> bool {
        self.rules.instance_denylist.iter().any(|d| d == instance)
    }

    fn inspect_checks<S: DirectorySource>(
        &self,
        source: &mut S,
        unit: &str,
        supervisor: &str,
        category: &str,
        path: &LogicalPath,
        out: &mut Vec<CheckRecord>,
    ) -> Result<()> {
        let record = |location: &str, video_present: u8| CheckRecord {
            unit: unit.to_string(),
            supervisor: supervisor.to_string(),
            category: category.to_string(),
            location: location.to_string(),
            video_present,
        };

        let instances: Vec<_> = entries_or_empty(source, path)?
            .into_iter()
            .filter(|e| !self.is_denied(&e.name))
            .collect();

        for instance in &instances {
            let video = if instance.is_directory {
                entries_or_empty(source, &path.join(&instance.name))?
                    .iter()
                    .any(|e| !e.is_directory && matcher::is_video(&e.name))
            } else {
                matcher::is_video(&instance.name)
            };
            out.push(record(&instance.name, u8::from(video)));
        }

        let found = instances.len();
        for _ in found..self.rules.min_checks {
            out.push(record(NO_CHECK_LOCATION, 0));
        }
        if found < self.rules.expected_checks && !self.is_exempt(supervisor) {
            out.push(record(MISSING_LOCATION, 0));
        }
        debug!(unit, supervisor, category, found, "Check category inspected");
        Ok(())
    }
}

/// Listing failures below the unit level count as an empty folder; anything
/// else (navigation, connection) still fails the whole unit.
fn entries_or_empty<S: DirectorySource>(
    source: &mut S,
    path: &LogicalPath,
) -> Result<Vec<DirectoryEntry>> {
    match source.list_entries(path) {
        Err(ReportGuardError::Listing { path, reason }) => {
            warn!(%path, %reason, "Folder could not be listed, counted as empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

impl TraversalPolicy for HierarchicalInspection {
    type Records = InspectionReport;

    fn enumerate_units<S: DirectorySource>(&self, source: &mut S) -> Result<Vec<Unit>> {
        let dirs = source.list_directories(&LogicalPath::root())?;
        Ok(dirs.iter().map(|name| Unit::child_of_root(name)).collect())
    }

    fn emit_records<S: DirectorySource>(
        &self,
        source: &mut S,
        unit: &Unit,
    ) -> Result<InspectionReport> {
        let mut report = InspectionReport::default();

        for supervisor in source.list_directories(&unit.path)? {
            let supervisor_path = unit.path.join(&supervisor);
            let categories: Vec<String> = entries_or_empty(source, &supervisor_path)?
                .into_iter()
                .filter(|e| e.is_directory)
                .map(|e| e.name)
                .collect();
            for category in categories {
                let category_path = supervisor_path.join(&category);
                match self.classify_category(&category) {
                    CategoryKind::Check => self.inspect_checks(
                        source,
                        &unit.name,
                        &supervisor,
                        &category,
                        &category_path,
                        &mut report.checks,
                    )?,
                    CategoryKind::Materials => {
                        let present = !entries_or_empty(source, &category_path)?.is_empty();
                        report.materials.push(MaterialsRecord {
                            unit: unit.name.clone(),
                            supervisor: supervisor.clone(),
                            category,
                            materials_present: u8::from(present),
                        });
                    }
                }
            }
        }

        Ok(report)
    }

    fn fallback_records(&self, _unit: &Unit) -> Option<InspectionReport> {
        None
    }

    fn aggregate(&self, _units: &[Unit], records: Vec<Option<InspectionReport>>) -> RunResult {
        RunResult::Inspection(concat_inspection(records))
    }

    fn artifact_name(&self, period: Option<&str>) -> String {
        match period.map(str::trim) {
            Some(p) if !p.is_empty() => format!("{ARTIFACT_PREFIX}-{p}"),
            _ => ARTIFACT_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "inspection_tests.rs"]
mod tests;
