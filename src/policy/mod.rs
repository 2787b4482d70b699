//! Traversal policies: what to visit below the root and how raw listings
//! become records.
//!
//! The runner only sees the [`TraversalPolicy`] trait, so both policies share
//! one scheduling, failure-isolation and aggregation path.

mod flat;
mod inspection;

pub use flat::FlatPresence;
pub use inspection::{
    CategoryKind, HierarchicalInspection, InspectionRules, MISSING_LOCATION, NO_CHECK_LOCATION,
};

use crate::aggregate::RunResult;
use crate::error::Result;
use crate::source::{DirectorySource, LogicalPath};

/// A top-level branch: a report folder (flat) or an organizational unit
/// (hierarchical).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub path: LogicalPath,
}

impl Unit {
    #[must_use]
    pub fn child_of_root(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: LogicalPath::root().join(name),
        }
    }
}

pub trait TraversalPolicy: Sync {
    /// Records produced by one branch task.
    type Records: Send;

    /// List the branches to schedule, in the order the result must use.
    ///
    /// # Errors
    /// Errors here are root-level and abort the run.
    fn enumerate_units<S: DirectorySource>(&self, source: &mut S) -> Result<Vec<Unit>>;

    /// Traverse one branch.
    ///
    /// # Errors
    /// Errors here are branch-local; the runner logs them and substitutes
    /// [`TraversalPolicy::fallback_records`].
    fn emit_records<S: DirectorySource>(&self, source: &mut S, unit: &Unit)
    -> Result<Self::Records>;

    /// What a failed branch contributes, if anything.
    fn fallback_records(&self, unit: &Unit) -> Option<Self::Records>;

    /// Assemble per-branch records; `records[i]` belongs to `units[i]`.
    fn aggregate(&self, units: &[Unit], records: Vec<Option<Self::Records>>) -> RunResult;

    /// Name of the exported artifact.
    fn artifact_name(&self, period: Option<&str>) -> String;
}
