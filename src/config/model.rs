use serde::{Deserialize, Serialize};

use crate::policy::InspectionRules;
use crate::runner::DEFAULT_CONCURRENCY;

/// Placeholder written by `init` for values the user still has to fill in.
pub const PLACEHOLDER: &str = "Укажите путь";

pub const DEFAULT_ENCODING: &str = "windows-1251";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root of `.report-guard.toml`. Every section and field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub expected: ExpectedConfig,
    pub runner: RunnerConfig,
    pub inspection: InspectionConfig,
}

/// Where the report tree lives and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// Local directory or `ftp://host[:port]/path`.
    pub root: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    /// Text encoding of the remote server (an encoding label).
    pub encoding: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: None,
            login: None,
            password: None,
            encoding: DEFAULT_ENCODING.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExpectedConfig {
    pub names: Vec<String>,
    /// File with a comma-separated name list, used when `names` is empty.
    pub names_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunnerConfig {
    pub concurrency: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InspectionConfig {
    pub check_marker: String,
    pub exempt_supervisors: Vec<String>,
    pub instance_denylist: Vec<String>,
    pub period: String,
    pub min_checks: usize,
    pub expected_checks: usize,
}

impl Default for InspectionConfig {
    fn default() -> Self {
        let rules = InspectionRules::default();
        Self {
            check_marker: rules.check_marker,
            exempt_supervisors: rules.exempt_supervisors,
            instance_denylist: rules.instance_denylist,
            period: String::new(),
            min_checks: rules.min_checks,
            expected_checks: rules.expected_checks,
        }
    }
}

impl InspectionConfig {
    #[must_use]
    pub fn rules(&self) -> InspectionRules {
        InspectionRules {
            check_marker: self.check_marker.clone(),
            exempt_supervisors: self.exempt_supervisors.clone(),
            instance_denylist: self.instance_denylist.clone(),
            min_checks: self.min_checks,
            expected_checks: self.expected_checks,
        }
    }
}

/// True for values that were left empty or still hold the `init` placeholder.
#[must_use]
pub fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == PLACEHOLDER
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
