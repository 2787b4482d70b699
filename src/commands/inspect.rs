use crate::cli::{Cli, InspectArgs};
use crate::config::{Config, InspectionConfig};
use crate::error::{ReportGuardError, Result};
use crate::policy::HierarchicalInspection;

use super::context::{
    SourceSettings, apply_source_overrides, execute, finish_run, load_config, report_error,
};

#[must_use]
pub fn run_inspect(args: &InspectArgs, cli: &Cli) -> i32 {
    match run_inspect_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => report_error(&e, cli.color),
    }
}

/// Hierarchical inspection.
///
/// # Errors
/// Configuration problems and root-level source failures.
pub fn run_inspect_impl(args: &InspectArgs, cli: &Cli) -> Result<i32> {
    let mut config = load_config(args.source.config.as_deref(), cli.no_config)?;
    apply_source_overrides(&mut config, &args.source);
    apply_inspection_overrides(&mut config, args);
    if config.inspection.check_marker.trim().is_empty() {
        return Err(ReportGuardError::Config(
            "inspection.check_marker must not be empty".to_string(),
        ));
    }

    let settings = SourceSettings::from_config(&config)?;
    let policy = HierarchicalInspection::new(config.inspection.rules());
    let period = period_label(&config.inspection);

    let report = execute(&settings, &policy, period, cli.quiet)?;
    finish_run(&report, &args.source, cli)
}

pub fn apply_inspection_overrides(config: &mut Config, args: &InspectArgs) {
    if let Some(period) = &args.period {
        config.inspection.period.clone_from(period);
    }
    if let Some(marker) = &args.check_marker {
        config.inspection.check_marker.clone_from(marker);
    }
    if !args.exempt.is_empty() {
        config.inspection.exempt_supervisors.clone_from(&args.exempt);
    }
}

fn period_label(inspection: &InspectionConfig) -> Option<String> {
    let period = inspection.period.trim();
    (!period.is_empty()).then(|| period.to_string())
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
