use std::path::Path;

use crate::cli::{CheckArgs, Cli};
use crate::config::{
    Config, RealFileSystem, parse_expected_names, read_names_file, validate_names,
};
use crate::error::Result;
use crate::policy::FlatPresence;

use super::context::{
    SourceSettings, apply_source_overrides, execute, finish_run, load_config, report_error,
};

#[must_use]
pub fn run_check(args: &CheckArgs, cli: &Cli) -> i32 {
    match run_check_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => report_error(&e, cli.color),
    }
}

/// Flat presence check.
///
/// # Errors
/// Configuration problems and root-level source failures.
pub fn run_check_impl(args: &CheckArgs, cli: &Cli) -> Result<i32> {
    let mut config = load_config(args.source.config.as_deref(), cli.no_config)?;
    apply_source_overrides(&mut config, &args.source);

    let names = resolve_expected_names(&config, args)?;
    let settings = SourceSettings::from_config(&config)?;
    let policy = FlatPresence::new(names);

    let report = execute(&settings, &policy, None, cli.quiet)?;
    finish_run(&report, &args.source, cli)
}

/// `--names`, then `--names-file`, then `[expected] names`, then
/// `[expected] names_file`.
///
/// # Errors
/// `FileRead` for an unreadable names file, `Config` when no names remain.
pub fn resolve_expected_names(config: &Config, args: &CheckArgs) -> Result<Vec<String>> {
    let names = if let Some(list) = &args.names {
        parse_expected_names(list)
    } else if let Some(path) = &args.names_file {
        read_names_file(&RealFileSystem, path)?
    } else if !config.expected.names.is_empty() {
        config
            .expected
            .names
            .iter()
            .map(|n| n.trim().to_string())
            .collect()
    } else if let Some(path) = &config.expected.names_file {
        read_names_file(&RealFileSystem, Path::new(path))?
    } else {
        Vec::new()
    };
    validate_names(names)
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
