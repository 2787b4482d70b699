//! Shared plumbing for `check` and `inspect`: config resolution, opening the
//! right source, and turning a finished run into output and an exit code.

use std::path::Path;
use std::time::Duration;

use encoding_rs::Encoding;
use tracing::info;

use crate::aggregate::RunReport;
use crate::cli::{Cli, ColorChoice, SourceArgs};
use crate::config::{Config, ConfigLoader, FileConfigLoader, RootLocator, resolve_encoding};
use crate::error::{ReportGuardError, Result};
use crate::output::{ColorMode, ErrorOutput, RunProgress, write_report};
use crate::policy::TraversalPolicy;
use crate::runner::{self, RunOptions};
use crate::source::{Credentials, LocalOpener, RemoteOpener};
use crate::{EXIT_CONFIG_ERROR, EXIT_PARTIAL, EXIT_SUCCESS};

const ANONYMOUS_LOGIN: &str = "anonymous";

#[must_use]
pub const fn color_choice_to_mode(choice: ColorChoice) -> ColorMode {
    match choice {
        ColorChoice::Auto => ColorMode::Auto,
        ColorChoice::Always => ColorMode::Always,
        ColorChoice::Never => ColorMode::Never,
    }
}

/// Load configuration from `path`, the default locations, or not at all.
///
/// # Errors
/// Returns an error if the selected config file cannot be read or parsed.
pub fn load_config(path: Option<&Path>, no_config: bool) -> Result<Config> {
    if no_config {
        return Ok(Config::default());
    }
    let loader = FileConfigLoader::new();
    match path {
        Some(path) => loader.load_from_path(path),
        None => loader.load(),
    }
}

/// Command-line values win over the config file.
pub fn apply_source_overrides(config: &mut Config, args: &SourceArgs) {
    if let Some(root) = &args.root {
        config.source.root = Some(root.clone());
    }
    if let Some(login) = &args.login {
        config.source.login = Some(login.clone());
    }
    if let Some(password) = &args.password {
        config.source.password = Some(password.clone());
    }
    if let Some(encoding) = &args.encoding {
        config.source.encoding.clone_from(encoding);
    }
    if let Some(concurrency) = args.concurrency {
        config.runner.concurrency = concurrency;
    }
}

/// Everything needed to open the report tree.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub locator: RootLocator,
    pub credentials: Credentials,
    pub encoding: &'static Encoding,
    pub timeout: Duration,
    pub concurrency: usize,
}

impl SourceSettings {
    /// # Errors
    /// `Config` for a missing root, unknown encoding or zero timeout,
    /// `InvalidLocator` for a malformed FTP URL.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.source.timeout_secs == 0 {
            return Err(ReportGuardError::Config(
                "source.timeout_secs must be at least 1".to_string(),
            ));
        }
        let encoding = resolve_encoding(&config.source.encoding)?;
        let root = config.source.root.as_deref().unwrap_or_default();
        let locator = RootLocator::parse(root, encoding)?;
        let login = config
            .source
            .login
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| ANONYMOUS_LOGIN.to_string());

        Ok(Self {
            locator,
            credentials: Credentials {
                login,
                password: config.source.password.clone().unwrap_or_default(),
            },
            encoding,
            timeout: Duration::from_secs(config.source.timeout_secs),
            concurrency: config.runner.concurrency.max(1),
        })
    }
}

/// Run `policy` against the configured source.
///
/// # Errors
/// Root-level failures: the root cannot be opened, reached, or listed.
pub fn execute<P: TraversalPolicy>(
    settings: &SourceSettings,
    policy: &P,
    period: Option<String>,
    quiet: bool,
) -> Result<RunReport> {
    let options = RunOptions {
        concurrency: settings.concurrency,
        period,
    };
    let progress = RunProgress::new(quiet);

    let report = match &settings.locator {
        RootLocator::Local(path) => {
            info!(root = %path.display(), "Checking local tree");
            let opener = LocalOpener::new(path)?;
            runner::run(&opener, policy, &options, &progress)
        }
        RootLocator::Ftp(endpoint) => {
            info!(endpoint = %endpoint, encoding = settings.encoding.name(), "Checking FTP tree");
            let opener = RemoteOpener::new(
                endpoint.clone(),
                settings.credentials.clone(),
                settings.encoding,
                settings.timeout,
            );
            runner::run(&opener, policy, &options, &progress)
        }
    };

    progress.finish();
    report
}

/// Write the report and pick the exit code.
///
/// # Errors
/// Returns an error if the report cannot be formatted or written.
pub fn finish_run(report: &RunReport, args: &SourceArgs, cli: &Cli) -> Result<i32> {
    write_report(
        report,
        args.format,
        color_choice_to_mode(cli.color),
        args.output.as_deref(),
    )?;

    if report.has_failures() {
        if !cli.quiet {
            let branches: Vec<&str> = report.failures().iter().map(|f| f.branch.as_str()).collect();
            ErrorOutput::new(color_choice_to_mode(cli.color)).print_warning(
                &format!("{} branch(es) could not be read", branches.len()),
                Some(&branches.join(", ")),
            );
        }
        if args.strict {
            return Ok(EXIT_PARTIAL);
        }
    }
    Ok(EXIT_SUCCESS)
}

/// Print a fatal error the way every command does and return its exit code.
#[must_use]
pub fn report_error(error: &ReportGuardError, color: ColorChoice) -> i32 {
    crate::output::print_error_full(
        color_choice_to_mode(color),
        error.error_type(),
        &error.to_string(),
        None,
        error.suggestion(),
    );
    EXIT_CONFIG_ERROR
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
