use std::fs;

use crate::cli::InitArgs;
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, ReportGuardError, Result};

#[must_use]
pub fn run_init(args: &InitArgs) -> i32 {
    match run_init_impl(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// Writes the configuration template.
///
/// # Errors
/// Returns an error if the file already exists (without --force) or cannot be written.
pub fn run_init_impl(args: &InitArgs) -> Result<()> {
    let output_path = &args.output;

    if output_path.exists() && !args.force {
        return Err(ReportGuardError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }

    fs::write(output_path, generate_config_template())?;

    println!("Created configuration file: {}", output_path.display());
    Ok(())
}

/// Root and name list hold the placeholder so an unedited template fails fast.
#[must_use]
pub fn generate_config_template() -> String {
    r#"# report-guard configuration file

[source]
# Local folder or FTP URL, e.g. "ftp://10.0.0.5:21/Отчеты/2024"
root = "Укажите путь"
# FTP credentials (ignored for local folders)
# login = "user"
# password = "secret"
# Text encoding of the FTP server's file names
encoding = "windows-1251"
timeout_secs = 30

[expected]
# Names every report folder must contain a file for (check command)
names = ["Укажите путь"]
# names_file = "names.txt"

[runner]
# Branches traversed at the same time (one FTP connection each)
concurrency = 4

[inspection]
# Categories whose name contains this text hold check instances
check_marker = "check"
# Supervisors whose name contains one of these never get a "missing" row
exempt_supervisors = []
# Entries never counted as check instances
instance_denylist = ["Thumbs.db"]
# Label appended to the result name
period = ""
# Check rows are padded up to this count
min_checks = 3
# Fewer real instances than this adds a "missing" row
expected_checks = 4
"#
    .to_string()
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
