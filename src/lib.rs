pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod matcher;
pub mod output;
pub mod policy;
pub mod runner;
pub mod source;

pub use error::{ReportGuardError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Default log filter for a `-v` count; `quiet` wins.
#[must_use]
pub const fn log_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "report_guard=error,error";
    }
    match verbose {
        0 => "report_guard=warn,warn",
        1 => "report_guard=info,warn",
        _ => "report_guard=debug,warn",
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
