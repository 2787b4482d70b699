use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Color output control
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "report-guard")]
#[command(author, version, about = "Verify that expected reports exist in a local or FTP folder tree")]
#[command(long_about = "Walks a report tree (local directory or FTP server) and builds a \
    presence matrix of expected reports, or a hierarchical inspection table.\n\n\
    Exit codes:\n  \
    0 - Run completed\n  \
    1 - Run completed but some branches failed (with --strict)\n  \
    2 - Configuration, connection or root navigation error")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and hide the progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    /// Skip loading configuration file
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flat presence check: expected names × report folders
    Check(CheckArgs),

    /// Hierarchical inspection: unit / supervisor / category / instance
    Inspect(InspectArgs),

    /// Generate a configuration file template
    Init(InitArgs),
}

/// Options shared by `check` and `inspect`.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root folder or ftp://host[:port]/path (overrides config)
    #[arg(long)]
    pub root: Option<String>,

    /// FTP login (overrides config)
    #[arg(long)]
    pub login: Option<String>,

    /// FTP password (overrides config)
    #[arg(long)]
    pub password: Option<String>,

    /// Remote text encoding label, e.g. windows-1251 (overrides config)
    #[arg(long)]
    pub encoding: Option<String>,

    /// Maximum concurrent branch tasks (overrides config)
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Output format [possible values: text, json]
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exit with code 1 when any branch failed
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Expected names, comma separated: "ECH-1, ECH-2" (overrides config)
    #[arg(long)]
    pub names: Option<String>,

    /// File with the expected-name list (UTF-8 or windows-1251)
    #[arg(long)]
    pub names_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Period label used to name the result (overrides config)
    #[arg(long)]
    pub period: Option<String>,

    /// Substring marking a check category (overrides config)
    #[arg(long)]
    pub check_marker: Option<String>,

    /// Supervisor name substring exempt from the "missing" row (repeatable)
    #[arg(long = "exempt")]
    pub exempt: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for the configuration file
    #[arg(short, long, default_value = ".report-guard.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
