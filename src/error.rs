use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportGuardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid root locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("Connection to {endpoint} failed: {message}")]
    Connection { endpoint: String, message: String },

    #[error("Cannot navigate to '{component}' (requested path: {path})")]
    Navigation { component: String, path: String },

    #[error("Cannot list '{path}': {reason}")]
    Listing { path: String, reason: String },

    #[error("Unexpected FTP reply {code}: {message}")]
    Protocol { code: u32, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl ReportGuardError {
    /// Short category label used when printing the error.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::TomlParse(_) | Self::InvalidLocator { .. } => "Config",
            Self::Connection { .. } | Self::Protocol { .. } => "Connection",
            Self::Navigation { .. } => "Navigation",
            Self::Listing { .. } => "Listing",
            Self::FileRead { .. } | Self::Io(_) => "IO",
            Self::JsonSerialize(_) => "Output",
        }
    }

    /// Returns an actionable hint for the user, if one applies.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => Some("Set the value in .report-guard.toml or pass it on the command line"),
            Self::InvalidLocator { .. } => {
                Some("Use a local directory or a URL like ftp://host:21/path/to/folder")
            }
            Self::Connection { .. } => Some("Check the host, port and FTP credentials"),
            Self::Navigation { .. } => {
                Some("Check the folder name and the remote encoding (source.encoding)")
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportGuardError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
