use std::path::PathBuf;

use encoding_rs::Encoding;

use crate::error::{ReportGuardError, Result};
use crate::source::FtpEndpoint;

use super::model::is_unset;

const FTP_SCHEME: &str = "ftp://";

/// Where the report tree lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootLocator {
    Local(PathBuf),
    Ftp(FtpEndpoint),
}

impl RootLocator {
    /// `ftp://` selects the remote variant; anything else is a local path.
    ///
    /// # Errors
    /// `Config` when the value is empty or still the placeholder,
    /// `InvalidLocator` for a malformed FTP URL.
    pub fn parse(raw: &str, encoding: &'static Encoding) -> Result<Self> {
        if is_unset(raw) {
            return Err(ReportGuardError::Config(
                "root path or FTP URL is not set".to_string(),
            ));
        }
        let raw = raw.trim();
        if raw.starts_with(FTP_SCHEME) {
            return FtpEndpoint::parse(raw, encoding).map(Self::Ftp);
        }
        Ok(Self::Local(PathBuf::from(raw)))
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Ftp(_))
    }
}

/// Look up a text encoding by its WHATWG label (`windows-1251`, `cp1251`,
/// `koi8-r`, `utf-8`, ...).
///
/// # Errors
/// `Config` for an unknown label.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ReportGuardError::Config(format!("unknown text encoding '{label}'")))
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
