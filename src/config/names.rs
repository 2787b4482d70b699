use std::path::Path;

use encoding_rs::WINDOWS_1251;

use crate::error::{ReportGuardError, Result};

use super::filesystem::FileSystem;
use super::model::is_unset;

/// Split a comma-separated name list. Tokens are trimmed; empty ones are
/// dropped. Line breaks separate names as well, so a one-per-line file works.
#[must_use]
pub fn parse_expected_names(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Decode a name-list file: UTF-8 (BOM allowed) first, windows-1251 otherwise.
#[must_use]
pub fn decode_names_file(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => WINDOWS_1251.decode_without_bom_handling(bytes).0.into_owned(),
    }
}

/// Read and parse a name-list file.
///
/// # Errors
/// `FileRead` when the file cannot be read.
pub fn read_names_file<F: FileSystem>(fs: &F, path: &Path) -> Result<Vec<String>> {
    let bytes = fs.read(path).map_err(|source| ReportGuardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_expected_names(&decode_names_file(&bytes)))
}

/// Reject an expected-name list that is empty or only holds the placeholder.
///
/// # Errors
/// `Config` when no usable name is present.
pub fn validate_names(names: Vec<String>) -> Result<Vec<String>> {
    let names: Vec<String> = names.into_iter().filter(|n| !is_unset(n)).collect();
    if names.is_empty() {
        return Err(ReportGuardError::Config(
            "expected name list is empty".to_string(),
        ));
    }
    Ok(names)
}

#[cfg(test)]
#[path = "names_tests.rs"]
mod tests;
