//! Parsing of Unix-style `LIST` responses.
//!
//! ```text
//! drwxr-xr-x 1 owner group        0 Jan 10 12:00 Отчет за март
//! -rw-r--r-- 1 owner group    10240 Jan 10 12:00 ECH-1 act.pdf
//! ```
//!
//! The entry name starts at the ninth whitespace-delimited token and runs to
//! the end of the line, so names with embedded spaces survive intact.

use super::DirectoryEntry;

const NAME_TOKEN_INDEX: usize = 8;

/// Parse a single listing line.
///
/// Returns `None` for lines that carry no entry (for example the `total N`
/// header) and for the `.`/`..` pseudo-entries.
#[must_use]
pub fn parse_list_line(line: &str) -> Option<DirectoryEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    let permissions = line.split_whitespace().next()?;
    let start = nth_token_start(line, NAME_TOKEN_INDEX)?;
    let name = line[start..].trim_end();

    if name == "." || name == ".." {
        return None;
    }

    Some(DirectoryEntry {
        name: name.to_string(),
        is_directory: permissions.starts_with('d'),
    })
}

/// Parse every line of a listing, skipping lines that carry no entry.
#[must_use]
pub fn parse_listing<S: AsRef<str>>(lines: &[S]) -> Vec<DirectoryEntry> {
    lines
        .iter()
        .filter_map(|line| parse_list_line(line.as_ref()))
        .collect()
}

fn nth_token_start(line: &str, n: usize) -> Option<usize> {
    let mut seen = 0;
    let mut in_token = false;

    for (idx, ch) in line.char_indices() {
        if ch.is_whitespace() {
            in_token = false;
        } else if !in_token {
            if seen == n {
                return Some(idx);
            }
            in_token = true;
            seen += 1;
        }
    }

    None
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
