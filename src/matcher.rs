//! Filename matching rules shared by every traversal policy.
//!
//! Both functions work on bare file names, so they apply identically to local
//! and remote listings.

/// Extensions accepted as video evidence. Matching is case-sensitive, so both
/// spellings of each extension are listed.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mov", "avi", "mp4", "mpeg", "mkv", "MOV", "AVI", "MP4", "MPEG", "MKV",
];

/// Returns `true` when `filename` belongs to `expected`.
///
/// A file belongs to a name when its first whitespace-delimited token equals
/// the name, or when the file name without its final extension equals it.
/// Both comparisons are exact and case-sensitive.
#[must_use]
pub fn matches(filename: &str, expected: &str) -> bool {
    if filename.split_whitespace().next() == Some(expected) {
        return true;
    }
    strip_extension(filename) == expected
}

/// Returns `true` when the file extension is one of [`VIDEO_EXTENSIONS`].
#[must_use]
pub fn is_video(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| VIDEO_EXTENSIONS.contains(&ext))
}

/// Returns `true` when any file in `files` matches `expected`.
#[must_use]
pub fn any_matches<S: AsRef<str>>(files: &[S], expected: &str) -> bool {
    files.iter().any(|f| matches(f.as_ref(), expected))
}

fn strip_extension(filename: &str) -> &str {
    filename.rsplit_once('.').map_or(filename, |(stem, _)| stem)
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
