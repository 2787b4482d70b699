//! Directory sources: the capability every traversal policy runs against.
//!
//! Two implementations exist. [`LocalSource`] is stateless: each call is
//! addressed independently, so one handle can be cloned into any number of
//! tasks. [`RemoteSource`] wraps an FTP session with a single working-directory
//! cursor, so it must never be shared between concurrent tasks; the runner
//! asks the [`SourceOpener`] for a fresh session per branch instead.

mod ftp;
mod listing;
mod local;
mod remote;

pub use ftp::{FtpClient, FtpSession, Reply};
pub use listing::{parse_list_line, parse_listing};
pub use local::{LocalOpener, LocalSource};
pub use remote::{
    Credentials, DEFAULT_FTP_PORT, FtpEndpoint, RemoteOpener, RemoteSource, navigate_component,
};

use std::fmt;

use crate::error::Result;

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_directory: bool,
}

impl DirectoryEntry {
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
        }
    }

    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
        }
    }
}

/// A forward-slash path relative to the source root.
///
/// Empty and duplicate separators are dropped on construction; the empty
/// path addresses the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LogicalPath {
    components: Vec<String>,
}

impl LogicalPath {
    #[must_use]
    pub const fn root() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self {
            components: path
                .split('/')
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Appends a single child name. The name is taken verbatim, even if it
    /// contains characters that look like separators to other systems.
    #[must_use]
    pub fn join(&self, name: &str) -> Self {
        let mut components = self.components.clone();
        components.push(name.to_string());
        Self { components }
    }

    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.components.join("/"))
    }
}

/// Read-only view of a hierarchical data source.
///
/// Methods take `&mut self` because the remote implementation moves a
/// server-side cursor on every call.
pub trait DirectorySource {
    /// List the immediate children of `path`.
    ///
    /// # Errors
    /// Returns `Navigation` when `path` cannot be resolved and `Listing` when
    /// the directory exists but cannot be read.
    fn list_entries(&mut self, path: &LogicalPath) -> Result<Vec<DirectoryEntry>>;

    /// Make `path` the current navigation context.
    ///
    /// # Errors
    /// Returns `Navigation` naming the first component that cannot be resolved.
    fn navigate_to(&mut self, path: &LogicalPath) -> Result<()>;

    /// Display name of the root, used as the sole branch when the root has no
    /// child directories.
    fn root_name(&self) -> String;

    /// Names of the child directories of `path`, in listing order.
    ///
    /// # Errors
    /// Propagates errors from [`DirectorySource::list_entries`].
    fn list_directories(&mut self, path: &LogicalPath) -> Result<Vec<String>> {
        Ok(self
            .list_entries(path)?
            .into_iter()
            .filter(|e| e.is_directory)
            .map(|e| e.name)
            .collect())
    }

    /// Names of the files directly inside `path`, in listing order.
    ///
    /// # Errors
    /// Propagates errors from [`DirectorySource::list_entries`].
    fn list_files(&mut self, path: &LogicalPath) -> Result<Vec<String>> {
        Ok(self
            .list_entries(path)?
            .into_iter()
            .filter(|e| !e.is_directory)
            .map(|e| e.name)
            .collect())
    }
}

/// Factory for per-task source handles.
///
/// `open` is called once for the root enumeration and once per concurrent
/// branch task; each returned handle is owned exclusively by its caller.
pub trait SourceOpener: Sync {
    type Source: DirectorySource;

    /// Open a handle positioned at the configured root.
    ///
    /// # Errors
    /// Returns `Connection` or `Navigation` errors when the root is unreachable.
    fn open(&self) -> Result<Self::Source>;
}

#[cfg(test)]
pub(crate) mod test_fixtures;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
