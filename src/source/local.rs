use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{DirectoryEntry, DirectorySource, LogicalPath, SourceOpener};
use crate::error::{ReportGuardError, Result};

/// Filesystem-backed source rooted at a fixed directory.
///
/// Every call is resolved from the root independently, so clones of one
/// handle can be used from many tasks at once.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &LogicalPath) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for component in path.components() {
            resolved.push(component);
            if !resolved.is_dir() {
                return Err(ReportGuardError::Navigation {
                    component: component.clone(),
                    path: path.to_string(),
                });
            }
        }
        Ok(resolved)
    }
}

impl DirectorySource for LocalSource {
    fn list_entries(&mut self, path: &LogicalPath) -> Result<Vec<DirectoryEntry>> {
        let dir = self.resolve(path)?;
        let mut entries = Vec::new();

        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ReportGuardError::Listing {
                        path: path.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::debug!(path = %path, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type();
            if file_type.is_dir() {
                entries.push(DirectoryEntry::directory(name));
            } else if file_type.is_file() {
                entries.push(DirectoryEntry::file(name));
            }
        }

        Ok(entries)
    }

    fn navigate_to(&mut self, path: &LogicalPath) -> Result<()> {
        self.resolve(path).map(|_| ())
    }

    fn root_name(&self) -> String {
        self.root.file_name().map_or_else(
            || self.root.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

/// Opens [`LocalSource`] handles for a root directory.
#[derive(Debug, Clone)]
pub struct LocalOpener {
    root: PathBuf,
}

impl LocalOpener {
    /// Canonicalizes `root` so the root name is stable regardless of how the
    /// path was spelled (trailing separators, `.` segments).
    ///
    /// # Errors
    /// Returns `Navigation` when `root` is not an existing directory.
    pub fn new(root: &Path) -> Result<Self> {
        let canonical = dunce::canonicalize(root).map_err(|_| ReportGuardError::Navigation {
            component: root.display().to_string(),
            path: root.display().to_string(),
        })?;

        if !canonical.is_dir() {
            return Err(ReportGuardError::Navigation {
                component: root.display().to_string(),
                path: root.display().to_string(),
            });
        }

        Ok(Self { root: canonical })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceOpener for LocalOpener {
    type Source = LocalSource;

    fn open(&self) -> Result<LocalSource> {
        Ok(LocalSource::new(self.root.clone()))
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
