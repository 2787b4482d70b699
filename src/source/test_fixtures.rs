//! In-memory source shared by policy and runner tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{DirectoryEntry, DirectorySource, LogicalPath, SourceOpener};
use crate::error::{ReportGuardError, Result};

/// Directory tree keyed by logical path display form (`/`, `/A`, `/A/B`).
#[derive(Debug, Clone)]
pub struct MemorySource {
    root_name: String,
    tree: HashMap<String, Vec<DirectoryEntry>>,
    failing: HashSet<String>,
}

impl MemorySource {
    pub fn new(root_name: &str) -> Self {
        let mut tree = HashMap::new();
        tree.insert("/".to_string(), Vec::new());
        Self {
            root_name: root_name.to_string(),
            tree,
            failing: HashSet::new(),
        }
    }

    /// Add directory `path` (and its parent chain as needed).
    pub fn dir(mut self, path: &str) -> Self {
        self.add_dir(&LogicalPath::parse(path));
        self
    }

    /// Add file `name` inside directory `parent`.
    pub fn file(mut self, parent: &str, name: &str) -> Self {
        let parent = LogicalPath::parse(parent);
        self.add_dir(&parent);
        self.tree
            .entry(parent.to_string())
            .or_default()
            .push(DirectoryEntry::file(name));
        self
    }

    /// Make listing `path` fail with a `Listing` error.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(LogicalPath::parse(path).to_string());
        self
    }

    fn add_dir(&mut self, path: &LogicalPath) {
        let mut current = LogicalPath::root();
        for component in path.components() {
            let child = current.join(component);
            let key = child.to_string();
            if !self.tree.contains_key(&key) {
                self.tree
                    .entry(current.to_string())
                    .or_default()
                    .push(DirectoryEntry::directory(component.as_str()));
                self.tree.insert(key, Vec::new());
            }
            current = child;
        }
    }
}

impl DirectorySource for MemorySource {
    fn list_entries(&mut self, path: &LogicalPath) -> Result<Vec<DirectoryEntry>> {
        self.navigate_to(path)?;
        let key = path.to_string();
        if self.failing.contains(&key) {
            return Err(ReportGuardError::Listing {
                path: key,
                reason: "simulated failure".to_string(),
            });
        }
        Ok(self.tree[&key].clone())
    }

    fn navigate_to(&mut self, path: &LogicalPath) -> Result<()> {
        if self.tree.contains_key(&path.to_string()) {
            Ok(())
        } else {
            Err(ReportGuardError::Navigation {
                component: path.components().last().cloned().unwrap_or_default(),
                path: path.to_string(),
            })
        }
    }

    fn root_name(&self) -> String {
        self.root_name.clone()
    }
}

/// Hands out clones of one [`MemorySource`] and counts how many were opened.
#[derive(Debug)]
pub struct MemoryOpener {
    source: MemorySource,
    fail_open: bool,
    opens: AtomicUsize,
}

impl MemoryOpener {
    pub fn new(source: MemorySource) -> Self {
        Self {
            source,
            fail_open: false,
            opens: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            source: MemorySource::new("unreachable"),
            fail_open: true,
            opens: AtomicUsize::new(0),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl SourceOpener for MemoryOpener {
    type Source = MemorySource;

    fn open(&self) -> Result<MemorySource> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(ReportGuardError::Connection {
                endpoint: "memory".to_string(),
                message: "simulated connection failure".to_string(),
            });
        }
        Ok(self.source.clone())
    }
}
