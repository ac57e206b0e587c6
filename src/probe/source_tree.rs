//! Probe backed by the project's C# sources
//!
//! Stands in for the editor's loaded-assembly registry when running outside
//! Unity: a type is "present" when some `.cs` file under the scan roots declares
//! it. Staged files (`*.cs.no`) are inert and never match.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::CapabilityProbe;
use super::csharp::declared_types;

pub struct SourceTreeProbe {
    roots: Vec<PathBuf>,
    index: OnceCell<HashSet<String>>,
}

impl SourceTreeProbe {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            index: OnceCell::new(),
        }
    }

    /// Number of distinct type names found
    #[cfg(test)]
    pub fn type_count(&self) -> usize {
        self.index().len()
    }

    fn index(&self) -> &HashSet<String> {
        self.index.get_or_init(|| build_index(&self.roots))
    }
}

impl CapabilityProbe for SourceTreeProbe {
    fn is_type_present(&self, name: &str) -> bool {
        self.index().contains(name)
    }
}

/// Unity skips hidden folders and folders ending in `~`
fn is_ignored_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.ends_with('~')
}

fn is_csharp_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "cs")
}

fn build_index(roots: &[PathBuf]) -> HashSet<String> {
    let mut index = HashSet::new();
    let mut scanned = 0usize;

    for root in roots {
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "scan root missing, skipping");
            continue;
        }

        let walker = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_ignored_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(%err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_csharp_source(entry.path()) {
                continue;
            }

            match std::fs::read_to_string(entry.path()) {
                Ok(source) => {
                    scanned += 1;
                    index.extend(declared_types(&source));
                }
                Err(err) => {
                    tracing::warn!(path = %entry.path().display(), %err, "skipping unreadable source");
                }
            }
        }
    }

    tracing::debug!(files = scanned, types = index.len(), "indexed source tree");
    index
}
