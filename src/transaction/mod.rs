//! Transaction support for install and refresh
//!
//! Every destination the installer writes or removes is recorded first. If the
//! transaction is dropped without being committed, created files and
//! directories are removed again and overwritten or removed files get their
//! original bytes back. A failed refresh therefore leaves the previous
//! installation in place instead of an empty install directory.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new();
//!
//! transaction.record_remove(&destination)?;
//! std::fs::remove_file(&destination)?;
//!
//! transaction.record_write(&destination)?;
//! file_ops::copy_atomic(&source, &destination)?;
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::error::fs::read_error;

/// Original content of a file touched by the transaction
#[derive(Debug, Clone)]
struct FileBackup {
    path: PathBuf,
    content: Vec<u8>,
}

/// A transaction over install-directory changes
#[derive(Debug, Default)]
pub struct Transaction {
    /// Every path already recorded, so the first state wins
    seen: HashSet<PathBuf>,

    /// Files that did not exist before this transaction
    created_files: Vec<PathBuf>,

    /// Files that existed before this transaction (with original content)
    backups: Vec<FileBackup>,

    /// Directories created during this transaction
    created_dirs: Vec<PathBuf>,

    /// Whether the transaction has been committed
    committed: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path that is about to be written
    pub fn record_write(&mut self, path: &Path) -> Result<()> {
        self.record(path)
    }

    /// Record a path that is about to be removed
    pub fn record_remove(&mut self, path: &Path) -> Result<()> {
        self.record(path)
    }

    fn record(&mut self, path: &Path) -> Result<()> {
        if !self.seen.insert(path.to_path_buf()) {
            return Ok(());
        }

        if path.is_file() {
            let content = fs::read(path).map_err(|e| read_error(path, &e))?;
            self.backups.push(FileBackup {
                path: path.to_path_buf(),
                content,
            });
        } else {
            self.created_files.push(path.to_path_buf());
        }
        Ok(())
    }

    /// Track a directory that was created during this transaction
    pub fn track_dir_created(&mut self, path: impl Into<PathBuf>) {
        self.created_dirs.push(path.into());
    }

    /// Commit the transaction (prevent rollback)
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Undo every recorded change
    pub fn rollback(&mut self) {
        if self.committed {
            return;
        }

        for path in &self.created_files {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    tracing::warn!(path = %path.display(), %e, "failed to remove file during rollback");
                }
            }
        }

        for backup in &self.backups {
            if let Some(parent) = backup.path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Err(e) = fs::write(&backup.path, &backup.content) {
                tracing::warn!(path = %backup.path.display(), %e, "failed to restore file");
            }
        }

        // Deepest first; only empty directories are removed
        let mut dirs: Vec<_> = self.created_dirs.iter().collect();
        dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
        for path in dirs {
            let empty = fs::read_dir(path)
                .map(|mut d| d.next().is_none())
                .unwrap_or(false);
            if empty {
                let _ = fs::remove_dir(path);
            }
        }

        tracing::info!(
            created = self.created_files.len(),
            restored = self.backups.len(),
            "rolled back install changes"
        );
        self.committed = true;
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}
