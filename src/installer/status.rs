//! Installation status
//!
//! Compares each destination with its staged source. A destination is current
//! when it matches the source byte for byte, or the source with the activation
//! directive prepended.

use std::path::PathBuf;

use serde::Serialize;

use super::{Installer, file_ops};
use crate::error::Result;
use crate::error::fs::read_error;
use crate::hash::{hash_bytes, hash_file};
use crate::probe::PresenceFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    Missing,
    Current,
    /// Current, with the activation directive applied
    Patched,
    Modified,
}

impl FileState {
    pub fn label(self) -> &'static str {
        match self {
            FileState::Missing => "missing",
            FileState::Current => "current",
            FileState::Patched => "patched",
            FileState::Modified => "modified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub path: PathBuf,
    pub state: FileState,
    /// `None` when metadata files are not tracked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_present: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub presence: PresenceFlags,
    pub install_dir: PathBuf,
    pub files: Vec<FileStatus>,
}

impl StatusReport {
    pub fn all_present(&self) -> bool {
        self.files.iter().all(|f| f.state != FileState::Missing)
    }
}

impl Installer<'_> {
    /// Inspect the install directory without changing anything
    pub fn status(&self) -> Result<StatusReport> {
        let manifest = self.manifest();
        let primary = manifest.primary().destination.clone();
        let mut files = Vec::with_capacity(manifest.len());

        for file in &manifest.files {
            let state = if !file.destination.is_file() {
                FileState::Missing
            } else if !file.source.is_file() {
                // nothing to compare against
                FileState::Modified
            } else {
                let installed = hash_file(&file.destination)?;
                if installed == hash_file(&file.source)? {
                    FileState::Current
                } else if file.destination == primary {
                    let original =
                        std::fs::read_to_string(&file.source).map_err(|e| read_error(&file.source, &e))?;
                    let patched =
                        file_ops::prepend_directive(&original, &self.config.activation_directive);
                    if installed == hash_bytes(patched.as_bytes()) {
                        FileState::Patched
                    } else {
                        FileState::Modified
                    }
                } else {
                    FileState::Modified
                }
            };

            files.push(FileStatus {
                path: file.relative.clone(),
                state,
                meta_present: file.destination_meta.as_ref().map(|m| m.is_file()),
            });
        }

        Ok(StatusReport {
            presence: self.presence(),
            install_dir: self.config.install_dir.clone(),
            files,
        })
    }
}
