//! Script installer
//!
//! Decides whether the DeskyMode scripts need installing, copies the staged
//! files into the project, and enables the Final IK code path when the full
//! Final IK package (not just the stub) is present.
//!
//! Per run the installer moves through:
//! `Uninstalled -> {MissingDependency | Installed}`, `Installed -> Installed`
//! (idempotent), or `Installed -(refresh)-> Uninstalled -> Installed`.

pub mod file_ops;
pub mod status;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use crate::config::{DeskyConfig, Manifest, StagedFile};
use crate::error::{Result, fs as fs_error};
use crate::probe::{CapabilityProbe, PresenceFlags};
use crate::refresh::AssetRefresher;
use crate::transaction::Transaction;
use crate::ui::{Dialog, DialogHost};

pub use status::{FileState, FileStatus, StatusReport};

/// External collaborators the installer talks to
pub struct Hosts<'a> {
    pub probe: &'a dyn CapabilityProbe,
    pub dialogs: &'a dyn DialogHost,
    pub refresher: &'a dyn AssetRefresher,
}

/// What `ensure_installed` ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// Scripts are present where expected; nothing was touched
    AlreadyInstalled,
    /// Scripts are loaded from somewhere other than the install directory
    UnexpectedLocation,
    /// Neither Final IK nor its stub is present; nothing was copied
    MissingDependency,
    Installed(InstallReport),
}

/// Files written by a copy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Destinations relative to the install directory
    pub copied: Vec<PathBuf>,
    /// Destination files removed first (refresh only)
    pub removed: usize,
    /// Whether the activation directive was prepended to the primary file
    pub patched: bool,
}

pub struct Installer<'a> {
    project_root: PathBuf,
    config: &'a DeskyConfig,
    manifest: Manifest,
    hosts: Hosts<'a>,
}

impl<'a> Installer<'a> {
    pub fn new(
        project_root: impl Into<PathBuf>,
        config: &'a DeskyConfig,
        manifest: Manifest,
        hosts: Hosts<'a>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            manifest,
            hosts,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn presence(&self) -> PresenceFlags {
        PresenceFlags::detect(self.hosts.probe, &self.config.markers)
    }

    /// Install the scripts unless they are already present
    pub fn ensure_installed(&self) -> Result<EnsureOutcome> {
        let flags = self.presence();

        if flags.scripts_installed {
            if !self.manifest.any_installed() {
                tracing::warn!(
                    install_dir = %self.manifest.install_root.display(),
                    "scripts are loaded but none are in the install directory"
                );
                self.hosts.dialogs.show(&unexpected_location_dialog())?;
                return Ok(EnsureOutcome::UnexpectedLocation);
            }
            tracing::info!("scripts already installed");
            return Ok(EnsureOutcome::AlreadyInstalled);
        }

        if !flags.any_dependency() {
            tracing::warn!(
                marker = %self.config.markers.dependency,
                "Final IK not found"
            );
            self.hosts.dialogs.show(&missing_dependency_dialog())?;
            return Ok(EnsureOutcome::MissingDependency);
        }

        let report = self.copy_files()?;
        self.hosts.refresher.refresh(&self.project_root)?;
        Ok(EnsureOutcome::Installed(report))
    }

    /// Copy every staged file, then patch the primary file for full Final IK
    pub fn copy_files(&self) -> Result<InstallReport> {
        self.check_sources()?;
        let mut transaction = Transaction::new();
        let report = self.copy_into(&mut transaction)?;
        transaction.commit();
        Ok(report)
    }

    /// Delete every destination file and its metadata companion
    pub fn remove_files(&self) -> Result<usize> {
        let mut transaction = Transaction::new();
        let removed = self.remove_into(&mut transaction)?;
        transaction.commit();
        Ok(removed)
    }

    /// Reinstall unconditionally ("Refresh Scripts")
    ///
    /// Removal and copy share one transaction: if the copy fails, the removed
    /// files are restored.
    pub fn force_refresh(&self) -> Result<InstallReport> {
        self.check_sources()?;

        let mut transaction = Transaction::new();
        let removed = self.remove_into(&mut transaction)?;
        let mut report = self.copy_into(&mut transaction)?;
        transaction.commit();
        report.removed = removed;

        self.hosts.refresher.refresh(&self.project_root)?;
        Ok(report)
    }

    /// Fail before touching anything when a staged file is missing
    fn check_sources(&self) -> Result<()> {
        for file in &self.manifest.files {
            let sources = std::iter::once(&file.source).chain(file.source_meta.as_ref());
            for source in sources {
                if !source.is_file() {
                    return Err(fs_error::not_found(source.display().to_string()));
                }
            }
        }
        Ok(())
    }

    fn copy_into(&self, transaction: &mut Transaction) -> Result<InstallReport> {
        let mut report = InstallReport::default();

        for file in &self.manifest.files {
            install_file(transaction, &file.source, &file.destination)?;
            if let (Some(source_meta), Some(destination_meta)) =
                (&file.source_meta, &file.destination_meta)
            {
                install_file(transaction, source_meta, destination_meta)?;
            }
            tracing::debug!(file = %file.relative.display(), "copied staged file");
            report.copied.push(file.relative.clone());
        }

        if self
            .hosts
            .probe
            .is_type_present(&self.config.markers.full_dependency)
        {
            let primary = self.manifest.primary();
            self.patch_primary(transaction, primary)?;
            report.patched = true;
        }

        tracing::info!(
            count = report.copied.len(),
            patched = report.patched,
            "installed scripts"
        );
        Ok(report)
    }

    fn patch_primary(&self, transaction: &mut Transaction, primary: &StagedFile) -> Result<()> {
        transaction.record_write(&primary.destination)?;
        file_ops::patch_from_source(
            &primary.source,
            &primary.destination,
            &self.config.activation_directive,
        )?;
        tracing::info!(
            file = %primary.relative.display(),
            directive = %self.config.activation_directive,
            "enabled full Final IK path"
        );
        Ok(())
    }

    fn remove_into(&self, transaction: &mut Transaction) -> Result<usize> {
        let mut removed = 0;
        for file in &self.manifest.files {
            let targets = std::iter::once(&file.destination).chain(file.destination_meta.as_ref());
            for target in targets {
                if !target.is_file() {
                    continue;
                }
                transaction.record_remove(target)?;
                if file_ops::remove_if_present(target)? {
                    tracing::debug!(path = %target.display(), "removed installed file");
                    if target == &file.destination {
                        removed += 1;
                    }
                }
            }
        }
        Ok(removed)
    }
}

fn install_file(transaction: &mut Transaction, source: &Path, destination: &Path) -> Result<()> {
    for dir in file_ops::create_parent_dirs(destination)? {
        transaction.track_dir_created(dir);
    }
    transaction.record_write(destination)?;
    file_ops::copy_atomic(source, destination)
}

fn unexpected_location_dialog() -> Dialog {
    Dialog::new(
        "DeskyMode in unexpected location",
        "Please remove old DeskyMode scripts",
        "Cancel",
    )
}

fn missing_dependency_dialog() -> Dialog {
    Dialog::new(
        "Missing Final IK",
        "Please install Final IK or Final IK Stub",
        "Ok",
    )
}
