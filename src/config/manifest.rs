//! Staged file manifest
//!
//! A manifest is the resolved list of `{source, destination}` pairs the installer
//! copies. Entries come either from `files` in the config or from walking the
//! package directory with the `staged` glob. Destinations that are not given
//! explicitly are derived with the staging rule: mirror the path from the anchor
//! segment onwards and drop the staging suffix, so
//! `Editor/DeskyModeSetup.cs.no` lands at `<install_dir>/Editor/DeskyModeSetup.cs`.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use super::{DeskyConfig, ManifestEntry};
use crate::error::{DeskyError, Result, manifest as manifest_error};

/// A staged file and where it is installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Destination relative to the install directory, for display
    pub relative: PathBuf,
    pub source_meta: Option<PathBuf>,
    pub destination_meta: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Manifest {
    pub files: Vec<StagedFile>,
    primary: usize,
    pub install_root: PathBuf,
}

impl Manifest {
    /// Resolve the manifest for a project
    pub fn resolve(config: &DeskyConfig, project_root: &Path) -> Result<Self> {
        let package_root = config.package_root(project_root);
        let install_root = config.install_root(project_root);

        let entries = match &config.staged {
            Some(pattern) => discover_staged(&package_root, pattern, &config.staged_suffix)?,
            None => config.files.clone(),
        };

        if entries.is_empty() {
            return Err(DeskyError::EmptyManifest);
        }

        let mut files = Vec::with_capacity(entries.len());
        for entry in &entries {
            ensure_relative(&entry.source)?;
            let relative = match &entry.destination {
                Some(destination) => destination.clone(),
                None => staged_destination(&entry.source, &config.anchor, &config.staged_suffix)?,
            };
            ensure_relative(&relative)?;

            let source = package_root.join(&entry.source);
            let destination = install_root.join(&relative);
            let (source_meta, destination_meta) = if config.copy_meta {
                (
                    Some(staged_meta_path(&source, &config.staged_suffix)),
                    Some(append_to_file_name(&destination, ".meta")),
                )
            } else {
                (None, None)
            };

            files.push(StagedFile {
                source,
                destination,
                relative,
                source_meta,
                destination_meta,
            });
        }

        let primary = match &config.primary {
            Some(primary) => files
                .iter()
                .position(|f| &f.relative == primary)
                .ok_or_else(|| DeskyError::PrimaryNotInManifest {
                    path: primary.display().to_string(),
                })?,
            None => 0,
        };

        Ok(Self {
            files,
            primary,
            install_root,
        })
    }

    /// The file that receives the activation directive
    pub fn primary(&self) -> &StagedFile {
        &self.files[self.primary]
    }

    /// Whether any destination file is present on disk
    pub fn any_installed(&self) -> bool {
        self.files.iter().any(|f| f.destination.is_file())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Map a staged path to its install location
///
/// Keeps the path from the first `anchor` segment onwards and strips `suffix`
/// from the file name when present.
pub fn staged_destination(source: &Path, anchor: &str, suffix: &str) -> Result<PathBuf> {
    let components: Vec<Component<'_>> = source.components().collect();
    let start = components
        .iter()
        .position(|c| c.as_os_str() == anchor)
        .ok_or_else(|| manifest_error::missing_anchor(source.display().to_string(), anchor))?;

    let mut destination: PathBuf = components[start..].iter().collect();
    let stripped = destination
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|name| name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
        .map(str::to_string);
    if let Some(stripped) = stripped {
        destination.set_file_name(stripped);
    }

    Ok(destination)
}

/// `X.cs.no` carries its metadata in `X.cs.meta.no`; unsuffixed files use `X.cs.meta`
fn staged_meta_path(source: &Path, suffix: &str) -> PathBuf {
    match source.file_name().and_then(|n| n.to_str()) {
        Some(name) if name.len() > suffix.len() && name.ends_with(suffix) => {
            let stem = &name[..name.len() - suffix.len()];
            source.with_file_name(format!("{stem}.meta{suffix}"))
        }
        _ => append_to_file_name(source, ".meta"),
    }
}

fn append_to_file_name(path: &Path, extra: &str) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(extra);
    path.with_file_name(name)
}

fn ensure_relative(path: &Path) -> Result<()> {
    if super::escapes_root(path) {
        return Err(manifest_error::destination_escapes(
            path.display().to_string(),
        ));
    }
    Ok(())
}

/// Collect staged files under `package_root` matching `pattern`, sorted by path
///
/// Only names carrying the staging `suffix` count. Metadata companions
/// (`X.cs.meta.no`) are paired with their file later and never listed here.
fn discover_staged(
    package_root: &Path,
    pattern: &str,
    suffix: &str,
) -> Result<Vec<ManifestEntry>> {
    let glob = Glob::new(pattern).map_err(|e| DeskyError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut entries: Vec<ManifestEntry> = WalkDir::new(package_root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_staged_name(e.file_name().to_str().unwrap_or_default(), suffix))
        .filter_map(|e| {
            let relative = e.path().strip_prefix(package_root).ok()?.to_path_buf();
            let candidate = relative.to_string_lossy().replace('\\', "/");
            glob.matched(&CandidatePath::from(candidate.as_str()))
                .is_some()
                .then(|| ManifestEntry::new(relative))
        })
        .collect();

    entries.sort_by(|a, b| a.source.cmp(&b.source));
    tracing::debug!(
        pattern,
        count = entries.len(),
        "discovered staged files"
    );
    Ok(entries)
}

fn is_staged_name(name: &str, suffix: &str) -> bool {
    let meta_suffix = format!(".meta{suffix}");
    name.len() > suffix.len() && name.ends_with(suffix) && !name.ends_with(&meta_suffix)
}
