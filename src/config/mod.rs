//! Installer configuration
//!
//! `deskymode.yaml` is optional. Every field has a default that matches the
//! layout of the DeskyMode package, so a stock project needs no config file at all.

pub mod manifest;

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DeskyError, Result, config as config_error};

pub use manifest::{Manifest, StagedFile};

/// Config filename looked up in the project root
pub const CONFIG_FILE: &str = "deskymode.yaml";

/// Marker type names used as a proxy for "is X installed"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Markers {
    /// Defined by the installed DeskyMode scripts
    pub scripts: String,
    /// Defined by both Final IK and the Final IK stub
    pub dependency: String,
    /// Defined only by the full Final IK package
    pub full_dependency: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            scripts: "DeskyMode.DeskyModeSetup".to_string(),
            dependency: "RootMotion.FinalIK.AimIK".to_string(),
            full_dependency: "RootMotion.FinalIK.IKInspector".to_string(),
        }
    }
}

/// One staged file listed explicitly in the config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    /// Path relative to `package_dir`
    pub source: PathBuf,
    /// Path relative to `install_dir`; derived from `source` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
}

impl ManifestEntry {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeskyConfig {
    /// Package directory holding the staged files, relative to the project root
    pub package_dir: PathBuf,
    /// Install directory inside the project, relative to the project root
    pub install_dir: PathBuf,
    /// Path segment from which a staged path is mirrored into `install_dir`
    pub anchor: String,
    /// Suffix that keeps staged files inert until installed
    pub staged_suffix: String,
    /// Glob (relative to `package_dir`) used instead of `files` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staged: Option<String>,
    pub files: Vec<ManifestEntry>,
    /// Destination (relative to `install_dir`) that receives the activation directive.
    /// `null` picks the first manifest entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<PathBuf>,
    /// Copy the `.meta` companion of each staged file
    pub copy_meta: bool,
    pub markers: Markers,
    pub activation_directive: String,
    /// Directories scanned for type declarations, relative to the project root
    pub scan_roots: Vec<PathBuf>,
    /// Shell command run as the asset refresh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_command: Option<String>,
}

impl Default for DeskyConfig {
    fn default() -> Self {
        Self {
            package_dir: PathBuf::from("Packages/ksmg.vrcft.deskymode"),
            install_dir: PathBuf::from("Assets/Gimmicks/DeskyMode"),
            anchor: "Editor".to_string(),
            staged_suffix: ".no".to_string(),
            staged: None,
            files: vec![
                ManifestEntry::new("Editor/DeskyModeSetup.cs.no"),
                ManifestEntry::new("Editor/DeskyModeEditor.cs.no"),
            ],
            primary: Some(PathBuf::from("Editor/DeskyModeSetup.cs")),
            copy_meta: true,
            markers: Markers::default(),
            activation_directive: "#define ActualFinalIK".to_string(),
            scan_roots: vec![
                PathBuf::from("Assets"),
                PathBuf::from("Packages"),
                PathBuf::from("Library/PackageCache"),
            ],
            refresh_command: None,
        }
    }
}

impl DeskyConfig {
    /// Load configuration for a project
    ///
    /// An explicit path must exist. Without one, `deskymode.yaml` in the project
    /// root is used when present and the defaults otherwise.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    project_root.join(path)
                };
                if !path.is_file() {
                    return Err(config_error::not_found(path.display().to_string()));
                }
                path
            }
            None => {
                let path = project_root.join(CONFIG_FILE);
                if !path.is_file() {
                    tracing::debug!("no {} in project, using defaults", CONFIG_FILE);
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| config_error::parse_failed(path.display().to_string(), e.to_string()))?;
        let config = Self::from_yaml(&content)
            .map_err(|reason| config_error::parse_failed(path.display().to_string(), reason))?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from YAML; an empty document yields the defaults
    pub fn from_yaml(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Check the fields that serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        let directive = self.activation_directive.trim();
        if directive.is_empty() || directive.contains('\n') {
            return Err(config_error::invalid(
                "activation_directive must be a single non-empty line",
            ));
        }

        for (field, value) in [
            ("markers.scripts", &self.markers.scripts),
            ("markers.dependency", &self.markers.dependency),
            ("markers.full_dependency", &self.markers.full_dependency),
        ] {
            if value.trim().is_empty() {
                return Err(config_error::invalid(format!("{field} must not be empty")));
            }
        }

        if self.anchor.is_empty() || self.anchor.contains(['/', '\\']) {
            return Err(config_error::invalid(
                "anchor must be a single path segment",
            ));
        }

        if self.staged_suffix.is_empty() {
            return Err(config_error::invalid("staged_suffix must not be empty"));
        }

        for (field, value) in [
            ("package_dir", &self.package_dir),
            ("install_dir", &self.install_dir),
        ] {
            if escapes_root(value) {
                return Err(config_error::invalid(format!(
                    "{field} must be a relative path inside the project"
                )));
            }
        }

        Ok(())
    }

    pub fn package_root(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.package_dir)
    }

    pub fn install_root(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.install_dir)
    }

    pub fn scan_paths(&self, project_root: &Path) -> Vec<PathBuf> {
        self.scan_roots.iter().map(|r| project_root.join(r)).collect()
    }
}

/// Whether `path` is empty, absolute or climbs out with `..`
fn escapes_root(path: &Path) -> bool {
    path.as_os_str().is_empty()
        || path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        })
}

/// Resolve the project root from `--project` or the current directory
pub fn resolve_project_root(project: Option<PathBuf>) -> Result<PathBuf> {
    let path = match project {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| DeskyError::IoError {
            message: format!("Failed to get current directory: {e}"),
        })?,
    };

    if !path.is_dir() {
        return Err(DeskyError::ProjectNotFound {
            path: path.display().to_string(),
        });
    }

    dunce::canonicalize(&path).map_err(|e| DeskyError::IoError {
        message: format!("Failed to resolve {}: {e}", path.display()),
    })
}
