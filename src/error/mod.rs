//! Error types and handling for DeskyMode
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Constructors are grouped into sub-modules by error domain:
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors
//! - [`manifest`]: Staged file manifest errors

pub mod config;
pub mod fs;
pub mod manifest;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for DeskyMode operations
#[derive(Error, Diagnostic, Debug)]
pub enum DeskyError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(deskymode::config::not_found),
        help("Omit --config to use the built-in defaults, or point it at an existing deskymode.yaml")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(deskymode::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(deskymode::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Project directory not found: {path}")]
    #[diagnostic(
        code(deskymode::config::project_not_found),
        help("Run from the Unity project root or pass --project <DIR>")
    )]
    ProjectNotFound { path: String },

    // Manifest errors
    #[error("No staged files to install")]
    #[diagnostic(
        code(deskymode::manifest::empty),
        help("Check `package_dir` and the `staged` pattern, or list entries under `files`")
    )]
    EmptyManifest,

    #[error("Destination escapes the install directory: {path}")]
    #[diagnostic(
        code(deskymode::manifest::destination_escapes),
        help("Destinations must be relative paths without '..' components")
    )]
    DestinationEscapesRoot { path: String },

    #[error("Staged file has no '{anchor}' segment: {path}")]
    #[diagnostic(code(deskymode::manifest::missing_anchor))]
    MissingAnchor { path: String, anchor: String },

    #[error("Primary file is not part of the manifest: {path}")]
    #[diagnostic(
        code(deskymode::manifest::primary_not_found),
        help("`primary` must name a destination relative to `install_dir`")
    )]
    PrimaryNotInManifest { path: String },

    #[error("Invalid staged pattern '{pattern}': {reason}")]
    #[diagnostic(code(deskymode::manifest::invalid_pattern))]
    InvalidPattern { pattern: String, reason: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(deskymode::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(deskymode::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(deskymode::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to remove file: {path}: {reason}")]
    #[diagnostic(code(deskymode::fs::remove_failed))]
    FileRemoveFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(deskymode::fs::io_error))]
    IoError { message: String },

    // Host errors
    #[error("Failed to show dialog: {message}")]
    #[diagnostic(code(deskymode::dialog::prompt_failed))]
    DialogFailed { message: String },

    #[error("Asset refresh command failed: {command}: {reason}")]
    #[diagnostic(
        code(deskymode::refresh::command_failed),
        help("Check `refresh_command` in deskymode.yaml")
    )]
    RefreshFailed { command: String, reason: String },

    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(deskymode::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },
}

impl From<std::io::Error> for DeskyError {
    fn from(err: std::io::Error) -> Self {
        DeskyError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for DeskyError {
    fn from(err: inquire::InquireError) -> Self {
        DeskyError::DialogFailed {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DeskyError {
    fn from(err: serde_json::Error) -> Self {
        DeskyError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, DeskyError>;
