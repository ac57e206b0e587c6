//! File system errors

use std::path::Path;

use super::DeskyError;

/// Creates a file not found error
pub fn not_found(path: impl Into<String>) -> DeskyError {
    DeskyError::FileNotFound { path: path.into() }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> DeskyError {
    DeskyError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub(crate) fn read_error(path: &Path, e: &std::io::Error) -> DeskyError {
    if e.kind() == std::io::ErrorKind::NotFound {
        return not_found(path.display().to_string());
    }
    DeskyError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

pub(crate) fn write_error(path: &Path, e: &std::io::Error) -> DeskyError {
    write_failed(path.display().to_string(), e.to_string())
}

pub(crate) fn remove_error(path: &Path, e: &std::io::Error) -> DeskyError {
    DeskyError::FileRemoveFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
