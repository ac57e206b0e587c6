//! Configuration errors

use super::DeskyError;

/// Creates a config not found error
pub fn not_found(path: impl Into<String>) -> DeskyError {
    DeskyError::ConfigNotFound { path: path.into() }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> DeskyError {
    DeskyError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> DeskyError {
    DeskyError::ConfigInvalid {
        message: message.into(),
    }
}
