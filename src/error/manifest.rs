//! Manifest errors

use super::DeskyError;

/// Creates a destination escapes root error
pub fn destination_escapes(path: impl Into<String>) -> DeskyError {
    DeskyError::DestinationEscapesRoot { path: path.into() }
}

/// Creates a missing anchor error
pub fn missing_anchor(path: impl Into<String>, anchor: impl Into<String>) -> DeskyError {
    DeskyError::MissingAnchor {
        path: path.into(),
        anchor: anchor.into(),
    }
}
