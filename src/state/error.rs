//! State management-specific error types.

use std::path::PathBuf;

/// Errors that can occur while persisting view state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Failed to write the state file
    #[error("Failed to write view state to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to encode a slice value
    #[error("Failed to encode view state slice '{key}': {source}")]
    EncodeFailed {
        key: String,
        source: serde_json::Error,
    },

    /// Storage lock was poisoned by a panicking writer
    #[error("View state storage lock poisoned")]
    StoragePoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let error = StateError::WriteFailed {
            path: PathBuf::from("/test/state.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("/test/state.json"));
        assert!(error.to_string().contains("denied"));

        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let error = StateError::EncodeFailed {
            key: "issues-page".to_string(),
            source,
        };
        assert!(error.to_string().contains("issues-page"));

        let error = StateError::StoragePoisoned;
        assert!(error.to_string().contains("poisoned"));
    }
}
