//! Issue source-specific error types.

use std::path::PathBuf;

/// Errors that can occur while reading issues from a source.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Remote source answered with a non-success status
    #[error("Issue source returned status {status}")]
    Status { status: u16 },

    /// Failed to read an issues file
    #[error("Failed to read issues from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to decode issue records
    #[error("Failed to decode issues: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Two records share an identifier
    #[error("Duplicate issue identifier: {0}")]
    DuplicateIdentifier(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let error = StoreError::Status { status: 503 };
        assert!(error.to_string().contains("503"));

        let error = StoreError::DuplicateIdentifier("ENG-1".to_string());
        assert!(error.to_string().contains("Duplicate issue identifier"));
        assert!(error.to_string().contains("ENG-1"));

        let error = StoreError::ReadFailed {
            path: PathBuf::from("/tmp/issues.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "Not found"),
        };
        assert!(error.to_string().contains("/tmp/issues.json"));
    }
}
