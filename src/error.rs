use std::path::PathBuf;

use thiserror::Error;

/// Main application error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed XML document: {document} - {details}")]
    MalformedDocument { document: String, details: String },

    #[error("unsupported comparison mode: {mode}")]
    UnsupportedMode { mode: String },

    #[error("missing reference data: {path} - {details}")]
    MissingReferenceData { path: String, details: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("file system traversal error: {path} - {reason}")]
    FileSystemTraversal { path: PathBuf, reason: String },

    #[error("concurrent operation error: {details}")]
    Concurrency { details: String },
}

impl ComparisonError {
    /// Wrap a roxmltree parse failure with the document it came from.
    pub fn malformed(document: impl Into<String>, err: roxmltree::Error) -> Self {
        ComparisonError::MalformedDocument {
            document: document.into(),
            details: err.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ComparisonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_document_display() {
        let err = ComparisonError::MalformedDocument {
            document: "feed1.xml".to_string(),
            details: "unexpected end of stream".to_string(),
        };
        assert!(err.to_string().contains("malformed XML document"));
        assert!(err.to_string().contains("feed1.xml"));
        assert!(err.to_string().contains("unexpected end of stream"));
    }

    #[test]
    fn test_unsupported_mode_display() {
        let err = ComparisonError::UnsupportedMode {
            mode: "Bogus".to_string(),
        };
        assert!(err.to_string().contains("unsupported comparison mode"));
        assert!(err.to_string().contains("Bogus"));
    }

    #[test]
    fn test_missing_reference_data_display() {
        let err = ComparisonError::MissingReferenceData {
            path: "required_fields.json".to_string(),
            details: "required_fields list is empty".to_string(),
        };
        assert!(err.to_string().contains("missing reference data"));
        assert!(err.to_string().contains("required_fields.json"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ComparisonError = io_error.into();

        match err {
            ComparisonError::Io(_) => (),
            _ => panic!("Expected ComparisonError::Io"),
        }
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err = ComparisonError::Io(io_error);

        assert!(err.source().is_some());
        assert_eq!(err.source().unwrap().to_string(), "File not found");
    }
}
