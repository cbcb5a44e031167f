//! Error types for the takeoff engine
//!
//! Only [`TakeoffError::UnrecognizedInput`] is expected to reach callers of
//! [`crate::Engine::extract`]; every other failure inside an extraction is
//! degraded into a warning on the result.

use std::io;
use thiserror::Error;

/// Main error type for takeoff-engine operations
#[derive(Debug, Error)]
pub enum TakeoffError {
    /// IO error while reading the byte buffer
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error tokenizing a DXF stream
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid DXF group code encountered
    #[error("Invalid DXF code: {0}")]
    InvalidDxfCode(i32),

    /// Structure does not match the detected format
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// The PDF access library rejected the document
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Configuration or result (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The buffer is not a CAD or PDF byte stream at all
    #[error("Unrecognized input: {0}")]
    UnrecognizedInput(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for takeoff-engine operations
pub type Result<T> = std::result::Result<T, TakeoffError>;

impl From<String> for TakeoffError {
    fn from(s: String) -> Self {
        TakeoffError::Custom(s)
    }
}

impl From<&str> for TakeoffError {
    fn from(s: &str) -> Self {
        TakeoffError::Custom(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TakeoffError::UnrecognizedInput("empty buffer".to_string());
        assert_eq!(err.to_string(), "Unrecognized input: empty buffer");
    }

    #[test]
    fn test_invalid_code_display() {
        let err = TakeoffError::InvalidDxfCode(-7);
        assert!(err.to_string().contains("-7"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "truncated");
        let err: TakeoffError = io_err.into();
        assert!(matches!(err, TakeoffError::Io(_)));
    }

    #[test]
    fn test_from_str() {
        let err: TakeoffError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }
}
