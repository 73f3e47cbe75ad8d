//! Error types for wifiqr

use std::fmt;
use thiserror::Error;

/// Main error type for wifiqr
#[derive(Debug, Error)]
pub enum WifiQrError {
    /// A caller-supplied record or scope violates a precondition
    #[error("Validation error: {0}")]
    Validation(String),

    /// One or more records in an export failed validation
    #[error("{} record(s) failed validation: {}", .0.len(), format_issues(.0))]
    RecordsInvalid(Vec<RecordIssue>),

    /// Malformed persisted document or payload
    #[error("Format error: {0}")]
    Format(String),

    /// An escaping or serialization invariant was violated internally
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// QR rasterizer or page encoder failure
    #[error("Render error: {0}")]
    Render(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<WifiQrError>,
    },
}

/// Broad category of a [`WifiQrError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Format,
    Encoding,
    Io,
    Config,
    Render,
}

impl WifiQrError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        WifiQrError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Category of this error, looking through context wrappers
    pub fn kind(&self) -> ErrorKind {
        match self {
            WifiQrError::Validation(_) | WifiQrError::RecordsInvalid(_) => ErrorKind::Validation,
            WifiQrError::Format(_) | WifiQrError::Json(_) => ErrorKind::Format,
            WifiQrError::Encoding(_) => ErrorKind::Encoding,
            WifiQrError::Io(_) => ErrorKind::Io,
            WifiQrError::Toml(_) | WifiQrError::Config(_) => ErrorKind::Config,
            WifiQrError::Render(_) => ErrorKind::Render,
            WifiQrError::WithContext { source, .. } => source.kind(),
        }
    }

    /// Whether this is a validation failure
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Per-record issues, when this error aggregates them
    pub fn record_issues(&self) -> &[RecordIssue] {
        match self {
            WifiQrError::RecordsInvalid(issues) => issues,
            WifiQrError::WithContext { source, .. } => source.record_issues(),
            _ => &[],
        }
    }
}

/// A validation problem tied to one record of an export scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    /// Position of the record within the resolved scope (0-based)
    pub position: usize,
    /// SSID of the offending record, possibly empty
    pub ssid: String,
    /// What is wrong with it
    pub message: String,
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ssid.trim().is_empty() {
            write!(f, "#{} (no SSID): {}", self.position + 1, self.message)
        } else {
            write!(f, "#{} '{}': {}", self.position + 1, self.ssid, self.message)
        }
    }
}

fn format_issues(issues: &[RecordIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for wifiqr
pub type Result<T> = std::result::Result<T, WifiQrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WifiQrError::Validation("SSID is required".to_string());
        assert_eq!(err.to_string(), "Validation error: SSID is required");
    }

    #[test]
    fn test_error_with_context() {
        let err = WifiQrError::Format("not a list".to_string());
        let err = err.with_context("Failed to load networks");
        assert!(err.to_string().contains("Failed to load networks"));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WifiQrError = io_err.into();
        assert!(matches!(err, WifiQrError::Io(_)));
    }

    #[test]
    fn test_records_invalid_names_every_record() {
        let err = WifiQrError::RecordsInvalid(vec![
            RecordIssue {
                position: 0,
                ssid: String::new(),
                message: "SSID is required".to_string(),
            },
            RecordIssue {
                position: 2,
                ssid: "Office".to_string(),
                message: "password is required".to_string(),
            },
        ]);

        let text = err.to_string();
        assert!(text.starts_with("2 record(s) failed validation"));
        assert!(text.contains("#1 (no SSID)"));
        assert!(text.contains("#3 'Office'"));
        assert!(err.is_validation());
        assert_eq!(err.record_issues().len(), 2);
    }
}
