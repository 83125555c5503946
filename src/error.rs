//! Error types for pdfstruct.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pdfstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting structured content.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The page content provider could not open or parse the input.
    #[error("Invalid or corrupted document: {0}")]
    InvalidDocument(String),

    /// The page specification could not be parsed.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// A referenced page is outside the document.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The requested operation is not registered.
    #[error("Operation '{0}' is not supported")]
    UnsupportedOperation(String),

    /// The input exceeds the configured size limit.
    #[error("Input of {size} bytes exceeds the limit of {limit} bytes")]
    OversizeInput {
        /// Input size in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Unexpected failure while assembling a page.
    #[error("Extraction failed on page {page}: {message}")]
    InternalExtraction {
        /// Page number (1-indexed)
        page: u32,
        /// Failure description
        message: String,
    },

    /// A request option has an unusable value.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// The extraction configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error during rendering (markup, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

/// Closed set of failure kinds reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Input could not be opened or parsed
    InvalidDocument,
    /// Page specification is unparsable or out of bounds
    InvalidPageRange,
    /// Operation name not recognized
    UnsupportedOperation,
    /// Input exceeds the size limit
    OversizeInput,
    /// Unexpected failure inside the pipeline
    InternalExtractionError,
    /// Request options or configuration are unusable
    InvalidRequest,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::InvalidDocument => "InvalidDocument",
            ErrorKind::InvalidPageRange => "InvalidPageRange",
            ErrorKind::UnsupportedOperation => "UnsupportedOperation",
            ErrorKind::OversizeInput => "OversizeInput",
            ErrorKind::InternalExtractionError => "InternalExtractionError",
            ErrorKind::InvalidRequest => "InvalidRequest",
        };
        f.write_str(name)
    }
}

/// Structured failure surfaced to callers: a kind plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Failure kind
    pub kind: ErrorKind,
    /// Failure message
    pub message: String,
}

impl Error {
    /// Classify this error into its caller-facing kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidDocument(_) => ErrorKind::InvalidDocument,
            Error::InvalidPageRange(_) | Error::PageOutOfRange(..) => ErrorKind::InvalidPageRange,
            Error::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            Error::OversizeInput { .. } => ErrorKind::OversizeInput,
            Error::InvalidOption(_) | Error::InvalidConfig(_) => ErrorKind::InvalidRequest,
            Error::InternalExtraction { .. } | Error::Render(_) | Error::Io(_) | Error::Json(_) => {
                ErrorKind::InternalExtractionError
            }
        }
    }

    /// Convert into the structured failure reported to callers.
    pub fn to_failure(&self) -> Failure {
        Failure {
            kind: self.kind(),
            message: self.to_string(),
        }
    }

    /// Wrap an unexpected page-level failure.
    pub fn internal(page: u32, message: impl Into<String>) -> Self {
        Error::InternalExtraction {
            page,
            message: message.into(),
        }
    }
}
