//! Domain error taxonomy
//!
//! Every failure a caller can observe is a [`DetectionError`] carrying one of
//! the closed [`ErrorKind`] values, so control decisions (retry or not) are
//! made by kind rather than by message.

use bridge_traits::error::BridgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed set of error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    InvalidRequest,
    ServerError,
    Timeout,
    InvalidFile,
    FileTooLarge,
    UploadFailed,
    NotFound,
    UnknownError,
}

impl ErrorKind {
    /// Wire name, e.g. `"invalid_request"`
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::InvalidFile => "invalid_file",
            ErrorKind::FileTooLarge => "file_too_large",
            ErrorKind::UploadFailed => "upload_failed",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnknownError => "unknown_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every detection operation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} (Code: {kind})")]
pub struct DetectionError {
    pub message: String,
    pub kind: ErrorKind,
}

impl DetectionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServerError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn invalid_file(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFile, message)
    }

    pub fn file_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileTooLarge, message)
    }

    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UploadFailed, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownError, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

/// A bridge failure means no status was ever received.
impl From<BridgeError> for DetectionError {
    fn from(error: BridgeError) -> Self {
        DetectionError::server_error(format!("HTTP request failed: {}", error))
    }
}

impl From<core_runtime::Error> for DetectionError {
    fn from(error: core_runtime::Error) -> Self {
        match error {
            core_runtime::Error::MissingApiKey => {
                DetectionError::unauthorized("API key is required")
            }
            other => DetectionError::invalid_request(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectionError>;
