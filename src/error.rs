//! Crate-wide error taxonomy.
//!
//! Failures are flat: a remote/transport failure, a validation failure
//! raised before any remote call, a storage failure, or something that
//! carries no usable description at all. Every failure can be rendered
//! into the single human-readable line surfaced by the lifecycles.

use thiserror::Error;

use crate::storage::StorageError;

/// Message used whenever a failure carries nothing usable to show.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Normalized transport or remote failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiError {
    /// Human-readable description. May be empty when the remote said nothing.
    pub message: String,
    /// HTTP status, absent when the request never produced a response.
    pub status: Option<u16>,
    /// Raw response body, kept for diagnostics.
    pub body: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// `[<status>] <message>` or `<message>`, or `None` if the message is blank.
    pub fn describe(&self) -> Option<String> {
        let message = self.message.trim();
        if message.is_empty() {
            return None;
        }
        Some(match self.status {
            Some(status) => format!("[{}] {}", status, message),
            None => message.to_string(),
        })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.describe() {
            Some(text) => f.write_str(&text),
            None => f.write_str(UNKNOWN_ERROR_MESSAGE),
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors produced by the data layer.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP call failed or returned a non-2xx status.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Caller-supplied input was rejected before any remote call.
    #[error("{0}")]
    Validation(String),

    /// The durable store failed on a write path.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Anything without a recognizable shape.
    #[error("{}", UNKNOWN_ERROR_MESSAGE)]
    Unknown,
}

impl Error {
    /// The single line shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(api) => api
                .describe()
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
            Error::Validation(message) if !message.trim().is_empty() => message.trim().to_string(),
            Error::Storage(err) => err.to_string(),
            Error::Validation(_) | Error::Unknown => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }

    /// Status code of a remote failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => api.status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
