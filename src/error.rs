//! Error taxonomy for the ingestion pipeline.
//!
//! Upstream problems (network, HTTP status, payload shape) are classified as
//! transient or permanent and surfaced to callers as a [`Refresh`] value.
//! Store failures are never downgraded: they propagate as `Err` and the
//! operation's transaction is rolled back.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = IngestError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("could not decode payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("payload from {url} has no `{key}`")]
    MissingKey { url: String, key: &'static str },

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// How a failed upstream call should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Transient,
    Permanent,
    Store,
}

impl IngestError {
    pub fn classify(&self) -> ErrorClass {
        match self {
            IngestError::Network { .. } => ErrorClass::Transient,
            IngestError::Status { status, .. }
                if status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS =>
            {
                ErrorClass::Transient
            }
            IngestError::Status { .. } | IngestError::Decode { .. } | IngestError::MissingKey { .. } => {
                ErrorClass::Permanent
            }
            IngestError::Store(_) => ErrorClass::Store,
        }
    }
}

/// Result of a refresh against the external API.
///
/// `Fresh` carries the operation's product (row count, computed view, batch
/// report). The two failure variants mean nothing was written and the store
/// still holds whatever it held before.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh<T> {
    Fresh(T),
    Transient(String),
    Permanent(String),
}

impl<T> Refresh<T> {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Refresh::Fresh(_))
    }

    pub fn is_stale(&self) -> bool {
        !self.is_fresh()
    }

    pub fn fresh(self) -> Option<T> {
        match self {
            Refresh::Fresh(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_fresh(&self) -> Option<&T> {
        match self {
            Refresh::Fresh(value) => Some(value),
            _ => None,
        }
    }

    /// Short label for logs and JSON bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Refresh::Fresh(_) => "fresh",
            Refresh::Transient(_) => "transient_failure",
            Refresh::Permanent(_) => "permanent_failure",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Refresh::Fresh(_) => None,
            Refresh::Transient(reason) | Refresh::Permanent(reason) => Some(reason),
        }
    }

    /// Turn an operation result into a refresh outcome, keeping store
    /// failures as hard errors.
    pub fn settle(operation: &str, result: Result<T>) -> Result<Self> {
        match result {
            Ok(value) => Ok(Refresh::Fresh(value)),
            Err(e) => match e.classify() {
                ErrorClass::Transient => {
                    tracing::warn!("{} skipped (transient): {}", operation, e);
                    Ok(Refresh::Transient(e.to_string()))
                }
                ErrorClass::Permanent => {
                    tracing::warn!("{} skipped (permanent): {}", operation, e);
                    Ok(Refresh::Permanent(e.to_string()))
                }
                ErrorClass::Store => Err(e),
            },
        }
    }
}
