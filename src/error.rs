//! Single error-result type for every data-fetching operation.

use serde::Serialize;

use crate::backend::BackendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Backend or service unreachable, or the call timed out.
    Network,
    /// Backend answered with a non-success status.
    Backend,
    /// Upstream data could not be interpreted.
    Malformed,
    /// Input rejected before any call was made.
    Validation,
    NotFound,
    /// The external analysis service failed.
    Service,
}

/// `{kind, message}` error returned by fetchers, loaders and the analysis
/// service client. Panels render it inline; HTTP handlers map `kind` to a
/// status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Validation, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Malformed, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::NotFound, message)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Service, message)
    }
}

impl From<BackendError> for FetchError {
    fn from(err: BackendError) -> Self {
        let kind = match &err {
            BackendError::Connection(_) | BackendError::HttpClient(_) => FetchErrorKind::Network,
            BackendError::Status { .. } => FetchErrorKind::Backend,
            BackendError::ResponseParsing(_) => FetchErrorKind::Malformed,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<tokio::task::JoinError> for FetchError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::new(FetchErrorKind::Service, format!("Task failed: {err}"))
    }
}
