//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{FetchError, FetchErrorKind};
use crate::session::SessionError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Sign-in required")]
    Unauthorized,
    #[error("Session expired")]
    SessionExpired,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Sign in first".to_string(),
            ),
            ApiError::SessionExpired => (
                StatusCode::UNAUTHORIZED,
                "SESSION_EXPIRED",
                "Session expired, sign in again".to_string(),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Unavailable(detail) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UPSTREAM_UNAVAILABLE",
                detail.clone(),
            ),
            ApiError::Upstream(detail) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", detail.clone())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err.kind {
            FetchErrorKind::Validation => ApiError::BadRequest(err.message),
            FetchErrorKind::NotFound => ApiError::NotFound(err.message),
            FetchErrorKind::Network => ApiError::Unavailable(err.message),
            FetchErrorKind::Backend | FetchErrorKind::Malformed | FetchErrorKind::Service => {
                ApiError::Upstream(err.message)
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotSignedIn => ApiError::Unauthorized,
            SessionError::Expired => ApiError::SessionExpired,
            SessionError::MissingUser | SessionError::AlreadyExpired(_) => {
                ApiError::BadRequest(err.to_string())
            }
            SessionError::Region(e) => e.into(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_returns_401() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "AUTH_REQUIRED");
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let response = ApiError::Internal("lock poisoned".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "An internal error occurred"
        );
    }

    #[tokio::test]
    async fn fetch_error_kinds_map_to_statuses() {
        let cases = [
            (FetchErrorKind::Validation, StatusCode::BAD_REQUEST),
            (FetchErrorKind::NotFound, StatusCode::NOT_FOUND),
            (FetchErrorKind::Network, StatusCode::SERVICE_UNAVAILABLE),
            (FetchErrorKind::Backend, StatusCode::BAD_GATEWAY),
            (FetchErrorKind::Malformed, StatusCode::BAD_GATEWAY),
            (FetchErrorKind::Service, StatusCode::BAD_GATEWAY),
        ];
        for (kind, status) in cases {
            let response = ApiError::from(FetchError::new(kind, "x")).into_response();
            assert_eq!(response.status(), status, "{kind:?}");
        }
    }

    #[tokio::test]
    async fn upstream_message_is_passed_through() {
        let err = FetchError::not_found("No health records found");
        let json = body_json(ApiError::from(err).into_response()).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "No health records found");
    }

    #[tokio::test]
    async fn session_errors_map() {
        let response = ApiError::from(SessionError::Expired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "SESSION_EXPIRED");

        let response = ApiError::from(SessionError::MissingUser).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
