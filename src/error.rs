//! API error type mapped onto JSON error objects.
//!
//! Every error leaves the server as `{"error":{"code","message"}}` with an
//! appropriate HTTP status, so widget embedders get a stable shape to match
//! on regardless of which layer failed.

use crate::auth::AuthError;
use crate::fetch::GuardError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    FetchBlocked(#[from] GuardError),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auth(AuthError::MissingKey) => "E_MISSING_KEY",
            Self::Auth(AuthError::MalformedHeader) => "E_INVALID_AUTH",
            Self::Auth(AuthError::UnknownKey) => "E_UNKNOWN_KEY",
            Self::Auth(AuthError::OriginDenied(_)) => "E_ORIGIN_DENIED",
            Self::InvalidParams(_) => "E_INVALID_PARAMS",
            Self::FetchBlocked(_) => "E_FETCH_BLOCKED",
            Self::Internal(_) => "E_INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(AuthError::MissingKey) | Self::Auth(AuthError::MalformedHeader) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(AuthError::UnknownKey) | Self::Auth(AuthError::OriginDenied(_)) => {
                StatusCode::FORBIDDEN
            }
            Self::InvalidParams(_) | Self::FetchBlocked(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal details stay in the log, not the response body.
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!("internal error: {e:#}");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(serde_json::json!({
            "error": { "code": self.code(), "message": message }
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_401_and_403() {
        assert_eq!(
            ApiError::Auth(AuthError::MissingKey).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Auth(AuthError::UnknownKey).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Auth(AuthError::OriginDenied("x".into())).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ApiError::Auth(AuthError::MissingKey).code(), "E_MISSING_KEY");
        assert_eq!(
            ApiError::InvalidParams("x".into()).code(),
            "E_INVALID_PARAMS"
        );
    }
}
