use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Error taxonomy surfaced at the request boundary. Every handler returns
/// `Result<_, ApiError>`; the conversion below is the single place where
/// failures become HTTP statuses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or a supplied value is out of range.
    #[error("{0}")]
    Validation(String),

    /// The requested identifier does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A unique identifier (card number, username) is already taken.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or a missing/invalid session token.
    #[error("{0}")]
    Unauthorized(String),

    /// Store unreachable or any other unclassified failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Internal details stay in the log, not in the response body.
        let message = match &self {
            ApiError::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        ApiError::Internal(err.into())
    }
}
