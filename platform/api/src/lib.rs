use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use directory::DirectoryError;
use serde::Serialize;
use thiserror::Error;

/// Shared REST result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound(String),
    #[error("conflict")]
    Conflict(String),
    #[error("bad request: {0}")]
    InvalidInput(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl From<DirectoryError> for ApiError {
    fn from(value: DirectoryError) -> Self {
        match value {
            DirectoryError::EmployeeNotFound(_) | DirectoryError::CompensationNotFound(_) => {
                ApiError::NotFound(value.to_string())
            }
            DirectoryError::CompensationExists(_) => ApiError::Conflict(value.to_string()),
            DirectoryError::Store(err) => ApiError::internal(err),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internals stay out of the client-visible message.
        let error = match &self {
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                self.to_string()
            }
            ApiError::NotFound(msg) | ApiError::Conflict(msg) => msg.clone(),
            ApiError::InvalidInput(_) => self.to_string(),
        };
        let body = ErrorBody {
            error,
            code: self.code(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn internal_errors_are_masked() {
        let err = ApiError::internal(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "internal server error");
        assert_eq!(err.code(), "INTERNAL");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn directory_errors_map_to_the_right_statuses() {
        let id = Uuid::new_v4();
        let not_found: ApiError = DirectoryError::EmployeeNotFound(id).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let missing: ApiError = DirectoryError::CompensationNotFound(id).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let conflict: ApiError = DirectoryError::CompensationExists(id).into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(conflict.code(), "CONFLICT");

        let opaque: ApiError = DirectoryError::Store(anyhow::anyhow!("boom")).into();
        assert_eq!(opaque.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
