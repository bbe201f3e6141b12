//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Body sent without a JSON content type (415)
    UnsupportedMediaType,

    /// Resource not found (404)
    NotFound { resource: &'static str },

    /// Store not installed yet (500)
    Unavailable,

    /// Database error (500, logged)
    Database {
        resource: &'static str,
        operation: &'static str,
        source: DbError,
    },
}

impl ApiError {
    /// Wrap a store failure with the route context it happened in.
    pub fn database(resource: &'static str, operation: &'static str, source: DbError) -> Self {
        match source {
            DbError::NotInitialized => Self::Unavailable,
            source => Self::Database {
                resource,
                operation,
                source,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                json!({
                    "error": "unsupported_media_type",
                    "message": "expected request with `Content-Type: application/json`"
                }),
            ),
            Self::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} not found", resource)
                }),
            ),
            Self::Unavailable => {
                tracing::warn!("Request rejected: database not initialized");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "unavailable",
                        "message": "database not initialized"
                    }),
                )
            }
            Self::Database {
                resource,
                operation,
                source,
            } => {
                // Log the actual error, return generic message
                tracing::error!(resource, operation, "Database error: {}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": format!("could not {} {}", operation, resource)
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::NotAnObject);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unsupported_media_type_is_415() {
        let response = ApiError::UnsupportedMediaType.into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(response).await["error"], "unsupported_media_type");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::NotFound { resource: "client" };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "client not found");
    }

    #[tokio::test]
    async fn uninitialized_database_is_500() {
        let err = ApiError::database("client", "list", DbError::NotInitialized);
        assert!(matches!(err, ApiError::Unavailable));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "database not initialized");
    }

    #[tokio::test]
    async fn database_error_hides_detail() {
        let err = ApiError::database("client", "insert", DbError::MissingInsertedId);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "could not insert client");
    }
}
