use crate::task::TaskServiceError;
use crate::task::validation::ValidationErrors;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable error message
    pub error: String,
    /// Per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

/// Errors a request handler can end with. This is the only place error kinds are mapped to
/// HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The `{id}` path segment is not an integer.
    #[error("Invalid task ID")]
    InvalidTaskId,
    #[error("Task not found")]
    TaskNotFound,
    /// The body could not be read as the expected JSON document.
    #[error("Invalid request body: {0}")]
    MalformedBody(String),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Storage(#[from] TaskServiceError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidTaskId | ApiError::MalformedBody(_) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TaskNotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation(errors) => ErrorResponse {
                error: errors.to_string(),
                details: Some(errors.into_fields()),
            },
            ApiError::Storage(err) => {
                tracing::error!("Storage failure: {}", err);
                ErrorResponse::new(err.to_string())
            }
            other => ErrorResponse::new(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// Turns a panic escaping a handler into a 500 carrying the panic message.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!("Handler panicked: {}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn can_map_not_found_to_404() {
        let response = ApiError::TaskNotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Task not found"})
        );
    }

    #[tokio::test]
    async fn can_map_validation_errors_to_400_with_details() {
        let mut errors = ValidationErrors::default();
        errors.add("status", "Must be one of: pending, in_progress, completed");

        let response = ApiError::from(errors).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "error": "Validation failed",
                "details": {"status": "Must be one of: pending, in_progress, completed"}
            })
        );
    }

    #[tokio::test]
    async fn can_pass_storage_error_message_through_as_500() {
        let err = TaskServiceError::Database(sea_orm::DbErr::Custom("disk I/O error".to_string()));

        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Database error: Custom Error: disk I/O error"})
        );
    }

    #[tokio::test]
    async fn can_handle_handler_panic_with_internal_server_error() {
        async fn panicking_handler() -> &'static str {
            panic!("boom")
        }
        let app = Router::new()
            .route("/panic", axum::routing::get(panicking_handler))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(Request::builder().uri("/panic").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, serde_json::json!({"error": "boom"}));
    }
}
