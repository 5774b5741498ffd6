use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use service::errors::ServiceError;

/// HTTP-facing error: a status plus a short reason rendered as
/// `{"error": ...}`, the body shape both emulated vendors use here.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg),
            ServiceError::Model(e) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }
}
