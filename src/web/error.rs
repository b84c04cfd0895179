//! API error type shared by all handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::error;

use crate::data::store::StoreError;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn invalid_platform(raw: &str) -> Self {
        Self::bad_request(format!("unknown platform: {raw}"))
    }

    pub fn invalid_status(raw: &str) -> Self {
        Self::bad_request(format!("unknown status: {raw}"))
    }
}

/// Logs the underlying store failure and returns an opaque 500.
pub fn db_error(err: StoreError) -> ApiError {
    error!(error = %err, "store query failed");
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "internal server error".to_owned(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.message,
        }));
        (self.status, body).into_response()
    }
}
