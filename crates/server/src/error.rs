use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use fragments_core::FragmentError;

/// Errors that can occur when running the fragments server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A model, conversion or storage error surfaced through the API.
    #[error(transparent)]
    Fragment(#[from] FragmentError),

    /// Authentication failed (missing or invalid credentials).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A background task failed to complete.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Fragment(e) => match e {
                FragmentError::Validation(_) | FragmentError::TypeMismatch { .. } => {
                    StatusCode::BAD_REQUEST
                }
                FragmentError::NotFound { .. } => StatusCode::NOT_FOUND,
                FragmentError::UnsupportedType(_) | FragmentError::UnsupportedConversion { .. } => {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE
                }
                FragmentError::Conversion(_) | FragmentError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

/// The error envelope: `{"status":"error","error":{"code":N,"message":"..."}}`.
pub fn error_body(status: StatusCode, message: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "error",
        "error": {
            "code": status.as_u16(),
            "message": message,
        },
    })
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = error_body(status, &self.to_string());
        let mut response = (status, axum::Json(body)).into_response();

        if matches!(self, Self::Unauthorized(_)) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"fragments\""),
            );
        }

        response
    }
}
