//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use voicerelay_domain::error::VoiceRelayError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`VoiceRelayError`] to an HTTP response with appropriate status code.
pub struct ApiError(VoiceRelayError);

impl From<VoiceRelayError> for ApiError {
    fn from(err: VoiceRelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            VoiceRelayError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            VoiceRelayError::Command(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            VoiceRelayError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            VoiceRelayError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            VoiceRelayError::Transport(err) => {
                tracing::error!(error = %err, "transport error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
