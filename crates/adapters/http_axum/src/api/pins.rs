//! JSON REST handler for pin options.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use voicerelay_app::ports::{ConfigStore, ControlPublisher};
use voicerelay_domain::error::{NotFoundError, VoiceRelayError};
use voicerelay_domain::part;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the pin list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<String>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/pins/{part_number}`
///
/// Pin labels the configuration form offers for a given part.
pub async fn list<S, P>(
    State(_state): State<AppState<S, P>>,
    Path(part_number): Path<String>,
) -> Result<ListResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    if part::channel_count(&part_number).is_none() {
        return Err(ApiError::from(VoiceRelayError::NotFound(NotFoundError {
            entity: "part",
            id: part_number,
        })));
    }
    Ok(ListResponse::Ok(Json(part::pin_labels(&part_number))))
}
