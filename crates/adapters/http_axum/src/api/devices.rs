//! JSON REST handlers for device liveness and discovery.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use voicerelay_app::ports::{ConfigStore, ControlPublisher};
use voicerelay_app::services::liveness::{StatusReport, UnitReport};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the status endpoint.
pub enum StatusResponse {
    Ok(Json<StatusReport>),
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the available-units endpoint.
pub enum AvailableResponse {
    Ok(Json<Vec<UnitReport>>),
}

impl IntoResponse for AvailableResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the discover endpoint.
pub enum DiscoverResponse {
    Accepted,
}

impl IntoResponse for DiscoverResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
        }
    }
}

/// `GET /api/devices/status/{mac}`
///
/// Units never seen before report as `unknown` rather than erroring.
pub async fn status<S, P>(
    State(state): State<AppState<S, P>>,
    Path(mac): Path<String>,
) -> Result<StatusResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    let report = state.tracker.get_status(&mac).await?;
    Ok(StatusResponse::Ok(Json(report)))
}

/// `GET /api/devices/available`
///
/// Units that have announced or heartbeated since startup, configured or
/// not — the list a front end offers when picking a device to set up.
pub async fn available<S, P>(
    State(state): State<AppState<S, P>>,
) -> Result<AvailableResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    let units = state.tracker.available_units().await;
    Ok(AvailableResponse::Ok(Json(units)))
}

/// `POST /api/devices/discover`
pub async fn discover<S, P>(
    State(state): State<AppState<S, P>>,
) -> Result<DiscoverResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    state.dispatch.discover_devices().await?;
    Ok(DiscoverResponse::Accepted)
}
