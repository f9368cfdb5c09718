//! JSON REST handlers for configuration records.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use voicerelay_app::ports::{ConfigStore, ControlPublisher};
use voicerelay_app::services::config_service::{ConfigFilter, ConfigPatch};
use voicerelay_domain::config::RelayConfig;
use voicerelay_domain::error::{NotFoundError, VoiceRelayError};
use voicerelay_domain::id::ConfigId;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a record.
#[derive(Deserialize)]
pub struct CreateConfigRequest {
    #[serde(default)]
    pub description: String,
    pub object_name: String,
    pub device_name: String,
    pub part_number: String,
    pub pin: u8,
    #[serde(default)]
    pub address: u16,
    #[serde(default)]
    pub device_bus: u8,
    pub mac: String,
    #[serde(default)]
    pub heartbeat_interval: Option<u64>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<RelayConfig>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<RelayConfig>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the update endpoint.
pub enum UpdateResponse {
    Ok(Json<RelayConfig>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// An unparseable id can never name a record, so it reports as not found
/// rather than as a validation failure.
fn parse_id(id: &str) -> Result<ConfigId, ApiError> {
    ConfigId::from_str(id).map_err(|_| {
        ApiError::from(VoiceRelayError::NotFound(NotFoundError {
            entity: "RelayConfig",
            id: id.to_string(),
        }))
    })
}

/// `GET /api/configurations`
pub async fn list<S, P>(
    State(state): State<AppState<S, P>>,
    Query(filter): Query<ConfigFilter>,
) -> Result<ListResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    let records = state.configs.find(&filter).await?;
    Ok(ListResponse::Ok(Json(records)))
}

/// `POST /api/configurations`
pub async fn create<S, P>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<CreateConfigRequest>,
) -> Result<CreateResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    let mut builder = RelayConfig::builder()
        .description(req.description)
        .object_name(req.object_name)
        .device_name(req.device_name)
        .part_number(req.part_number)
        .pin(req.pin)
        .address(req.address)
        .device_bus(req.device_bus)
        .mac(req.mac);
    if let Some(secs) = req.heartbeat_interval {
        builder = builder.heartbeat_interval(secs);
    }
    let record = builder.build()?;
    let created = state.configs.create(record).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/configurations/{id}`
pub async fn update<S, P>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(patch): Json<ConfigPatch>,
) -> Result<UpdateResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let updated = state.configs.update(id, patch).await?;
    Ok(UpdateResponse::Ok(Json(updated)))
}

/// `DELETE /api/configurations/{id}`
pub async fn delete<S, P>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    state.configs.delete(id).await?;
    Ok(DeleteResponse::NoContent)
}
