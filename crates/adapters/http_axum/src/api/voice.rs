//! JSON REST handler for ad-hoc text commands.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use voicerelay_app::ports::{ConfigStore, ControlPublisher};
use voicerelay_domain::dispatch::ControlMessage;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body: the raw phrase to run through the pipeline.
#[derive(Deserialize)]
pub struct VoiceTestRequest {
    pub text: String,
}

/// What was understood and dispatched.
#[derive(Serialize)]
pub struct VoiceTestResponse {
    pub dispatched: ControlMessage,
}

/// Possible responses from the test endpoint.
pub enum TestResponse {
    Ok(Json<VoiceTestResponse>),
}

impl IntoResponse for TestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/voice/test`
///
/// Runs the full interpret → resolve → encode → publish pipeline; an
/// unintelligible or unmatched phrase comes back as `400` with the
/// command error message.
pub async fn test<S, P>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<VoiceTestRequest>,
) -> Result<TestResponse, ApiError>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    let dispatched = state.dispatch.dispatch_text(&req.text).await?;
    Ok(TestResponse::Ok(Json(VoiceTestResponse { dispatched })))
}
