//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod configurations;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod pins;
#[allow(clippy::missing_errors_doc)]
pub mod voice;

use axum::Router;
use axum::routing::{get, post, put};

use voicerelay_app::ports::{ConfigStore, ControlPublisher};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, P>() -> Router<AppState<S, P>>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    Router::new()
        // Configuration records
        .route(
            "/configurations",
            get(configurations::list::<S, P>).post(configurations::create::<S, P>),
        )
        .route(
            "/configurations/{id}",
            put(configurations::update::<S, P>).delete(configurations::delete::<S, P>),
        )
        // Device liveness & discovery
        .route("/devices/status/{mac}", get(devices::status::<S, P>))
        .route("/devices/available", get(devices::available::<S, P>))
        .route("/devices/discover", post(devices::discover::<S, P>))
        // Ad-hoc text commands
        .route("/voice/test", post(voice::test::<S, P>))
        // Form support
        .route("/pins/{part_number}", get(pins::list::<S, P>))
}
