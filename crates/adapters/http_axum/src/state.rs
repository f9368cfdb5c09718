//! Shared application state for axum handlers.

use std::sync::Arc;

use voicerelay_app::ports::{ConfigStore, ControlPublisher};
use voicerelay_app::services::config_service::ConfigService;
use voicerelay_app::services::dispatch_service::DispatchService;
use voicerelay_app::services::liveness::LivenessTracker;

/// Application state shared across all axum handlers.
///
/// Generic over the store and publisher types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do
/// not need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<S, P> {
    /// Record CRUD service.
    pub configs: Arc<ConfigService<S>>,
    /// Text command pipeline.
    pub dispatch: Arc<DispatchService<S, P>>,
    /// Per-mac liveness state.
    pub tracker: Arc<LivenessTracker<S>>,
}

impl<S, P> Clone for AppState<S, P> {
    fn clone(&self) -> Self {
        Self {
            configs: Arc::clone(&self.configs),
            dispatch: Arc::clone(&self.dispatch),
            tracker: Arc::clone(&self.tracker),
        }
    }
}

impl<S, P> AppState<S, P>
where
    S: ConfigStore + Send + Sync + 'static,
    P: ControlPublisher + Send + Sync + 'static,
{
    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// The tracker in particular is shared with the background sweep task,
    /// so construction from `Arc`s is the only entry point.
    pub fn new(
        configs: Arc<ConfigService<S>>,
        dispatch: Arc<DispatchService<S, P>>,
        tracker: Arc<LivenessTracker<S>>,
    ) -> Self {
        Self {
            configs,
            dispatch,
            tracker,
        }
    }
}
