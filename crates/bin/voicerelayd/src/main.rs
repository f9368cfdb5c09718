//! # voicerelayd — voicerelay daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Open the JSON record store and wrap it in the shared critical section
//! - Construct application services, injecting the store via port traits
//! - Connect to the MQTT broker, subscribe, and run the inbound loop
//! - Start the periodic liveness sweep
//! - Build the axum router, bind to a TCP port, and serve
//! - Handle graceful shutdown (SIGINT), stopping the sweep with a bounded
//!   join
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use voicerelay_adapter_http_axum::router;
use voicerelay_adapter_http_axum::state::AppState;
use voicerelay_adapter_mqtt::{MqttService, MqttTransport};
use voicerelay_adapter_storage_json::JsonConfigStore;
use voicerelay_app::monitor::StatusMonitor;
use voicerelay_app::services::config_service::ConfigService;
use voicerelay_app::services::dispatch_service::DispatchService;
use voicerelay_app::services::liveness::LivenessTracker;
use voicerelay_app::store::SharedStore;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Storage
    let store = SharedStore::new(JsonConfigStore::new(&config.storage.path));

    // Services
    let configs = Arc::new(ConfigService::new(store.clone()));
    let tracker = Arc::new(LivenessTracker::new(store.clone()));

    // MQTT
    let (transport, inbound) = MqttTransport::start(&config.mqtt);
    let connect_timeout = Duration::from_secs(u64::from(config.mqtt.connect_timeout_secs));
    if let Err(err) = transport.wait_connected(connect_timeout).await {
        tracing::warn!(error = %err, "broker not reachable yet, continuing without it");
    }
    if let Err(err) = transport.subscribe_all().await {
        tracing::warn!(error = %err, "failed to queue subscriptions");
    }

    let dispatch = Arc::new(DispatchService::new(store.clone(), transport.clone()));

    let mqtt_service = MqttService::new(
        ConfigService::new(store.clone()),
        Arc::clone(&tracker),
        transport.clone(),
    );
    tokio::spawn(async move {
        mqtt_service.run(inbound).await;
    });

    // Liveness sweep
    let monitor = StatusMonitor::start(
        Arc::clone(&tracker),
        Duration::from_secs(config.monitor.sweep_period_secs),
    );

    // HTTP
    let state = AppState::new(configs, dispatch, tracker);
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "voicerelayd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    monitor.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
