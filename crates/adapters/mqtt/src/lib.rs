//! # voicerelay-adapter-mqtt
//!
//! MQTT adapter — the broker-facing edge of voicerelay.
//!
//! ## Responsibilities
//! - Maintain the broker connection and its event loop ([`transport::MqttTransport`])
//! - Implement the `ControlPublisher` port for control and discovery publishes
//! - Classify inbound topics ([`topics::Route`]) and drive the application
//!   services from device signals and CRUD commands ([`service::MqttService`])
//!
//! ## Dependency rule
//! Depends on `voicerelay-app` and `voicerelay-domain`; never the other
//! direction.

pub mod config;
mod error;
pub mod service;
pub mod topics;
pub mod transport;

pub use config::MqttConfig;
pub use error::MqttError;
pub use service::MqttService;
pub use transport::{InboundMessage, MqttTransport};
