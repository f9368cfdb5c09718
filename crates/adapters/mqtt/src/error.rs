//! MQTT adapter error types.

use voicerelay_domain::error::VoiceRelayError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The broker did not acknowledge the connection within the
    /// configured window. The event loop keeps retrying in the
    /// background regardless.
    #[error("broker did not acknowledge the connection in time")]
    ConnectTimeout,

    /// A publish could not even be queued within the configured window,
    /// which means the broker has been unreachable long enough to fill
    /// the request channel.
    #[error("publish timed out before reaching the broker")]
    PublishTimeout,

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// An MQTT payload could not be encoded or decoded as JSON.
    #[error("failed to parse MQTT payload")]
    PayloadParse(#[source] serde_json::Error),
}

impl From<MqttError> for VoiceRelayError {
    fn from(err: MqttError) -> Self {
        Self::Transport(Box::new(err))
    }
}
