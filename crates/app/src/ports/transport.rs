//! Transport port — publish structured payloads by topic.

use std::future::Future;

use voicerelay_domain::error::VoiceRelayError;

/// Publishes a structured payload to a named topic.
///
/// Delivery is at-least-once; a failed publish is reported as
/// [`VoiceRelayError::Transport`] and never retried by the core — retry
/// policy, if any, belongs to the transport itself.
pub trait ControlPublisher {
    /// Publish `payload` to `topic`.
    fn publish(
        &self,
        topic: &str,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<(), VoiceRelayError>> + Send;
}

impl<T: ControlPublisher + Send + Sync> ControlPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        topic: &str,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<(), VoiceRelayError>> + Send {
        (**self).publish(topic, payload)
    }
}
