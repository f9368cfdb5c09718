//! Dispatch service — the interpreter → resolver → encoder → publish
//! pipeline.

use voicerelay_domain::command;
use voicerelay_domain::dispatch::{self, CONTROL_TOPIC, ControlMessage};
use voicerelay_domain::error::{CommandError, VoiceRelayError};
use voicerelay_domain::resolve;
use voicerelay_domain::time::now;

use crate::ports::{ConfigStore, ControlPublisher};
use crate::store::SharedStore;

/// Topic on which a request-all discovery broadcast is published.
pub const DISCOVERY_TOPIC: &str = "device/discovery";

/// Application service for the synchronous dispatch path.
///
/// Invoked once per incoming command; the only suspension point beyond the
/// store snapshot is the transport publish, which may block with a bounded
/// wait and is treated as fallible, not cancellable mid-flight.
pub struct DispatchService<S, P> {
    store: SharedStore<S>,
    publisher: P,
}

impl<S, P> DispatchService<S, P>
where
    S: ConfigStore + Send + Sync,
    P: ControlPublisher,
{
    /// Create a new service over the given store and publisher.
    pub fn new(store: SharedStore<S>, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// Run the full pipeline for one piece of command text.
    ///
    /// Returns the published [`ControlMessage`] on success.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceRelayError::Command`] when no action is recognised,
    /// no object phrase can be extracted, or no record matches;
    /// [`VoiceRelayError::Storage`] when the snapshot fails; and
    /// [`VoiceRelayError::Transport`] when the publish fails. Publish
    /// failures are reported, never retried here.
    #[tracing::instrument(skip(self))]
    pub async fn dispatch_text(&self, text: &str) -> Result<ControlMessage, VoiceRelayError> {
        let command = command::interpret(text)?;
        tracing::debug!(
            action = ?command.action,
            object = %command.object_phrase,
            "command interpreted"
        );

        let records = self.store.snapshot().await?;
        let record = resolve::resolve(&command.object_phrase, &records).ok_or_else(|| {
            CommandError::NoMatch {
                phrase: command.object_phrase.clone(),
            }
        })?;

        let message = dispatch::encode(record, command.action, now());
        let payload = serde_json::to_value(&message)
            .map_err(|err| VoiceRelayError::Transport(Box::new(err)))?;
        self.publisher.publish(CONTROL_TOPIC, payload).await?;

        tracing::info!(
            mac = %message.mac,
            object_name = %record.object_name,
            level = message.value.data,
            "control message dispatched"
        );
        Ok(message)
    }

    /// Broadcast a request-all discovery signal.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceRelayError::Transport`] when the publish fails.
    #[tracing::instrument(skip(self))]
    pub async fn discover_devices(&self) -> Result<(), VoiceRelayError> {
        let payload = serde_json::json!({
            "request": "all",
            "timestamp": now().to_rfc3339(),
        });
        self.publisher.publish(DISCOVERY_TOPIC, payload).await?;
        tracing::info!("device discovery request sent");
        Ok(())
    }
}
