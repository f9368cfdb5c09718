//! Broker transport over `rumqttc`.
//!
//! The event loop runs in its own task for the whole process lifetime.
//! rumqttc reconnects on its own as long as the loop is polled, so a
//! broker outage degrades into queued publishes rather than an error
//! surface the services have to care about.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::{mpsc, watch};

use voicerelay_app::ports::ControlPublisher;
use voicerelay_domain::error::VoiceRelayError;

use crate::config::MqttConfig;
use crate::error::MqttError;
use crate::topics;

/// Delivery guarantee for every subscribe and publish. Heartbeats and
/// control messages must survive a flaky link, so at-most-once is not
/// enough.
const DELIVERY_QOS: QoS = QoS::AtLeastOnce;

/// One message received from the broker, stripped down to what the
/// inbound loop needs.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Handle to the broker connection. Cheap to clone.
#[derive(Clone)]
pub struct MqttTransport {
    client: AsyncClient,
    connected: watch::Receiver<bool>,
    request_timeout: Duration,
}

impl MqttTransport {
    /// Build the client and spawn the event-loop task. Inbound publishes
    /// are forwarded on the returned channel until the receiver is
    /// dropped.
    pub fn start(config: &MqttConfig) -> (Self, mpsc::Receiver<InboundMessage>) {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));

        let (client, event_loop) = AsyncClient::new(options, 64);
        let (connected_tx, connected_rx) = watch::channel(false);
        let (inbound_tx, inbound_rx) = mpsc::channel(64);
        tokio::spawn(run_event_loop(event_loop, connected_tx, inbound_tx));

        let transport = Self {
            client,
            connected: connected_rx,
            request_timeout: Duration::from_secs(u64::from(config.connect_timeout_secs)),
        };
        (transport, inbound_rx)
    }

    /// Wait for the broker to acknowledge the connection.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::ConnectTimeout`] when no acknowledgement
    /// arrives within `timeout`. The connection keeps being retried in
    /// the background either way.
    pub async fn wait_connected(&self, timeout: Duration) -> Result<(), MqttError> {
        let mut connected = self.connected.clone();
        match tokio::time::timeout(timeout, connected.wait_for(|up| *up)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(_)) | Err(_) => Err(MqttError::ConnectTimeout),
        }
    }

    /// Subscribe to every topic the inbound loop handles.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] when the request cannot be queued.
    pub async fn subscribe_all(&self) -> Result<(), MqttError> {
        for filter in topics::SUBSCRIPTIONS {
            self.client
                .subscribe(*filter, DELIVERY_QOS)
                .await
                .map_err(MqttError::Client)?;
        }
        Ok(())
    }
}

impl ControlPublisher for MqttTransport {
    /// Queueing the publish is itself bounded: with the broker down the
    /// request channel eventually fills, and a caller must get a
    /// transport error back rather than hang on it.
    #[tracing::instrument(skip(self, payload))]
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), VoiceRelayError> {
        let body = serde_json::to_vec(&payload).map_err(MqttError::PayloadParse)?;
        let request = self.client.publish(topic, DELIVERY_QOS, false, body);
        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(MqttError::Client(err).into()),
            Err(_) => Err(MqttError::PublishTimeout.into()),
        }
    }
}

async fn run_event_loop(
    mut event_loop: rumqttc::EventLoop,
    connected: watch::Sender<bool>,
    inbound: mpsc::Sender<InboundMessage>,
) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                tracing::info!(code = ?ack.code, "connected to broker");
                let _ = connected.send(true);
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let message = InboundMessage {
                    topic: publish.topic.clone(),
                    payload: publish.payload.to_vec(),
                };
                if inbound.send(message).await.is_err() {
                    tracing::debug!("inbound receiver dropped, stopping event loop");
                    break;
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                let _ = connected.send(false);
            }
            Ok(_) => {}
            Err(err) => {
                let _ = connected.send(false);
                tracing::warn!(error = %err, "broker connection lost, retrying");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> MqttConfig {
        MqttConfig {
            broker_host: "127.0.0.1".to_string(),
            // Port 1 is never a broker; connections fail immediately and
            // the request channel is never drained.
            broker_port: 1,
            client_id: "voicerelay-test".to_string(),
            keep_alive_secs: 30,
            connect_timeout_secs: 1,
        }
    }

    #[test]
    fn should_deliver_at_least_once() {
        assert!(matches!(DELIVERY_QOS, QoS::AtLeastOnce));
    }

    #[tokio::test]
    async fn should_report_connect_timeout_when_broker_unreachable() {
        let (transport, _inbound) = MqttTransport::start(&unreachable_config());

        let result = transport.wait_connected(Duration::from_millis(200)).await;

        assert!(matches!(result, Err(MqttError::ConnectTimeout)));
    }

    #[tokio::test]
    async fn should_report_error_instead_of_blocking_when_request_channel_full() {
        let (transport, _inbound) = MqttTransport::start(&unreachable_config());

        // The request channel holds 64 entries; past that, every publish
        // must come back as an error within the bounded wait instead of
        // hanging the caller.
        let outcome = tokio::time::timeout(Duration::from_secs(30), async {
            let mut last = Ok(());
            for n in 0..66 {
                last = transport
                    .publish("modular", serde_json::json!({ "n": n }))
                    .await;
            }
            last
        })
        .await;

        let last = outcome.expect("publishes must not block unboundedly");
        assert!(matches!(last, Err(VoiceRelayError::Transport(_))));
    }
}
