//! Inbound message loop.
//!
//! Consumes everything the transport receives: liveness signals are fed
//! to the tracker, CRUD commands go through the configuration service
//! and get a structured outcome published on the response topic.

use serde::Deserialize;

use tokio::sync::mpsc;

use voicerelay_app::ports::{ConfigStore, ControlPublisher};
use voicerelay_app::services::config_service::{ConfigFilter, ConfigPatch, ConfigService};
use voicerelay_app::services::liveness::{LivenessSignal, LivenessTracker};
use voicerelay_domain::config::RelayConfig;
use voicerelay_domain::error::VoiceRelayError;
use voicerelay_domain::id::ConfigId;
use voicerelay_domain::status::DeviceStatus;

use crate::topics::{self, CommandKind, Route};
use crate::transport::InboundMessage;

/// Body of a create command.
#[derive(Debug, Deserialize)]
struct CreateRequest {
    #[serde(default)]
    description: String,
    object_name: String,
    device_name: String,
    part_number: String,
    pin: u8,
    #[serde(default)]
    address: u16,
    #[serde(default)]
    device_bus: u8,
    mac: String,
    #[serde(default)]
    heartbeat_interval: Option<u64>,
}

impl CreateRequest {
    fn into_record(self) -> Result<RelayConfig, VoiceRelayError> {
        let mut builder = RelayConfig::builder()
            .description(self.description)
            .object_name(self.object_name)
            .device_name(self.device_name)
            .part_number(self.part_number)
            .pin(self.pin)
            .address(self.address)
            .device_bus(self.device_bus)
            .mac(self.mac);
        if let Some(secs) = self.heartbeat_interval {
            builder = builder.heartbeat_interval(secs);
        }
        builder.build()
    }
}

/// Body of an update command: the target id plus the fields to change.
#[derive(Debug, Deserialize)]
struct UpdateRequest {
    id: ConfigId,
    #[serde(flatten)]
    patch: ConfigPatch,
}

/// Body of a delete command.
#[derive(Debug, Deserialize)]
struct DeleteRequest {
    id: ConfigId,
}

/// Optional payload fields shared by heartbeat and status messages.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SignalBody {
    status: Option<String>,
    timestamp: Option<String>,
}

impl SignalBody {
    /// Devices are not trusted to send well-formed JSON; an unreadable
    /// body degrades to an empty one.
    fn parse(payload: &[u8]) -> Self {
        serde_json::from_slice(payload).unwrap_or_default()
    }
}

/// Bridges inbound MQTT traffic into the application services.
pub struct MqttService<S, P> {
    configs: ConfigService<S>,
    tracker: std::sync::Arc<LivenessTracker<S>>,
    publisher: P,
}

impl<S, P> MqttService<S, P>
where
    S: ConfigStore + Send + Sync,
    P: ControlPublisher + Send + Sync,
{
    pub fn new(
        configs: ConfigService<S>,
        tracker: std::sync::Arc<LivenessTracker<S>>,
        publisher: P,
    ) -> Self {
        Self {
            configs,
            tracker,
            publisher,
        }
    }

    /// Drain the inbound channel until the transport closes it.
    pub async fn run(&self, mut inbound: mpsc::Receiver<InboundMessage>) {
        while let Some(message) = inbound.recv().await {
            self.handle(&message.topic, &message.payload).await;
        }
        tracing::debug!("inbound channel closed, stopping");
    }

    /// Handle one inbound message. Failures are logged, never propagated:
    /// a bad message must not take the loop down.
    #[tracing::instrument(skip(self, payload))]
    pub async fn handle(&self, topic: &str, payload: &[u8]) {
        let Some(route) = Route::parse(topic) else {
            tracing::warn!("message on unexpected topic");
            return;
        };
        let result = match route {
            Route::Heartbeat { mac } => {
                let body = SignalBody::parse(payload);
                self.tracker
                    .apply(LivenessSignal::Heartbeat {
                        mac,
                        timestamp: body.timestamp,
                    })
                    .await
                    .map(|_| ())
            }
            Route::Announce { mac } => self
                .tracker
                .apply(LivenessSignal::Announce { mac })
                .await
                .map(|_| ()),
            Route::Status { mac } => {
                let body = SignalBody::parse(payload);
                let status = body
                    .status
                    .as_deref()
                    .map_or(DeviceStatus::Unknown, DeviceStatus::from_signal);
                self.tracker
                    .apply(LivenessSignal::Status {
                        mac,
                        status,
                        timestamp: body.timestamp,
                    })
                    .await
                    .map(|_| ())
            }
            Route::Command(kind) => self.handle_command(kind, payload).await,
        };
        if let Err(err) = result {
            tracing::error!(error = %err, "failed to handle message");
        }
    }

    /// Run one CRUD command and publish its outcome.
    async fn handle_command(
        &self,
        kind: CommandKind,
        payload: &[u8],
    ) -> Result<(), VoiceRelayError> {
        let outcome = self.execute_command(kind, payload).await;
        let response = match outcome {
            Ok(data) => serde_json::json!({
                "status": "success",
                "action": kind.as_str(),
                "data": data,
            }),
            Err(err) => serde_json::json!({
                "status": "error",
                "action": kind.as_str(),
                "message": err.to_string(),
            }),
        };
        self.publisher
            .publish(topics::RESPONSE_RESULT, response)
            .await
    }

    async fn execute_command(
        &self,
        kind: CommandKind,
        payload: &[u8],
    ) -> Result<serde_json::Value, VoiceRelayError> {
        match kind {
            CommandKind::Create => {
                let request: CreateRequest = decode(payload)?;
                let record = self.configs.create(request.into_record()?).await?;
                encode(&record)
            }
            CommandKind::Read => {
                let filter: ConfigFilter = decode(payload)?;
                let records = self.configs.find(&filter).await?;
                encode(&records)
            }
            CommandKind::Update => {
                let request: UpdateRequest = decode(payload)?;
                let record = self.configs.update(request.id, request.patch).await?;
                encode(&record)
            }
            CommandKind::Delete => {
                let request: DeleteRequest = decode(payload)?;
                let record = self.configs.delete(request.id).await?;
                encode(&record)
            }
        }
    }
}

fn decode<'de, T: Deserialize<'de>>(payload: &'de [u8]) -> Result<T, VoiceRelayError> {
    serde_json::from_slice(payload)
        .map_err(crate::error::MqttError::PayloadParse)
        .map_err(Into::into)
}

fn encode<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, VoiceRelayError> {
    serde_json::to_value(value)
        .map_err(crate::error::MqttError::PayloadParse)
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use voicerelay_app::store::SharedStore;
    use voicerelay_domain::config::RelayConfig;
    use voicerelay_domain::error::VoiceRelayError;
    use voicerelay_domain::status::DeviceStatus;

    use super::*;

    struct InMemoryStore {
        records: Mutex<Vec<RelayConfig>>,
    }

    impl ConfigStore for InMemoryStore {
        fn load_all(
            &self,
        ) -> impl Future<Output = Result<Vec<RelayConfig>, VoiceRelayError>> + Send {
            let records = self.records.lock().unwrap().clone();
            async move { Ok(records) }
        }

        fn save_all(
            &self,
            records: &[RelayConfig],
        ) -> impl Future<Output = Result<(), VoiceRelayError>> + Send {
            *self.records.lock().unwrap() = records.to_vec();
            async move { Ok(()) }
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl ControlPublisher for RecordingPublisher {
        fn publish(
            &self,
            topic: &str,
            payload: serde_json::Value,
        ) -> impl Future<Output = Result<(), VoiceRelayError>> + Send {
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), payload));
            async move { Ok(()) }
        }
    }

    fn record(object_name: &str, mac: &str) -> RelayConfig {
        RelayConfig::builder()
            .description("test record")
            .object_name(object_name)
            .device_name("relay one")
            .part_number("RELAYMINI")
            .pin(1)
            .address(32)
            .device_bus(1)
            .mac(mac)
            .build()
            .unwrap()
    }

    fn service(
        records: Vec<RelayConfig>,
        publisher: Arc<RecordingPublisher>,
    ) -> MqttService<InMemoryStore, Arc<RecordingPublisher>> {
        let store = SharedStore::new(InMemoryStore {
            records: Mutex::new(records),
        });
        let tracker = Arc::new(LivenessTracker::new(store.clone()));
        MqttService::new(ConfigService::new(store), tracker, publisher)
    }

    #[tokio::test]
    async fn should_create_record_from_command_and_publish_success() {
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = service(Vec::new(), Arc::clone(&publisher));

        let payload = serde_json::json!({
            "object_name": "lampu ruang meeting",
            "device_name": "relay satu",
            "part_number": "RELAYMINI",
            "pin": 2,
            "mac": "AA:BB:CC:DD:EE:01",
        });
        svc.handle(
            "command/voicerelay/create",
            payload.to_string().as_bytes(),
        )
        .await;

        let records = svc.configs.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].object_name, "lampu ruang meeting");

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let (topic, response) = &published[0];
        assert_eq!(topic, "response/voicerelay/result");
        assert_eq!(response["status"], "success");
        assert_eq!(response["action"], "create");
        assert_eq!(response["data"]["object_name"], "lampu ruang meeting");
    }

    #[tokio::test]
    async fn should_publish_error_response_for_malformed_command_payload() {
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = service(Vec::new(), Arc::clone(&publisher));

        svc.handle("command/voicerelay/create", b"{not json").await;

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let (_, response) = &published[0];
        assert_eq!(response["status"], "error");
        assert_eq!(response["action"], "create");
    }

    #[tokio::test]
    async fn should_publish_error_response_when_deleting_unknown_id() {
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = service(Vec::new(), Arc::clone(&publisher));

        let payload = serde_json::json!({ "id": ConfigId::new() });
        svc.handle(
            "command/voicerelay/delete",
            payload.to_string().as_bytes(),
        )
        .await;

        let published = publisher.published.lock().unwrap();
        let (_, response) = &published[0];
        assert_eq!(response["status"], "error");
        assert!(
            response["message"]
                .as_str()
                .unwrap()
                .contains("not found")
        );
    }

    #[tokio::test]
    async fn should_list_records_for_read_command_with_filter() {
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = service(
            vec![
                record("lampu ruang meeting", "mac-1"),
                record("lampu dapur", "mac-2"),
            ],
            Arc::clone(&publisher),
        );

        let payload = serde_json::json!({ "object_name": "lampu dapur" });
        svc.handle("command/voicerelay/read", payload.to_string().as_bytes())
            .await;

        let published = publisher.published.lock().unwrap();
        let (_, response) = &published[0];
        assert_eq!(response["status"], "success");
        assert_eq!(response["data"].as_array().unwrap().len(), 1);
        assert_eq!(response["data"][0]["object_name"], "lampu dapur");
    }

    #[tokio::test]
    async fn should_mark_device_online_on_heartbeat() {
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = service(
            vec![record("lampu ruang meeting", "mac-1")],
            Arc::clone(&publisher),
        );

        let payload = serde_json::json!({ "timestamp": "2024-05-01T10:00:00+00:00" });
        svc.handle("device/heartbeat/mac-1", payload.to_string().as_bytes())
            .await;

        let report = svc.tracker.get_status("mac-1").await.unwrap();
        assert_eq!(report.status, DeviceStatus::Online);
        assert_eq!(
            report.last_seen.as_deref(),
            Some("2024-05-01T10:00:00+00:00")
        );
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_treat_unreadable_heartbeat_body_as_bare_signal() {
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = service(
            vec![record("lampu ruang meeting", "mac-1")],
            Arc::clone(&publisher),
        );

        svc.handle("device/heartbeat/mac-1", b"ping").await;

        let report = svc.tracker.get_status("mac-1").await.unwrap();
        assert_eq!(report.status, DeviceStatus::Online);
        assert!(report.last_seen.is_some());
    }

    #[tokio::test]
    async fn should_apply_explicit_status_report() {
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = service(
            vec![record("lampu ruang meeting", "mac-1")],
            Arc::clone(&publisher),
        );

        let payload = serde_json::json!({
            "status": "offline",
            "timestamp": "2024-05-01T10:00:00+00:00",
        });
        svc.handle("device/status/mac-1", payload.to_string().as_bytes())
            .await;

        let report = svc.tracker.get_status("mac-1").await.unwrap();
        assert_eq!(report.status, DeviceStatus::Offline);
    }

    #[tokio::test]
    async fn should_warn_and_skip_unknown_topic() {
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = service(Vec::new(), Arc::clone(&publisher));

        svc.handle("some/other/topic", b"{}").await;

        assert!(publisher.published.lock().unwrap().is_empty());
    }
}
