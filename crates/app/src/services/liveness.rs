//! Device liveness tracker — classifies each known unit as online/offline
//! from asynchronous signals and a timeout policy.
//!
//! The tracker owns a transient per-`mac` cache in front of the store. The
//! store remains the sole owner of truth: on restart the cache is empty and
//! repopulates lazily from the store or from the next inbound signal.
//! Liveness is per physical unit (`mac`), while configuration is per record
//! (`id`) — a status change fans out to every record sharing the mac.

use std::collections::HashMap;

use chrono::DateTime;
use serde::Serialize;

use voicerelay_domain::error::VoiceRelayError;
use voicerelay_domain::status::DeviceStatus;
use voicerelay_domain::time::now;

use crate::ports::ConfigStore;
use crate::store::{Mutation, SharedStore};

/// Extra grace added to twice the heartbeat interval before a silent
/// device is considered offline.
const SWEEP_GRACE_SECS: u64 = 10;

/// Inbound signal from a device, already stripped of transport framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LivenessSignal {
    /// Periodic keep-alive. Reclassifies as online regardless of prior
    /// state and refreshes `last_seen`.
    Heartbeat {
        mac: String,
        /// Timestamp declared by the device; wall-clock time when absent.
        timestamp: Option<String>,
    },
    /// First contact / discovery response. Treated as online.
    Announce { mac: String },
    /// Explicit status report. Overrides the sweep's classification until
    /// the next heartbeat.
    Status {
        mac: String,
        status: DeviceStatus,
        timestamp: Option<String>,
    },
}

/// Snapshot of one unit's liveness, as returned by [`LivenessTracker::get_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: DeviceStatus,
    pub last_seen: Option<String>,
}

impl StatusReport {
    fn unknown() -> Self {
        Self {
            status: DeviceStatus::Unknown,
            last_seen: None,
        }
    }
}

/// One unit that has made contact since startup, as listed by
/// [`LivenessTracker::available_units`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub mac: String,
    pub status: DeviceStatus,
    pub last_seen: Option<String>,
}

/// Per-process liveness state machine.
///
/// An explicit instance injected into whoever needs liveness — never
/// ambient global state.
pub struct LivenessTracker<S> {
    store: SharedStore<S>,
    cache: tokio::sync::Mutex<HashMap<String, StatusReport>>,
}

impl<S: ConfigStore + Send + Sync> LivenessTracker<S> {
    /// Create a tracker with an empty cache over the given store.
    pub fn new(store: SharedStore<S>) -> Self {
        Self {
            store,
            cache: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Apply one inbound signal.
    ///
    /// # Errors
    ///
    /// Returns a storage error when persisting the status change fails.
    pub async fn apply(&self, signal: LivenessSignal) -> Result<bool, VoiceRelayError> {
        match signal {
            LivenessSignal::Heartbeat { mac, timestamp } => {
                self.update_status(&mac, DeviceStatus::Online, timestamp)
                    .await
            }
            LivenessSignal::Announce { mac } => {
                self.update_status(&mac, DeviceStatus::Online, None).await
            }
            LivenessSignal::Status {
                mac,
                status,
                timestamp,
            } => self.update_status(&mac, status, timestamp).await,
        }
    }

    /// Set the status of every record sharing `mac`, stamping `updated_at`
    /// and persisting the whole record set in one critical section, then
    /// refresh the cache entry.
    ///
    /// Returns whether any record matched. The cache entry is refreshed
    /// even when no record carries the mac, so a unit announcing itself
    /// before anyone configures it still surfaces in liveness queries and
    /// in [`available_units`](Self::available_units). The cache is only
    /// touched after the store round-trip succeeds, so a storage failure
    /// leaves both the store and the cache as they were.
    ///
    /// # Errors
    ///
    /// Returns a storage error when loading or saving fails.
    #[tracing::instrument(skip(self, last_seen), fields(%status))]
    pub async fn update_status(
        &self,
        mac: &str,
        status: DeviceStatus,
        last_seen: Option<String>,
    ) -> Result<bool, VoiceRelayError> {
        let seen = last_seen.unwrap_or_else(|| now().to_rfc3339());

        let matched = self
            .store
            .update(|records| {
                let stamp = now();
                let mut matched = false;
                for record in records.iter_mut().filter(|record| record.mac == mac) {
                    record.status = Some(status);
                    record.last_seen = Some(seen.clone());
                    record.updated_at = stamp;
                    matched = true;
                }
                if matched {
                    Mutation::Changed(true)
                } else {
                    Mutation::Unchanged(false)
                }
            })
            .await?;

        if matched {
            tracing::debug!(mac, %status, "device status updated");
        } else {
            tracing::debug!(mac, %status, "signal from unconfigured unit");
        }
        self.cache.lock().await.insert(
            mac.to_string(),
            StatusReport {
                status,
                last_seen: Some(seen),
            },
        );

        Ok(matched)
    }

    /// Every unit that has made contact since startup, sorted by mac.
    ///
    /// Includes announce-only units with no record yet, which is the list
    /// a configuration front end offers when picking a device to set up.
    pub async fn available_units(&self) -> Vec<UnitReport> {
        let cache = self.cache.lock().await;
        let mut units: Vec<UnitReport> = cache
            .iter()
            .map(|(mac, report)| UnitReport {
                mac: mac.clone(),
                status: report.status,
                last_seen: report.last_seen.clone(),
            })
            .collect();
        units.sort_by(|a, b| a.mac.cmp(&b.mac));
        units
    }

    /// Current liveness of the unit with `mac`.
    ///
    /// Cache hits return immediately; otherwise the persisted records are
    /// scanned (and the cache refilled); a mac no record carries reports
    /// `{unknown, last_seen: None}`.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the fallback scan fails.
    pub async fn get_status(&self, mac: &str) -> Result<StatusReport, VoiceRelayError> {
        if let Some(report) = self.cache.lock().await.get(mac) {
            return Ok(report.clone());
        }

        let records = self.store.snapshot().await?;
        let Some(record) = records.iter().find(|record| record.mac == mac) else {
            return Ok(StatusReport::unknown());
        };

        let report = StatusReport {
            status: record.status.unwrap_or_default(),
            last_seen: record.last_seen.clone(),
        };
        self.cache
            .lock()
            .await
            .insert(mac.to_string(), report.clone());
        Ok(report)
    }

    /// One pass of the timeout policy over all persisted records.
    ///
    /// Only records currently `online` are candidates: absence of heartbeat
    /// is not itself evidence of offline-ness, only a regression from
    /// online is. A record goes offline when the time since `last_seen`
    /// exceeds `2 × heartbeat_interval + 10s`. A record whose `last_seen`
    /// does not parse is logged and skipped for this pass, never crashed
    /// on. Returns the number of records transitioned.
    ///
    /// # Errors
    ///
    /// Returns a storage error when loading or saving fails.
    #[tracing::instrument(skip(self))]
    pub async fn sweep(&self) -> Result<usize, VoiceRelayError> {
        let swept_macs = self
            .store
            .update(|records| {
                let sweep_time = now();
                let mut swept = Vec::new();

                for record in records.iter_mut() {
                    if !record.status.is_some_and(DeviceStatus::is_online) {
                        continue;
                    }
                    let Some(raw) = record.last_seen.as_deref() else {
                        continue;
                    };
                    let last_seen = match DateTime::parse_from_rfc3339(raw) {
                        Ok(parsed) => parsed.to_utc(),
                        Err(err) => {
                            tracing::warn!(
                                mac = %record.mac,
                                last_seen = raw,
                                %err,
                                "unparseable last_seen, skipping record this sweep"
                            );
                            continue;
                        }
                    };

                    let elapsed = (sweep_time - last_seen).num_seconds();
                    let timeout = i64::try_from(2 * record.heartbeat_interval() + SWEEP_GRACE_SECS)
                        .unwrap_or(i64::MAX);
                    if elapsed > timeout {
                        record.status = Some(DeviceStatus::Offline);
                        record.updated_at = sweep_time;
                        tracing::warn!(
                            mac = %record.mac,
                            elapsed_secs = elapsed,
                            timeout_secs = timeout,
                            "device marked offline due to heartbeat timeout"
                        );
                        swept.push(record.mac.clone());
                    }
                }

                if swept.is_empty() {
                    Mutation::Unchanged(swept)
                } else {
                    Mutation::Changed(swept)
                }
            })
            .await?;

        if !swept_macs.is_empty() {
            let mut cache = self.cache.lock().await;
            for mac in &swept_macs {
                if let Some(report) = cache.get_mut(mac) {
                    report.status = DeviceStatus::Offline;
                }
            }
        }

        Ok(swept_macs.len())
    }
}
