//! Relay configuration record — one stored entry per controllable point.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, VoiceRelayError};
use crate::id::ConfigId;
use crate::part;
use crate::status::DeviceStatus;
use crate::time::Timestamp;

/// Default heartbeat interval, in seconds, for records that do not carry one.
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// One stored device-control configuration entry.
///
/// `id` is globally unique and never reused. `mac` identifies the owning
/// physical unit and **may repeat** across records: one unit exposes several
/// pins, each with its own record, while liveness state is per-`mac`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub id: ConfigId,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Primary lookup key for the resolver. Not guaranteed unique.
    pub object_name: String,
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub part_number: String,
    /// Pin/channel on the physical unit, 1-based.
    pub pin: u8,
    /// Bus address of the unit.
    #[serde(default)]
    pub address: u16,
    #[serde(default)]
    pub device_bus: u8,
    /// Link-layer identifier of the owning unit — the liveness join key.
    pub mac: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Current liveness classification, set by the tracker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
    /// Last heartbeat time, stored verbatim as reported by the device.
    ///
    /// Devices are not trusted to send well-formed timestamps, so the raw
    /// string is kept and parsed lazily during the timeout sweep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    /// Expected heartbeat period in seconds; `None` means the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_interval: Option<u64>,
}

impl RelayConfig {
    /// Create a builder for constructing a [`RelayConfig`].
    #[must_use]
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder::default()
    }

    /// Effective heartbeat interval in seconds.
    #[must_use]
    pub fn heartbeat_interval(&self) -> u64 {
        self.heartbeat_interval
            .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL_SECS)
    }

    /// Check domain invariants.
    ///
    /// Pin range is validated here, at creation/update time — never at
    /// dispatch time.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceRelayError::Validation`] when `object_name` or `mac`
    /// is empty, `pin` is zero, or `pin` exceeds the channel count of a
    /// known part.
    pub fn validate(&self) -> Result<(), VoiceRelayError> {
        if self.object_name.trim().is_empty() {
            return Err(ValidationError::EmptyObjectName.into());
        }
        if self.mac.trim().is_empty() {
            return Err(ValidationError::EmptyMac.into());
        }
        if self.pin == 0 {
            return Err(ValidationError::ZeroPin.into());
        }
        if let Some(max) = part::channel_count(&self.part_number) {
            if self.pin > max {
                return Err(ValidationError::PinOutOfRange {
                    part_number: self.part_number.clone(),
                    pin: self.pin,
                    max,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`RelayConfig`].
///
/// Generates a fresh [`ConfigId`] and stamps both timestamps unless
/// overridden.
#[derive(Debug, Default)]
pub struct RelayConfigBuilder {
    id: Option<ConfigId>,
    description: Option<String>,
    object_name: Option<String>,
    device_name: Option<String>,
    part_number: Option<String>,
    pin: Option<u8>,
    address: Option<u16>,
    device_bus: Option<u8>,
    mac: Option<String>,
    heartbeat_interval: Option<u64>,
}

impl RelayConfigBuilder {
    #[must_use]
    pub fn id(mut self, id: ConfigId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn object_name(mut self, object_name: impl Into<String>) -> Self {
        self.object_name = Some(object_name.into());
        self
    }

    #[must_use]
    pub fn device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }

    #[must_use]
    pub fn part_number(mut self, part_number: impl Into<String>) -> Self {
        self.part_number = Some(part_number.into());
        self
    }

    #[must_use]
    pub fn pin(mut self, pin: u8) -> Self {
        self.pin = Some(pin);
        self
    }

    #[must_use]
    pub fn address(mut self, address: u16) -> Self {
        self.address = Some(address);
        self
    }

    #[must_use]
    pub fn device_bus(mut self, device_bus: u8) -> Self {
        self.device_bus = Some(device_bus);
        self
    }

    #[must_use]
    pub fn mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    #[must_use]
    pub fn heartbeat_interval(mut self, secs: u64) -> Self {
        self.heartbeat_interval = Some(secs);
        self
    }

    /// Consume the builder, validate, and return a [`RelayConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`VoiceRelayError::Validation`] if invariants fail.
    pub fn build(self) -> Result<RelayConfig, VoiceRelayError> {
        let created_at = crate::time::now();
        let config = RelayConfig {
            id: self.id.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            object_name: self.object_name.unwrap_or_default(),
            device_name: self.device_name.unwrap_or_default(),
            part_number: self.part_number.unwrap_or_default(),
            pin: self.pin.unwrap_or(1),
            address: self.address.unwrap_or_default(),
            device_bus: self.device_bus.unwrap_or_default(),
            mac: self.mac.unwrap_or_default(),
            created_at,
            updated_at: created_at,
            status: None,
            last_seen: None,
            heartbeat_interval: self.heartbeat_interval,
        };
        config.validate()?;
        Ok(config)
    }
}
