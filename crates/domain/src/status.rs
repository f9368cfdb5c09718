//! Device liveness classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Online/offline classification of a physical unit, distinct from its
/// configuration. Keyed by `mac`, not by record id — one physical unit can
/// expose several pin-level records that all share a liveness state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl DeviceStatus {
    /// Lenient parse for status strings carried by device signals.
    ///
    /// Devices may report values other than `online`/`offline`; anything
    /// unrecognised is classified as [`DeviceStatus::Unknown`].
    #[must_use]
    pub fn from_signal(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "online" => Self::Online,
            "offline" => Self::Offline,
            _ => Self::Unknown,
        }
    }

    /// Whether this status should be considered by the timeout sweep.
    ///
    /// Only a regression from `online` is evidence of offline-ness; a device
    /// that was never seen is not swept.
    #[must_use]
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        };
        f.write_str(text)
    }
}
