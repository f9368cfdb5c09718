//! Topic layout and inbound routing.
//!
//! Device-facing topics carry the unit's mac address as their last path
//! segment, so one wildcard subscription per concern covers the whole
//! fleet. Command topics are fixed strings, one per CRUD verb.

/// Wildcard filter for periodic keep-alives.
pub const HEARTBEAT_FILTER: &str = "device/heartbeat/+";
/// Wildcard filter for first-contact announcements.
pub const ANNOUNCE_FILTER: &str = "device/announce/+";
/// Wildcard filter for explicit status reports.
pub const STATUS_FILTER: &str = "device/status/+";

/// Record creation requests.
pub const COMMAND_CREATE: &str = "command/voicerelay/create";
/// Record listing requests, optionally carrying a filter payload.
pub const COMMAND_READ: &str = "command/voicerelay/read";
/// Record patch requests.
pub const COMMAND_UPDATE: &str = "command/voicerelay/update";
/// Record removal requests.
pub const COMMAND_DELETE: &str = "command/voicerelay/delete";

/// Outcomes of command requests are published here.
pub const RESPONSE_RESULT: &str = "response/voicerelay/result";

/// Everything the inbound loop needs to see.
pub const SUBSCRIPTIONS: &[&str] = &[
    HEARTBEAT_FILTER,
    ANNOUNCE_FILTER,
    STATUS_FILTER,
    COMMAND_CREATE,
    COMMAND_READ,
    COMMAND_UPDATE,
    COMMAND_DELETE,
];

/// CRUD verb extracted from a command topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Create,
    Read,
    Update,
    Delete,
}

impl CommandKind {
    /// Verb name as used in response payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Classification of one inbound topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Heartbeat { mac: String },
    Announce { mac: String },
    Status { mac: String },
    Command(CommandKind),
}

impl Route {
    /// Classify a concrete inbound topic, or `None` when it matches none
    /// of the subscribed filters.
    pub fn parse(topic: &str) -> Option<Self> {
        match topic {
            COMMAND_CREATE => return Some(Self::Command(CommandKind::Create)),
            COMMAND_READ => return Some(Self::Command(CommandKind::Read)),
            COMMAND_UPDATE => return Some(Self::Command(CommandKind::Update)),
            COMMAND_DELETE => return Some(Self::Command(CommandKind::Delete)),
            _ => {}
        }
        if let Some(mac) = mac_segment(topic, "device/heartbeat/") {
            return Some(Self::Heartbeat { mac });
        }
        if let Some(mac) = mac_segment(topic, "device/announce/") {
            return Some(Self::Announce { mac });
        }
        if let Some(mac) = mac_segment(topic, "device/status/") {
            return Some(Self::Status { mac });
        }
        None
    }
}

/// The mac is whatever fills the wildcard: the last path segment after
/// the fixed prefix, which must be non-empty and a single segment.
fn mac_segment(topic: &str, prefix: &str) -> Option<String> {
    let rest = topic.strip_prefix(prefix)?;
    if rest.is_empty() || rest.contains('/') {
        return None;
    }
    Some(rest.to_string())
}
