//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`VoiceRelayError`] at the port boundary. No failure in this crate is
//! fatal — every error is a value the caller can act on.

/// Top-level error type crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum VoiceRelayError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Command interpretation or resolution failed.
    #[error("command error")]
    Command(#[from] CommandError),

    /// The configuration store failed to read or write.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The transport failed to connect or publish.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations on a [`RelayConfig`](crate::config::RelayConfig).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// `object_name` is empty; the resolver has nothing to match against.
    #[error("object name must not be empty")]
    EmptyObjectName,

    /// `mac` is empty; the record cannot be joined to liveness signals.
    #[error("mac address must not be empty")]
    EmptyMac,

    /// `pin` must be at least 1.
    #[error("pin must be a positive integer")]
    ZeroPin,

    /// `pin` exceeds the channel count of the given relay part.
    #[error("pin {pin} is out of range for part {part_number} (max {max})")]
    PinOutOfRange {
        part_number: String,
        pin: u8,
        max: u8,
    },
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Human-readable entity kind, e.g. `"RelayConfig"`.
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

/// Failures along the command interpretation and dispatch pipeline.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    /// No vocabulary phrase occurred in the input text.
    #[error("no action recognised in command")]
    NoAction,

    /// The extraction pass could not isolate an object phrase.
    #[error("no object recognised in command")]
    NoObject,

    /// No stored record matched the extracted object phrase.
    #[error("no configuration matches object '{phrase}'")]
    NoMatch { phrase: String },
}
