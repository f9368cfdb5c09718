//! # voicerelay-domain
//!
//! Pure domain model for the voicerelay relay-control system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Records** (stored relay-control configuration entries)
//! - Define the **Command Interpreter** (text → action + object phrase)
//! - Define the **Configuration Resolver** (object phrase → record)
//! - Define the **Dispatch Encoder** (record + action → control message)
//! - Define **Device Status** (online/offline/unknown liveness classification)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod config;
pub mod dispatch;
pub mod part;
pub mod resolve;
pub mod status;
