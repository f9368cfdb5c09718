//! # voicerelay-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ConfigStore` — whole-collection load/save of relay records
//!   - `ControlPublisher` — publish structured payloads to a topic
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ConfigService` — CRUD over configuration records
//!   - `DispatchService` — text → action → record → control message → publish
//!   - `LivenessTracker` — per-mac online/offline state from inbound signals
//!   - `StatusMonitor` — cancellable periodic sweep task
//! - Provide the **exclusive-access discipline** around the store
//!   ([`store::SharedStore`]): the store has no partial update, so every
//!   read-modify-write runs in a single critical section
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `voicerelay-domain` only (plus `tokio::sync` for locks and
//! channels). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod monitor;
pub mod ports;
pub mod services;
pub mod store;
