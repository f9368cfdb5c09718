//! # voicerelay-adapter-http-axum
//!
//! HTTP adapter — the JSON REST surface over the voicerelay services.
//!
//! ## Responsibilities
//! - Assemble the axum [`Router`](axum::Router) ([`router::build`])
//! - Map domain errors to HTTP status codes ([`error::ApiError`])
//! - Expose record CRUD, liveness queries, discovery, ad-hoc text
//!   commands, and pin options under `/api`
//!
//! ## Dependency rule
//! Depends on `voicerelay-app` and `voicerelay-domain`; never the other
//! direction.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

pub use state::AppState;
