//! Application services — one module per use-case group.

pub mod config_service;
pub mod dispatch_service;
pub mod liveness;
