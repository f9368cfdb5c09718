//! Storage port — whole-collection persistence of relay records.

use std::future::Future;

use voicerelay_domain::config::RelayConfig;
use voicerelay_domain::error::VoiceRelayError;

/// Persists the full, ordered collection of [`RelayConfig`] records.
///
/// There is no partial update and no transaction: callers must
/// read-modify-write the entire collection, and must do so under the
/// exclusion discipline provided by
/// [`SharedStore`](crate::store::SharedStore) — two interleaved load/save
/// halves lose updates via last-writer-wins.
pub trait ConfigStore {
    /// Load the full record list, in store order.
    fn load_all(&self) -> impl Future<Output = Result<Vec<RelayConfig>, VoiceRelayError>> + Send;

    /// Replace the full record list.
    fn save_all(
        &self,
        records: &[RelayConfig],
    ) -> impl Future<Output = Result<(), VoiceRelayError>> + Send;
}

impl<T: ConfigStore + Send + Sync> ConfigStore for std::sync::Arc<T> {
    fn load_all(&self) -> impl Future<Output = Result<Vec<RelayConfig>, VoiceRelayError>> + Send {
        (**self).load_all()
    }

    fn save_all(
        &self,
        records: &[RelayConfig],
    ) -> impl Future<Output = Result<(), VoiceRelayError>> + Send {
        (**self).save_all(records)
    }
}
