//! Exclusive-access wrapper around the configuration store.
//!
//! The store exposes only `load_all`/`save_all`, so every mutation is a
//! whole-collection read-modify-write. [`SharedStore`] serialises those
//! sequences through one async mutex: concurrent heartbeat handlers, the
//! periodic sweep, and CRUD calls all funnel through [`SharedStore::update`],
//! which holds the lock across its load *and* save halves. Without this,
//! two concurrent mutations interleave and the second save silently drops
//! the first one's changes.

use std::sync::Arc;

use voicerelay_domain::config::RelayConfig;
use voicerelay_domain::error::VoiceRelayError;

use crate::ports::ConfigStore;

/// Outcome of a mutation closure: whether the record set must be saved.
pub enum Mutation<T> {
    /// The collection was modified; persist it.
    Changed(T),
    /// Nothing changed; skip the save.
    Unchanged(T),
}

struct Inner<S> {
    store: S,
    lock: tokio::sync::Mutex<()>,
}

/// Cheaply cloneable handle giving serialized access to a [`ConfigStore`].
pub struct SharedStore<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ConfigStore + Send + Sync> SharedStore<S> {
    /// Wrap a store in the exclusion discipline.
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Load a consistent snapshot of the record list.
    ///
    /// Takes the lock so a read never observes a half-finished save.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceRelayError::Storage`] when the store read fails.
    pub async fn snapshot(&self) -> Result<Vec<RelayConfig>, VoiceRelayError> {
        let _guard = self.inner.lock.lock().await;
        self.inner.store.load_all().await
    }

    /// Run one read-modify-write sequence as a single critical section.
    ///
    /// Loads the full record list, applies `mutate`, and saves the list
    /// back only when the closure reports [`Mutation::Changed`]. If the
    /// save fails, the error is returned and no in-memory state elsewhere
    /// is affected — there is no partial commit.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceRelayError::Storage`] when loading or saving fails.
    pub async fn update<T, F>(&self, mutate: F) -> Result<T, VoiceRelayError>
    where
        F: FnOnce(&mut Vec<RelayConfig>) -> Mutation<T> + Send,
        T: Send,
    {
        let _guard = self.inner.lock.lock().await;
        let mut records = self.inner.store.load_all().await?;
        match mutate(&mut records) {
            Mutation::Changed(value) => {
                self.inner.store.save_all(&records).await?;
                Ok(value)
            }
            Mutation::Unchanged(value) => Ok(value),
        }
    }
}
