//! Configuration service — CRUD use-cases over relay records.

use serde::Deserialize;

use voicerelay_domain::config::RelayConfig;
use voicerelay_domain::error::{NotFoundError, VoiceRelayError};
use voicerelay_domain::id::ConfigId;
use voicerelay_domain::time::now;

use crate::ports::ConfigStore;
use crate::store::{Mutation, SharedStore};

/// Equality filter for listing records, all fields optional and
/// case-insensitive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFilter {
    pub object_name: Option<String>,
    pub device_name: Option<String>,
    pub part_number: Option<String>,
    pub mac: Option<String>,
}

impl ConfigFilter {
    fn matches(&self, record: &RelayConfig) -> bool {
        fn eq(wanted: Option<&String>, actual: &str) -> bool {
            wanted.is_none_or(|value| value.eq_ignore_ascii_case(actual))
        }
        eq(self.object_name.as_ref(), &record.object_name)
            && eq(self.device_name.as_ref(), &record.device_name)
            && eq(self.part_number.as_ref(), &record.part_number)
            && eq(self.mac.as_ref(), &record.mac)
    }
}

/// Partial update applied to an existing record. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub description: Option<String>,
    pub object_name: Option<String>,
    pub device_name: Option<String>,
    pub part_number: Option<String>,
    pub pin: Option<u8>,
    pub address: Option<u16>,
    pub device_bus: Option<u8>,
    pub mac: Option<String>,
    pub heartbeat_interval: Option<u64>,
}

impl ConfigPatch {
    fn apply(&self, record: &mut RelayConfig) {
        if let Some(value) = &self.description {
            record.description.clone_from(value);
        }
        if let Some(value) = &self.object_name {
            record.object_name.clone_from(value);
        }
        if let Some(value) = &self.device_name {
            record.device_name.clone_from(value);
        }
        if let Some(value) = &self.part_number {
            record.part_number.clone_from(value);
        }
        if let Some(value) = self.pin {
            record.pin = value;
        }
        if let Some(value) = self.address {
            record.address = value;
        }
        if let Some(value) = self.device_bus {
            record.device_bus = value;
        }
        if let Some(value) = &self.mac {
            record.mac.clone_from(value);
        }
        if let Some(value) = self.heartbeat_interval {
            record.heartbeat_interval = Some(value);
        }
    }
}

/// Application service for record CRUD. The store owns the truth; every
/// mutation goes through the shared critical section.
pub struct ConfigService<S> {
    store: SharedStore<S>,
}

impl<S: ConfigStore + Send + Sync> ConfigService<S> {
    /// Create a new service over the given shared store.
    pub fn new(store: SharedStore<S>) -> Self {
        Self { store }
    }

    /// Append a new record after validating domain invariants.
    ///
    /// The record's id and timestamps are assigned by
    /// [`RelayConfig::builder`] at construction time.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceRelayError::Validation`] if invariants fail, or a
    /// storage error from the store.
    #[tracing::instrument(skip(self, record), fields(object_name = %record.object_name))]
    pub async fn create(&self, record: RelayConfig) -> Result<RelayConfig, VoiceRelayError> {
        record.validate()?;
        self.store
            .update(|records| {
                records.push(record.clone());
                Mutation::Changed(record)
            })
            .await
    }

    /// List all records, in store order.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the store.
    pub async fn list(&self) -> Result<Vec<RelayConfig>, VoiceRelayError> {
        self.store.snapshot().await
    }

    /// List records matching an equality filter.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the store.
    pub async fn find(&self, filter: &ConfigFilter) -> Result<Vec<RelayConfig>, VoiceRelayError> {
        let records = self.store.snapshot().await?;
        Ok(records
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect())
    }

    /// Look up a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceRelayError::NotFound`] when no record with `id`
    /// exists, or a storage error from the store.
    pub async fn get(&self, id: ConfigId) -> Result<RelayConfig, VoiceRelayError> {
        let records = self.store.snapshot().await?;
        records
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "RelayConfig",
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// Apply a partial update to an existing record, stamping `updated_at`.
    ///
    /// `created_at` and `id` never change. The patched record is
    /// re-validated; an invalid patch leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceRelayError::NotFound`] for an unknown id,
    /// [`VoiceRelayError::Validation`] if the patched record is invalid,
    /// or a storage error from the store.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: ConfigId,
        patch: ConfigPatch,
    ) -> Result<RelayConfig, VoiceRelayError> {
        self.store
            .update(|records| {
                let Some(record) = records.iter_mut().find(|record| record.id == id) else {
                    return Mutation::Unchanged(Err(NotFoundError {
                        entity: "RelayConfig",
                        id: id.to_string(),
                    }
                    .into()));
                };
                patch.apply(record);
                record.updated_at = now();
                if let Err(err) = record.validate() {
                    return Mutation::Unchanged(Err(err));
                }
                Mutation::Changed(Ok(record.clone()))
            })
            .await?
    }

    /// Remove a record by id, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceRelayError::NotFound`] for an unknown id, or a
    /// storage error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ConfigId) -> Result<RelayConfig, VoiceRelayError> {
        self.store
            .update(|records| {
                let Some(index) = records.iter().position(|record| record.id == id) else {
                    return Mutation::Unchanged(Err(NotFoundError {
                        entity: "RelayConfig",
                        id: id.to_string(),
                    }
                    .into()));
                };
                Mutation::Changed(Ok(records.remove(index)))
            })
            .await?
    }
}
