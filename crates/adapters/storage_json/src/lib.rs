//! # voicerelay-adapter-storage-json
//!
//! JSON file implementation of the [`ConfigStore`] port.
//!
//! The whole record list lives in one JSON file and is read/written
//! wholesale — last writer wins over the entire collection. No partial
//! updates, no transactions: the exclusion discipline lives in
//! `voicerelay_app::store::SharedStore`, not here.
//!
//! ## Dependency rule
//! Depends on `voicerelay-app` (for the port trait) and
//! `voicerelay-domain`. Never the reverse.

mod error;

pub use error::JsonStoreError;

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use voicerelay_app::ports::ConfigStore;
use voicerelay_domain::config::RelayConfig;
use voicerelay_domain::error::VoiceRelayError;

/// Accepts both the current bare-array layout and the legacy
/// `{"configurations": [...]}` wrapper.
#[derive(Deserialize)]
#[serde(untagged)]
enum FileLayout {
    Bare(Vec<RelayConfig>),
    Wrapped { configurations: Vec<RelayConfig> },
}

impl From<FileLayout> for Vec<RelayConfig> {
    fn from(layout: FileLayout) -> Self {
        match layout {
            FileLayout::Bare(records) | FileLayout::Wrapped {
                configurations: records,
            } => records,
        }
    }
}

/// File-backed configuration store.
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Create a store over the given file path. The file is created on the
    /// first save; a missing file reads as an empty collection.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<RelayConfig>, JsonStoreError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(err) => return Err(JsonStoreError::Io(err)),
        };

        let layout: FileLayout = serde_json::from_slice(&content)?;
        Ok(layout.into())
    }

    async fn write_records(&self, records: &[RelayConfig]) -> Result<(), JsonStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

impl ConfigStore for JsonConfigStore {
    fn load_all(&self) -> impl Future<Output = Result<Vec<RelayConfig>, VoiceRelayError>> + Send {
        async move {
            self.read_records().await.map_err(|err| {
                tracing::error!(path = %self.path.display(), error = %err, "failed to load records");
                err.into()
            })
        }
    }

    fn save_all(
        &self,
        records: &[RelayConfig],
    ) -> impl Future<Output = Result<(), VoiceRelayError>> + Send {
        async move {
            self.write_records(records).await.map_err(|err| {
                tracing::error!(path = %self.path.display(), error = %err, "failed to save records");
                err.into()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(object_name: &str) -> RelayConfig {
        RelayConfig::builder()
            .object_name(object_name)
            .mac("70:f7:54:cb:7a:93")
            .part_number("RELAYMINI")
            .pin(1)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_read_missing_file_as_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("missing.json"));

        let records = store.load_all().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn should_roundtrip_records_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("config.json"));

        let original = record("lampu utama");
        store.save_all(&[original.clone()]).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, original.id);
        assert_eq!(loaded[0].object_name, "lampu utama");
    }

    #[tokio::test]
    async fn should_create_parent_directories_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("nested/deeper/config.json"));

        store.save_all(&[record("lampu")]).await.unwrap();
        assert_eq!(store.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_accept_legacy_wrapped_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let inner = serde_json::to_value(vec![record("lampu lama")]).unwrap();
        let wrapped = serde_json::json!({ "configurations": inner });
        std::fs::write(&path, serde_json::to_vec(&wrapped).unwrap()).unwrap();

        let store = JsonConfigStore::new(path);
        let records = store.load_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].object_name, "lampu lama");
    }

    #[tokio::test]
    async fn should_report_malformed_file_as_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = JsonConfigStore::new(path);
        let result = store.load_all().await;
        assert!(matches!(result, Err(VoiceRelayError::Storage(_))));
    }
}
