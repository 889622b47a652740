//! Whole-file JSON persistence.
//!
//! Every feature document is one JSON file, read fully and rewritten on
//! each mutation. Small interactive state only - the per-store mutex in
//! [`super::FeatureStore`] keeps concurrent read-modify-write cycles from
//! corrupting the file.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::StoreError;

/// Handle to one JSON document on disk.
pub(crate) struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the document, falling back to `T::default()` when the file is
    /// missing or unreadable. Corrupt JSON is logged and treated as absent
    /// rather than surfaced - moderation state must never take the bot down.
    pub(crate) async fn load<T>(&self) -> T
    where
        T: DeserializeOwned + Default,
    {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!("failed to read {}: {}", self.path.display(), e);
                return T::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!("corrupt JSON in {}: {} (using defaults)", self.path.display(), e);
                T::default()
            }
        }
    }

    /// Persist the document, creating parent directories as needed.
    pub(crate) async fn save<T: Serialize>(&self, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}
