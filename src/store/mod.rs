//! Per-feature configuration storage.
//!
//! One JSON document per feature under the data directory, keyed by chat
//! JID (e.g. `antilink.json: { "<chatId>": {enabled, action} }`), fronted
//! by a write-through cache. Reads never fail; a missing or corrupt file
//! yields feature defaults. Writes are serialized per file and persisted
//! immediately on every mutation.

mod file;
pub mod models;
mod settings;

pub(crate) use file::JsonFile;
pub use settings::{BanStore, Prefix, PrefixStore, SudoStore};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::identity::Jid;
use models::{
    AntilinkConfig, AntimentionConfig, AntiphotoConfig, AntistickerConfig, AntitagConfig,
    AntiwordConfig, CaptureConfig, ChatbotConfig, GreetingConfig, RoleGuardConfig,
};

/// Storage-layer error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Root of the on-disk data directory.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Open (and create if missing) the data directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Handle to `<root>/<name>.json`.
    pub(crate) fn file(&self, name: &str) -> JsonFile {
        JsonFile::new(self.root.join(format!("{name}.json")))
    }
}

/// A per-chat configuration store for one feature.
///
/// `get` returns feature defaults when nothing is stored; `update` merges
/// a mutation into the existing entry and persists synchronously. The
/// whole-file read-modify-write runs under an async mutex so concurrent
/// mutations to different chats cannot corrupt the document.
pub struct FeatureStore<T> {
    name: &'static str,
    file: JsonFile,
    lock: Mutex<()>,
    cache: TypedCache<String, T>,
}

impl<T> FeatureStore<T>
where
    T: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(storage: &Storage, cache: &CacheRegistry, name: &'static str) -> Self {
        let cache = cache.get_or_create(
            name,
            CacheConfig::with_capacity(5_000).ttl(Duration::from_secs(600)),
        );

        Self {
            name,
            file: storage.file(name),
            lock: Mutex::new(()),
            cache,
        }
    }

    /// Get the config for a chat, or defaults if absent. Never fails.
    pub async fn get(&self, chat: &Jid) -> T {
        let key = chat.to_string();
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let _guard = self.lock.lock().await;
        let doc: HashMap<String, T> = self.file.load().await;
        let value = doc.get(&key).cloned().unwrap_or_default();
        self.cache.insert(key, value.clone());
        value
    }

    /// Mutate the config for a chat and persist immediately.
    ///
    /// On write failure the mutated value stays authoritative in the cache
    /// for the rest of the process lifetime.
    pub async fn update<R>(&self, chat: &Jid, f: impl FnOnce(&mut T) -> R) -> R {
        let key = chat.to_string();
        let _guard = self.lock.lock().await;

        let mut doc: HashMap<String, T> = self.file.load().await;
        let entry = doc.entry(key.clone()).or_default();
        let out = f(entry);
        let value = entry.clone();

        if let Err(e) = self.file.save(&doc).await {
            error!("failed to persist {}: {} (keeping in-memory state)", self.name, e);
        }
        self.cache.insert(key, value);
        debug!("updated {} config for chat {}", self.name, chat);

        out
    }

    /// Replace the config for a chat.
    pub async fn set(&self, chat: &Jid, value: T) {
        self.update(chat, |entry| *entry = value).await;
    }

    /// Remove the entry for a chat (explicit reset).
    pub async fn remove(&self, chat: &Jid) {
        let key = chat.to_string();
        let _guard = self.lock.lock().await;

        let mut doc: HashMap<String, T> = self.file.load().await;
        if doc.remove(&key).is_some() {
            if let Err(e) = self.file.save(&doc).await {
                error!("failed to persist {}: {}", self.name, e);
            }
        }
        self.cache.invalidate(&key);
    }

    /// All stored entries, keyed by chat JID string.
    pub async fn entries(&self) -> HashMap<String, T> {
        let _guard = self.lock.lock().await;
        self.file.load().await
    }
}

/// Every feature store, created once and shared through `AppState`.
pub struct Stores {
    pub antilink: FeatureStore<AntilinkConfig>,
    pub antiword: FeatureStore<AntiwordConfig>,
    pub antitag: FeatureStore<AntitagConfig>,
    pub antimention: FeatureStore<AntimentionConfig>,
    pub antisticker: FeatureStore<AntistickerConfig>,
    pub antiphoto: FeatureStore<AntiphotoConfig>,
    pub antipromote: FeatureStore<RoleGuardConfig>,
    pub antidemote: FeatureStore<RoleGuardConfig>,
    pub antiedit: FeatureStore<CaptureConfig>,
    pub antidelete: FeatureStore<CaptureConfig>,
    pub welcome: FeatureStore<GreetingConfig>,
    pub goodbye: FeatureStore<GreetingConfig>,
    pub chatbot: FeatureStore<ChatbotConfig>,
    pub sudo: SudoStore,
    pub banned: BanStore,
    pub prefix: PrefixStore,
}

impl Stores {
    pub fn new(storage: &Storage, cache: &CacheRegistry, default_prefix: &str) -> Arc<Self> {
        Arc::new(Self {
            antilink: FeatureStore::new(storage, cache, "antilink"),
            antiword: FeatureStore::new(storage, cache, "antibadword"),
            antitag: FeatureStore::new(storage, cache, "antitag"),
            antimention: FeatureStore::new(storage, cache, "antigroupmention"),
            antisticker: FeatureStore::new(storage, cache, "antisticker"),
            antiphoto: FeatureStore::new(storage, cache, "antiphoto"),
            antipromote: FeatureStore::new(storage, cache, "antipromote"),
            antidemote: FeatureStore::new(storage, cache, "antidemote"),
            antiedit: FeatureStore::new(storage, cache, "antiedit"),
            antidelete: FeatureStore::new(storage, cache, "antidelete"),
            welcome: FeatureStore::new(storage, cache, "welcome"),
            goodbye: FeatureStore::new(storage, cache, "goodbye"),
            chatbot: FeatureStore::new(storage, cache, "chatbot"),
            sudo: SudoStore::new(storage),
            banned: BanStore::new(storage),
            prefix: PrefixStore::new(storage, default_prefix),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::models::ModAction;

    fn setup() -> (tempfile::TempDir, Storage, Arc<CacheRegistry>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        (dir, storage, Arc::new(CacheRegistry::new()))
    }

    #[tokio::test]
    async fn get_returns_defaults_when_absent() {
        let (_dir, storage, cache) = setup();
        let store: FeatureStore<AntilinkConfig> = FeatureStore::new(&storage, &cache, "antilink");

        let cfg = store.get(&Jid::group("g1")).await;
        assert!(!cfg.enabled);
        assert_eq!(cfg.action, ModAction::Delete);
    }

    #[tokio::test]
    async fn update_merges_and_round_trips() {
        let (_dir, storage, cache) = setup();
        let store: FeatureStore<AntilinkConfig> = FeatureStore::new(&storage, &cache, "antilink");
        let chat = Jid::group("g1");

        store.update(&chat, |c| c.enabled = true).await;
        store.update(&chat, |c| c.action = ModAction::Kick).await;

        let cfg = store.get(&chat).await;
        assert!(cfg.enabled, "earlier field must survive later patch");
        assert_eq!(cfg.action, ModAction::Kick);
    }

    #[tokio::test]
    async fn entries_are_keyed_per_chat() {
        let (_dir, storage, cache) = setup();
        let store: FeatureStore<AntilinkConfig> = FeatureStore::new(&storage, &cache, "antilink");

        store.update(&Jid::group("g1"), |c| c.enabled = true).await;
        store.update(&Jid::group("g2"), |c| c.enabled = false).await;

        let all = store.entries().await;
        assert_eq!(all.len(), 2);
        assert!(all["g1@g.us"].enabled);
        assert!(!all["g2@g.us"].enabled);
    }

    #[tokio::test]
    async fn corrupt_file_yields_defaults() {
        let (dir, storage, cache) = setup();
        std::fs::write(dir.path().join("antilink.json"), b"{ not json").unwrap();
        let store: FeatureStore<AntilinkConfig> = FeatureStore::new(&storage, &cache, "antilink");

        let cfg = store.get(&Jid::group("g1")).await;
        assert!(!cfg.enabled);
    }

    #[tokio::test]
    async fn remove_resets_to_defaults() {
        let (_dir, storage, cache) = setup();
        let store: FeatureStore<AntilinkConfig> = FeatureStore::new(&storage, &cache, "antilink");
        let chat = Jid::group("g1");

        store.update(&chat, |c| c.enabled = true).await;
        store.remove(&chat).await;
        assert!(!store.get(&chat).await.enabled);
    }
}
