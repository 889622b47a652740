//! Global (non-per-chat) settings stores: sudo list, banned senders,
//! command prefix.
//!
//! These are checked on every inbound message, so each store keeps the
//! loaded document in memory and treats it as authoritative; disk writes
//! are best-effort (logged on failure, never fatal).

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::error;

use super::{JsonFile, Storage};

/// JSON-array-backed list of phone-number strings.
struct ListStore {
    name: &'static str,
    file: JsonFile,
    lock: Mutex<()>,
    cached: RwLock<Option<Vec<String>>>,
}

impl ListStore {
    fn new(storage: &Storage, name: &'static str) -> Self {
        Self {
            name,
            file: storage.file(name),
            lock: Mutex::new(()),
            cached: RwLock::new(None),
        }
    }

    async fn list(&self) -> Vec<String> {
        if let Some(list) = self.cached.read().clone() {
            return list;
        }
        let _guard = self.lock.lock().await;
        // Re-check: another task may have loaded while we waited.
        if let Some(list) = self.cached.read().clone() {
            return list;
        }
        let list: Vec<String> = self.file.load().await;
        *self.cached.write() = Some(list.clone());
        list
    }

    async fn contains(&self, value: &str) -> bool {
        self.list().await.iter().any(|v| v == value)
    }

    async fn add(&self, value: &str) -> bool {
        let _guard = self.lock.lock().await;
        let mut list: Vec<String> = self.file.load().await;
        if list.iter().any(|v| v == value) {
            *self.cached.write() = Some(list);
            return false;
        }
        list.push(value.to_string());
        if let Err(e) = self.file.save(&list).await {
            error!("failed to persist {}: {}", self.name, e);
        }
        *self.cached.write() = Some(list);
        true
    }

    async fn remove(&self, value: &str) -> bool {
        let _guard = self.lock.lock().await;
        let mut list: Vec<String> = self.file.load().await;
        let Some(pos) = list.iter().position(|v| v == value) else {
            *self.cached.write() = Some(list);
            return false;
        };
        list.remove(pos);
        if let Err(e) = self.file.save(&list).await {
            error!("failed to persist {}: {}", self.name, e);
        }
        *self.cached.write() = Some(list);
        true
    }
}

/// Phone numbers granted owner-adjacent privileges.
///
/// The configured owner number is implicitly privileged and never stored
/// here; the authorization gate checks it first.
pub struct SudoStore(ListStore);

impl SudoStore {
    pub fn new(storage: &Storage) -> Self {
        Self(ListStore::new(storage, "sudo"))
    }

    pub async fn is_sudo(&self, number: &str) -> bool {
        self.0.contains(number).await
    }

    pub async fn add(&self, number: &str) -> bool {
        self.0.add(number).await
    }

    pub async fn remove(&self, number: &str) -> bool {
        self.0.remove(number).await
    }

    pub async fn list(&self) -> Vec<String> {
        self.0.list().await
    }
}

/// Senders the bot ignores entirely.
pub struct BanStore(ListStore);

impl BanStore {
    pub fn new(storage: &Storage) -> Self {
        Self(ListStore::new(storage, "banned"))
    }

    pub async fn is_banned(&self, number: &str) -> bool {
        self.0.contains(number).await
    }

    pub async fn add(&self, number: &str) -> bool {
        self.0.add(number).await
    }

    pub async fn remove(&self, number: &str) -> bool {
        self.0.remove(number).await
    }

    pub async fn list(&self) -> Vec<String> {
        self.0.list().await
    }
}

/// The global command prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prefix {
    /// Commands start with this marker (1-3 characters).
    Symbol(String),
    /// Bare-keyword mode: any message whose first word is a command name.
    None,
}

impl Prefix {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Some(Self::None);
        }
        if s.is_empty() || s.chars().count() > 3 || s.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Self::Symbol(s.to_string()))
    }

    pub fn display(&self) -> &str {
        match self {
            Self::Symbol(s) => s,
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PrefixDoc {
    #[serde(default)]
    prefix: Option<String>,
}

/// Store for the global prefix (`prefix.json: {"prefix": "." | "none"}`).
pub struct PrefixStore {
    file: JsonFile,
    lock: Mutex<()>,
    default: String,
    cached: RwLock<Option<Prefix>>,
}

impl PrefixStore {
    pub fn new(storage: &Storage, default: &str) -> Self {
        Self {
            file: storage.file("prefix"),
            lock: Mutex::new(()),
            default: default.to_string(),
            cached: RwLock::new(None),
        }
    }

    pub async fn get(&self) -> Prefix {
        if let Some(p) = self.cached.read().clone() {
            return p;
        }
        let _guard = self.lock.lock().await;
        if let Some(p) = self.cached.read().clone() {
            return p;
        }
        let doc: PrefixDoc = self.file.load().await;
        let prefix = doc
            .prefix
            .as_deref()
            .and_then(Prefix::parse)
            .unwrap_or_else(|| {
                Prefix::parse(&self.default).unwrap_or_else(|| Prefix::Symbol(".".to_string()))
            });
        *self.cached.write() = Some(prefix.clone());
        prefix
    }

    pub async fn set(&self, prefix: Prefix) {
        let _guard = self.lock.lock().await;
        let doc = PrefixDoc {
            prefix: Some(prefix.display().to_string()),
        };
        if let Err(e) = self.file.save(&doc).await {
            error!("failed to persist prefix: {}", e);
        }
        *self.cached.write() = Some(prefix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn sudo_add_remove_round_trip() {
        let (_dir, storage) = setup();
        let sudo = SudoStore::new(&storage);

        assert!(sudo.add("254700000000").await);
        assert!(!sudo.add("254700000000").await, "duplicate add is a no-op");
        assert!(sudo.is_sudo("254700000000").await);

        assert!(sudo.remove("254700000000").await);
        assert!(!sudo.is_sudo("254700000000").await);
        assert!(!sudo.remove("254700000000").await);
    }

    #[tokio::test]
    async fn ban_list_persists_across_handles() {
        let (_dir, storage) = setup();
        BanStore::new(&storage).add("254711111111").await;

        // A fresh handle must see the persisted entry.
        let banned = BanStore::new(&storage);
        assert!(banned.is_banned("254711111111").await);
    }

    #[tokio::test]
    async fn prefix_defaults_then_persists() {
        let (_dir, storage) = setup();
        let store = PrefixStore::new(&storage, ".");
        assert_eq!(store.get().await, Prefix::Symbol(".".to_string()));

        store.set(Prefix::None).await;
        assert_eq!(store.get().await, Prefix::None);

        let fresh = PrefixStore::new(&storage, ".");
        assert_eq!(fresh.get().await, Prefix::None);
    }

    #[test]
    fn prefix_parsing_rules() {
        assert_eq!(Prefix::parse("none"), Some(Prefix::None));
        assert_eq!(Prefix::parse("!"), Some(Prefix::Symbol("!".into())));
        assert_eq!(Prefix::parse("!!!!"), None, "prefix is capped at 3 chars");
        assert_eq!(Prefix::parse(""), None);
    }
}
