//! LID-to-phone identity resolution.
//!
//! WhatsApp reports senders either by phone JID or by linked-device LID,
//! and group rosters mix the two. The resolver owns the single mapping
//! table (`lidmap.json`) built from correlations the transport itself
//! asserts in contact/participant metadata. Resolution is best-effort: a
//! LID with no known mapping passes through unchanged and callers must
//! tolerate that, since a sender's first messages can arrive before any
//! metadata does.

use std::collections::HashMap;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error};

use super::Jid;
use crate::store::{JsonFile, Storage};

pub struct IdentityResolver {
    file: JsonFile,
    /// LID user part -> phone number.
    map: DashMap<String, String>,
    /// Serializes persists of the whole table.
    write_lock: Mutex<()>,
}

impl IdentityResolver {
    /// Open the resolver, loading any persisted mapping table.
    pub async fn open(storage: &Storage) -> Self {
        let file = storage.file("lidmap");
        let persisted: HashMap<String, String> = file.load().await;
        let map = DashMap::new();
        for (lid, phone) in persisted {
            map.insert(lid, phone);
        }

        Self {
            file,
            map,
            write_lock: Mutex::new(()),
        }
    }

    /// Map a raw sender identity to its canonical form.
    ///
    /// Phone JIDs (and anything that is not a LID) pass through untouched,
    /// so resolution is idempotent. A LID resolves to the mapped phone JID
    /// when a mapping exists, else it is returned unchanged (degraded mode,
    /// not an error).
    pub fn resolve(&self, jid: &Jid) -> Jid {
        if !jid.is_lid() {
            return jid.clone();
        }

        match self.map.get(&jid.user) {
            Some(phone) => Jid::phone(phone.clone()),
            None => jid.clone(),
        }
    }

    /// Record a phone/LID correlation asserted by transport metadata.
    ///
    /// Idempotent: the table is only persisted when the mapping is new or
    /// changed. Returns whether anything was written. Callers must pass
    /// only correlations the transport itself asserted, never inferred
    /// ones - a wrong entry here would silently misattribute every later
    /// message from that LID.
    pub async fn record(&self, phone: &Jid, lid: &Jid) -> bool {
        if !phone.is_user() || !lid.is_lid() {
            return false;
        }
        let number = phone.user.clone();

        if let Some(existing) = self.map.get(&lid.user)
            && *existing == number
        {
            return false;
        }

        debug!("recording identity mapping {} -> {}", lid, phone);
        self.map.insert(lid.user.clone(), number);
        self.persist().await;
        true
    }

    /// Number of known mappings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    async fn persist(&self) {
        let _guard = self.write_lock.lock().await;
        let snapshot: HashMap<String, String> = self
            .map
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        if let Err(e) = self.file.save(&snapshot).await {
            error!("failed to persist lidmap: {} (keeping in-memory state)", e);
        }
    }
}
