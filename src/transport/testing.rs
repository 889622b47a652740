//! In-memory transport double for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{
    GroupMetadata, Participant, ParticipantRole, ParticipantUpdate, Transport, TransportError,
};
use crate::identity::Jid;

/// A message recorded by [`MemoryTransport::send_text`]/`send_mention`.
#[derive(Debug, Clone)]
pub(crate) struct SentMessage {
    pub chat: Jid,
    pub text: String,
    pub mentions: Vec<Jid>,
}

/// Records every side effect; group metadata is seeded by tests.
pub(crate) struct MemoryTransport {
    self_jid: Jid,
    groups: Mutex<HashMap<String, GroupMetadata>>,
    pub sent: Mutex<Vec<SentMessage>>,
    pub deleted: Mutex<Vec<(Jid, String)>>,
    pub participant_updates: Mutex<Vec<(Jid, Vec<Jid>, ParticipantUpdate)>>,
    /// Make `group_metadata` fail, for fail-closed tests.
    pub fail_metadata: AtomicBool,
    /// Make `update_participants` fail, for guarded-side-effect tests.
    pub fail_participant_updates: AtomicBool,
}

impl MemoryTransport {
    pub fn new(self_jid: Jid) -> Self {
        Self {
            self_jid,
            groups: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            participant_updates: Mutex::new(Vec::new()),
            fail_metadata: AtomicBool::new(false),
            fail_participant_updates: AtomicBool::new(false),
        }
    }

    pub fn seed_group(&self, meta: GroupMetadata) {
        self.groups.lock().insert(meta.id.to_string(), meta);
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|m| m.text.clone()).collect()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().iter().map(|(_, id)| id.clone()).collect()
    }
}

/// Roster-building helper for tests.
pub(crate) fn participant(jid: Jid, lid: Option<Jid>, role: ParticipantRole) -> Participant {
    Participant { jid, lid, role }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn self_jid(&self) -> Jid {
        self.self_jid.clone()
    }

    async fn send_text(&self, chat: &Jid, text: &str) -> Result<(), TransportError> {
        self.sent.lock().push(SentMessage {
            chat: chat.clone(),
            text: text.to_string(),
            mentions: Vec::new(),
        });
        Ok(())
    }

    async fn send_mention(
        &self,
        chat: &Jid,
        text: &str,
        mentions: &[Jid],
    ) -> Result<(), TransportError> {
        self.sent.lock().push(SentMessage {
            chat: chat.clone(),
            text: text.to_string(),
            mentions: mentions.to_vec(),
        });
        Ok(())
    }

    async fn delete_message(&self, chat: &Jid, message_id: &str) -> Result<(), TransportError> {
        self.deleted.lock().push((chat.clone(), message_id.to_string()));
        Ok(())
    }

    async fn group_metadata(&self, chat: &Jid) -> Result<GroupMetadata, TransportError> {
        if self.fail_metadata.load(Ordering::SeqCst) {
            return Err(TransportError::Request("metadata unavailable".into()));
        }
        self.groups
            .lock()
            .get(&chat.to_string())
            .cloned()
            .ok_or_else(|| TransportError::Request(format!("unknown group {chat}")))
    }

    async fn update_participants(
        &self,
        chat: &Jid,
        participants: &[Jid],
        action: ParticipantUpdate,
    ) -> Result<(), TransportError> {
        if self.fail_participant_updates.load(Ordering::SeqCst) {
            return Err(TransportError::Request("not permitted".into()));
        }
        self.participant_updates
            .lock()
            .push((chat.clone(), participants.to_vec(), action));
        Ok(())
    }
}
