//! Edit and delete capture.
//!
//! Every inbound message is copied into a bounded in-memory buffer. When
//! the transport later reports an edit or a revoke, the original is
//! looked up by id and the configured targets get a notice with the
//! captured content. Originals from before the bot started are simply
//! unknown and ignored.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::bot::dispatcher::AppState;
use crate::bot::normalize::{MediaKind, NormalizedMessage, content_parts};
use crate::identity::Jid;
use crate::store::models::CaptureConfig;
use crate::transport::{MessageEditedEvent, MessageRevokedEvent};
use crate::utils::{mention, preview};

/// A captured copy of one message.
#[derive(Debug, Clone)]
pub struct CapturedMessage {
    pub id: String,
    pub chat: Jid,
    pub sender: Jid,
    pub text: String,
    pub media: MediaKind,
    pub timestamp: DateTime<Utc>,
}

struct Inner {
    entries: HashMap<String, CapturedMessage>,
    /// Insertion order for eviction.
    order: VecDeque<String>,
}

/// Bounded message buffer, oldest entry evicted first once full.
pub struct CaptureBuffer {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl CaptureBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    fn key(chat: &Jid, id: &str) -> String {
        format!("{chat}/{id}")
    }

    /// Store a copy, evicting the oldest entry when at capacity.
    pub fn store(&self, captured: CapturedMessage) {
        let key = Self::key(&captured.chat, &captured.id);
        let mut inner = self.inner.lock();

        if inner.entries.insert(key.clone(), captured).is_none() {
            inner.order.push_back(key);
            while inner.entries.len() > self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                }
            }
        }
    }

    pub fn get(&self, chat: &Jid, id: &str) -> Option<CapturedMessage> {
        self.inner.lock().entries.get(&Self::key(chat, id)).cloned()
    }

    /// Replace the stored text for an already-captured message.
    pub fn update_text(&self, chat: &Jid, id: &str, text: &str) {
        if let Some(entry) = self.inner.lock().entries.get_mut(&Self::key(chat, id)) {
            entry.text = text.to_string();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn media_label(media: MediaKind) -> Option<&'static str> {
    match media {
        MediaKind::None => None,
        MediaKind::Image => Some("photo"),
        MediaKind::Video => Some("video"),
        MediaKind::Sticker => Some("sticker"),
        MediaKind::Audio => Some("audio"),
        MediaKind::Document => Some("document"),
        MediaKind::Unknown => Some("attachment"),
    }
}

/// Capture an inbound message. Called for every message the dispatcher
/// sees, commands included, so later edits of anything can be diffed.
pub fn on_message(state: &AppState, msg: &NormalizedMessage) {
    state.captures.store(CapturedMessage {
        id: msg.id.clone(),
        chat: msg.chat.clone(),
        sender: msg.sender.clone(),
        text: msg.text.clone(),
        media: msg.media,
        timestamp: msg.timestamp,
    });
}

/// Deliver a capture notice to the targets the config selects.
async fn notify(state: &AppState, config: &CaptureConfig, chat: &Jid, body: &str) {
    if config.notify.includes_owner() {
        let owner = Jid::phone(state.settings.owner_number.clone());
        if let Err(e) = state.transport.send_text(&owner, body).await {
            warn!("failed to notify owner: {}", e);
        }
    }
    if config.notify.includes_chat() {
        if let Err(e) = state.transport.send_text(chat, body).await {
            warn!("failed to notify chat {}: {}", chat, e);
        }
    }
}

/// Handle a "message was edited" event.
pub async fn on_edited(state: &AppState, ev: &MessageEditedEvent) {
    let config = state.stores.antiedit.get(&ev.chat).await;
    if !config.enabled {
        return;
    }

    let Some(original) = state.captures.get(&ev.chat, &ev.id) else {
        debug!("edit of unknown message {} in {} (ignored)", ev.id, ev.chat);
        return;
    };

    let (new_text, _) = content_parts(&ev.new_content);
    if new_text == original.text {
        return;
    }

    let body = format!(
        "✏️ {} edited a message in {}\n\nBefore:\n{}\n\nAfter:\n{}",
        mention(&original.sender),
        ev.chat,
        preview(&original.text, 1000),
        preview(&new_text, 1000),
    );
    notify(state, &config, &ev.chat, &body).await;

    state.captures.update_text(&ev.chat, &ev.id, &new_text);
}

/// Handle a "message was revoked" event.
pub async fn on_revoked(state: &AppState, ev: &MessageRevokedEvent) {
    let config = state.stores.antidelete.get(&ev.chat).await;
    if !config.enabled {
        return;
    }

    let Some(original) = state.captures.get(&ev.chat, &ev.id) else {
        debug!("revoke of unknown message {} in {} (ignored)", ev.id, ev.chat);
        return;
    };

    let mut body = format!(
        "🗑️ {} deleted a message in {}",
        mention(&original.sender),
        ev.chat
    );
    if let Some(label) = media_label(original.media) {
        body.push_str(&format!("\n[{label}]"));
    }
    if !original.text.is_empty() {
        body.push_str(&format!("\n\n{}", preview(&original.text, 1000)));
    }

    notify(state, &config, &ev.chat, &body).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(chat: &str, id: &str, text: &str) -> CapturedMessage {
        CapturedMessage {
            id: id.to_string(),
            chat: Jid::group(chat),
            sender: Jid::phone("254700000001"),
            text: text.to_string(),
            media: MediaKind::None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn evicts_oldest_entry_first() {
        let buffer = CaptureBuffer::new(2);
        buffer.store(captured("g1", "M1", "one"));
        buffer.store(captured("g1", "M2", "two"));
        buffer.store(captured("g1", "M3", "three"));

        assert_eq!(buffer.len(), 2);
        assert!(buffer.get(&Jid::group("g1"), "M1").is_none(), "oldest evicted");
        assert!(buffer.get(&Jid::group("g1"), "M2").is_some());
        assert!(buffer.get(&Jid::group("g1"), "M3").is_some());
    }

    #[test]
    fn restore_of_same_id_does_not_double_count() {
        let buffer = CaptureBuffer::new(2);
        buffer.store(captured("g1", "M1", "one"));
        buffer.store(captured("g1", "M1", "one again"));
        buffer.store(captured("g1", "M2", "two"));

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.get(&Jid::group("g1"), "M1").unwrap().text, "one again");
    }

    #[test]
    fn same_id_in_different_chats_is_distinct() {
        let buffer = CaptureBuffer::new(10);
        buffer.store(captured("g1", "M1", "in g1"));
        buffer.store(captured("g2", "M1", "in g2"));

        assert_eq!(buffer.get(&Jid::group("g1"), "M1").unwrap().text, "in g1");
        assert_eq!(buffer.get(&Jid::group("g2"), "M1").unwrap().text, "in g2");
    }

    #[test]
    fn update_text_replaces_stored_copy() {
        let buffer = CaptureBuffer::new(10);
        buffer.store(captured("g1", "M1", "hello"));
        buffer.update_text(&Jid::group("g1"), "M1", "hello world");

        assert_eq!(buffer.get(&Jid::group("g1"), "M1").unwrap().text, "hello world");
    }
}
