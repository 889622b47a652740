//! Message normalization.
//!
//! The transport reports messages in heterogeneous envelope shapes (text,
//! captioned media, stickers, wrapped variants). Everything downstream -
//! dispatcher, detectors, capture - consumes one canonical form built
//! here, with the sender resolved to its canonical identity exactly once.

use chrono::{DateTime, Utc};

use crate::identity::{IdentityResolver, Jid};
use crate::transport::{MessageContent, MessageEvent};

/// Coarse media classification for moderation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    None,
    Image,
    Video,
    Sticker,
    Audio,
    Document,
    Unknown,
}

/// Canonical inbound message.
#[derive(Debug, Clone)]
pub struct NormalizedMessage {
    pub id: String,

    pub chat: Jid,

    /// Canonical sender: resolved phone JID when a mapping exists,
    /// otherwise the raw identity unchanged.
    pub sender: Jid,

    /// Sender exactly as the envelope reported it.
    pub raw_sender: Jid,

    pub from_me: bool,

    pub is_group: bool,

    /// Message text, or media caption when there is no body.
    pub text: String,

    pub media: MediaKind,

    pub mentioned: Vec<Jid>,

    pub push_name: Option<String>,

    pub timestamp: DateTime<Utc>,
}

/// Flatten a content envelope into text + media kind.
pub fn content_parts(content: &MessageContent) -> (String, MediaKind) {
    match content {
        MessageContent::Text(t) => (t.clone(), MediaKind::None),
        MessageContent::Image { caption } => {
            (caption.clone().unwrap_or_default(), MediaKind::Image)
        }
        MessageContent::Video { caption } => {
            (caption.clone().unwrap_or_default(), MediaKind::Video)
        }
        MessageContent::Sticker => (String::new(), MediaKind::Sticker),
        MessageContent::Audio { .. } => (String::new(), MediaKind::Audio),
        MessageContent::Document { filename } => (filename.clone(), MediaKind::Document),
        MessageContent::Unknown => (String::new(), MediaKind::Unknown),
    }
}

/// Build the canonical envelope for an inbound message.
pub fn normalize(event: &MessageEvent, resolver: &IdentityResolver) -> NormalizedMessage {
    let (text, media) = content_parts(&event.content);
    let raw_sender = event.sender.bare();

    NormalizedMessage {
        id: event.id.clone(),
        chat: event.chat.clone(),
        sender: resolver.resolve(&raw_sender),
        raw_sender,
        from_me: event.from_me,
        is_group: event.chat.is_group(),
        text,
        media,
        mentioned: event.mentioned.clone(),
        push_name: event.push_name.clone(),
        timestamp: event.timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Storage;

    fn message(chat: Jid, sender: Jid, content: MessageContent) -> MessageEvent {
        MessageEvent {
            id: "M1".into(),
            chat,
            sender,
            sender_alt: None,
            from_me: false,
            push_name: None,
            timestamp: Utc::now(),
            content,
            mentioned: Vec::new(),
        }
    }

    async fn resolver(dir: &tempfile::TempDir) -> IdentityResolver {
        IdentityResolver::open(&Storage::open(dir.path()).unwrap()).await
    }

    #[tokio::test]
    async fn caption_becomes_text() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(&dir).await;

        let ev = message(
            Jid::group("g1"),
            Jid::phone("254700000001"),
            MessageContent::Image {
                caption: Some("look at this".into()),
            },
        );
        let msg = normalize(&ev, &resolver);

        assert_eq!(msg.text, "look at this");
        assert_eq!(msg.media, MediaKind::Image);
        assert!(msg.is_group);
    }

    #[tokio::test]
    async fn sender_resolution_happens_once_here() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(&dir).await;
        resolver
            .record(&Jid::phone("254700000001"), &Jid::lid("81234"))
            .await;

        let ev = message(
            Jid::group("g1"),
            Jid::lid("81234"),
            MessageContent::Text("hi".into()),
        );
        let msg = normalize(&ev, &resolver);

        assert_eq!(msg.sender, Jid::phone("254700000001"));
        assert_eq!(msg.raw_sender, Jid::lid("81234"));
    }

    #[tokio::test]
    async fn device_suffix_is_stripped_from_sender() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver(&dir).await;

        let ev = message(
            Jid::phone("254700000001"),
            "254700000001:12@s.whatsapp.net".parse().unwrap(),
            MessageContent::Text("hi".into()),
        );
        let msg = normalize(&ev, &resolver);

        assert_eq!(msg.sender, Jid::phone("254700000001"));
        assert!(!msg.is_group, "a DM chat is the peer's user JID");
    }
}
