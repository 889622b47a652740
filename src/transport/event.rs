//! Inbound transport events.

use chrono::{DateTime, Utc};

use super::{MessageContent, ParticipantUpdate};
use crate::identity::Jid;

/// A received message.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    /// Protocol message id, unique per chat.
    pub id: String,

    /// Chat the message arrived in (group JID, or the peer for DMs).
    pub chat: Jid,

    /// Raw sender as the envelope reports it - phone JID or LID.
    pub sender: Jid,

    /// Alternate identity for the same sender, when the envelope carries
    /// both schemes. This is a transport-asserted correlation and feeds
    /// the identity resolver.
    pub sender_alt: Option<Jid>,

    /// Whether our own account sent this message.
    pub from_me: bool,

    /// Sender's display name, if pushed.
    pub push_name: Option<String>,

    pub timestamp: DateTime<Utc>,

    pub content: MessageContent,

    /// Users mentioned in the message body.
    pub mentioned: Vec<Jid>,
}

/// A message was edited.
#[derive(Debug, Clone)]
pub struct MessageEditedEvent {
    pub chat: Jid,
    pub sender: Jid,
    /// Id of the message that was edited.
    pub id: String,
    pub new_content: MessageContent,
    pub timestamp: DateTime<Utc>,
}

/// A message was revoked (deleted for everyone).
#[derive(Debug, Clone)]
pub struct MessageRevokedEvent {
    pub chat: Jid,
    /// Who revoked it - usually the original sender, or an admin.
    pub actor: Jid,
    /// Id of the revoked message.
    pub id: String,
}

/// Group membership or role change.
#[derive(Debug, Clone)]
pub struct GroupParticipantsEvent {
    pub chat: Jid,
    /// Who performed the change.
    pub actor: Jid,
    pub action: ParticipantUpdate,
    pub participants: Vec<Jid>,
}

/// All events the dispatcher consumes.
#[derive(Debug, Clone)]
pub enum Event {
    Message(MessageEvent),
    MessageEdited(MessageEditedEvent),
    MessageRevoked(MessageRevokedEvent),
    GroupParticipants(GroupParticipantsEvent),
}
