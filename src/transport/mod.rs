//! The transport capability.
//!
//! The wire protocol (socket, encryption, session) lives outside this
//! crate. Whatever implements [`Transport`] supplies the side effects the
//! core needs - sending, deleting, group metadata, participant updates -
//! and feeds [`Event`]s into the dispatcher. Every call is fallible and
//! every caller in the core treats failure as non-fatal.

mod event;
#[cfg(test)]
pub(crate) mod testing;

pub use event::{Event, GroupParticipantsEvent, MessageEditedEvent, MessageEvent, MessageRevokedEvent};

use async_trait::async_trait;

use crate::identity::Jid;

/// Transport-layer error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport connection error: {0}")]
    Connection(String),

    #[error("transport request failed: {0}")]
    Request(String),
}

/// Role of a group participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    Member,
    Admin,
    SuperAdmin,
}

/// One entry of a group roster.
///
/// Rosters may list a member under either identity scheme; when the
/// transport knows both, `lid` carries the alternate.
#[derive(Debug, Clone)]
pub struct Participant {
    pub jid: Jid,
    pub lid: Option<Jid>,
    pub role: ParticipantRole,
}

impl Participant {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, ParticipantRole::Admin | ParticipantRole::SuperAdmin)
    }
}

/// Group metadata snapshot.
#[derive(Debug, Clone)]
pub struct GroupMetadata {
    pub id: Jid,
    pub subject: String,
    /// Group creator, when the transport still knows it.
    pub owner: Option<Jid>,
    pub participants: Vec<Participant>,
}

/// Action for a participant update, both outbound and in events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantUpdate {
    Add,
    Remove,
    Promote,
    Demote,
}

/// Message payload shapes as the transport reports them.
///
/// The normalizer flattens these into text/caption plus a media kind; the
/// core never touches media bytes (downloads are leaf-command territory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Image { caption: Option<String> },
    Video { caption: Option<String> },
    Sticker,
    Audio { voice_note: bool },
    Document { filename: String },
    Unknown,
}

/// The capability a protocol backend implements for the core.
#[async_trait]
pub trait Transport: Send + Sync {
    /// The bot's own account JID.
    fn self_jid(&self) -> Jid;

    /// Send a plain text message.
    async fn send_text(&self, chat: &Jid, text: &str) -> Result<(), TransportError>;

    /// Send a text message that mentions the given users.
    async fn send_mention(&self, chat: &Jid, text: &str, mentions: &[Jid])
    -> Result<(), TransportError>;

    /// Delete a message for everyone.
    async fn delete_message(&self, chat: &Jid, message_id: &str) -> Result<(), TransportError>;

    /// Fetch the current group roster.
    async fn group_metadata(&self, chat: &Jid) -> Result<GroupMetadata, TransportError>;

    /// Add/remove/promote/demote participants.
    async fn update_participants(
        &self,
        chat: &Jid,
        participants: &[Jid],
        action: ParticipantUpdate,
    ) -> Result<(), TransportError>;
}
