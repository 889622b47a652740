//! Passive detectors and event handlers.
//!
//! Detectors inspect every non-command message for policy violations.
//! Add a new detector by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_detector;` below
//! 3. Calling its `check_*` entry point from `run_message_detectors`
//!
//! Every entry point is independently guarded: one detector failing (or
//! one side effect failing inside a detector) never stops its siblings.

pub mod capture;
pub mod chatbot;
pub mod greetings;
pub mod links;
pub mod media;
pub mod mentions;
pub mod roles;
pub mod words;

pub use capture::CaptureBuffer;

use tracing::{error, warn};

use crate::bot::dispatcher::AppState;
use crate::bot::normalize::NormalizedMessage;
use crate::store::models::ModAction;
use crate::utils::mention;

/// What a detector decided for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Ignore,
    Act(ModAction),
}

/// Run all passive detectors for a non-command message.
pub async fn run_message_detectors(state: &AppState, msg: &NormalizedMessage) {
    if msg.is_group {
        if let Err(e) = links::check_links(state, msg).await {
            error!("antilink detector error: {e:#}");
        }
        if let Err(e) = words::check_words(state, msg).await {
            error!("antibadword detector error: {e:#}");
        }
        if let Err(e) = mentions::check_tags(state, msg).await {
            error!("antitag detector error: {e:#}");
        }
        if let Err(e) = mentions::check_group_mentions(state, msg).await {
            error!("antigroupmention detector error: {e:#}");
        }
        if let Err(e) = media::check_stickers(state, msg).await {
            error!("antisticker detector error: {e:#}");
        }
        if let Err(e) = media::check_photos(state, msg).await {
            error!("antiphoto detector error: {e:#}");
        }
    } else if let Err(e) = chatbot::check_chatbot(state, msg).await {
        error!("chatbot error: {e:#}");
    }
}

/// Shared exemption ladder for message detectors.
///
/// Exempt: non-group chats, the bot's own messages, the group creator,
/// and group admins. When the roster cannot be fetched the exemptions
/// cannot be evaluated, so the detector skips acting rather than risk
/// moderating an admin.
pub(crate) async fn exempt(state: &AppState, msg: &NormalizedMessage) -> bool {
    if !msg.is_group || msg.from_me {
        return true;
    }
    if state.is_self(&msg.raw_sender) || state.is_self(&msg.sender) {
        return true;
    }

    let meta = match state.transport.group_metadata(&msg.chat).await {
        Ok(meta) => meta,
        Err(e) => {
            warn!("cannot evaluate exemptions for {}: {} (skipping)", msg.chat, e);
            return true;
        }
    };

    if state.gate.is_group_creator(&meta, &msg.raw_sender)
        || state.gate.is_group_creator(&meta, &msg.sender)
    {
        return true;
    }

    state.gate.check(&msg.chat, &msg.raw_sender).await.is_sender_admin
}

/// Enact a detector decision.
///
/// The offending message is always deleted first; the escalation (warning
/// mention or kick) follows. Each call is guarded on its own so a failed
/// kick still leaves the deletion and any prior notice in place.
pub(crate) async fn enforce(
    state: &AppState,
    msg: &NormalizedMessage,
    action: ModAction,
    reason: &str,
) {
    if let Err(e) = state.transport.delete_message(&msg.chat, &msg.id).await {
        warn!("failed to delete message {} in {}: {}", msg.id, msg.chat, e);
    }

    match action {
        ModAction::Delete | ModAction::Warn => {
            let text = format!("⚠️ {}, {} is not allowed in this group!", mention(&msg.sender), reason);
            if let Err(e) = state
                .transport
                .send_mention(&msg.chat, &text, &[msg.sender.clone()])
                .await
            {
                warn!("failed to send warning in {}: {}", msg.chat, e);
            }
        }
        ModAction::Kick => {
            if let Err(e) = state
                .transport
                .update_participants(
                    &msg.chat,
                    std::slice::from_ref(&msg.raw_sender),
                    crate::transport::ParticipantUpdate::Remove,
                )
                .await
            {
                warn!("failed to kick {} from {}: {}", msg.raw_sender, msg.chat, e);
            }
            let text = format!("🚪 {} was removed: {}.", mention(&msg.sender), reason);
            if let Err(e) = state
                .transport
                .send_mention(&msg.chat, &text, &[msg.sender.clone()])
                .await
            {
                warn!("failed to send kick notice in {}: {}", msg.chat, e);
            }
        }
    }
}
