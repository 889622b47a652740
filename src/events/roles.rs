//! Promote/demote reversal.
//!
//! Watches group role-change events rather than messages. When the
//! corresponding guard is enabled and the actor is neither the bot nor
//! the group creator, the change is reverted or the actor is kicked,
//! depending on the configured mode.

use tracing::{info, warn};

use crate::bot::dispatcher::AppState;
use crate::store::models::GuardMode;
use crate::transport::{GroupParticipantsEvent, ParticipantUpdate};

pub async fn on_participants(state: &AppState, ev: &GroupParticipantsEvent) {
    // Any role change makes the cached admin rosters stale.
    if matches!(ev.action, ParticipantUpdate::Promote | ParticipantUpdate::Demote) {
        state.gate.invalidate();
    }

    match ev.action {
        ParticipantUpdate::Promote | ParticipantUpdate::Demote => {
            check_role_guard(state, ev).await;
        }
        ParticipantUpdate::Add | ParticipantUpdate::Remove => {
            super::greetings::on_membership(state, ev).await;
        }
    }
}

async fn check_role_guard(state: &AppState, ev: &GroupParticipantsEvent) {
    let (store, undo, verb) = match ev.action {
        ParticipantUpdate::Promote => (&state.stores.antipromote, ParticipantUpdate::Demote, "promoted"),
        ParticipantUpdate::Demote => (&state.stores.antidemote, ParticipantUpdate::Promote, "demoted"),
        _ => return,
    };

    let config = store.get(&ev.chat).await;
    if !config.enabled {
        return;
    }

    let actor = ev.actor.bare();
    if state.is_self(&actor) {
        return;
    }

    // Creator exemption needs the roster; on fetch failure skip rather
    // than fight an admin we cannot identify.
    match state.transport.group_metadata(&ev.chat).await {
        Ok(meta) => {
            if state.gate.is_group_creator(&meta, &actor) {
                return;
            }
        }
        Err(e) => {
            warn!("cannot evaluate role guard for {}: {} (skipping)", ev.chat, e);
            return;
        }
    }

    info!(
        "role guard in {}: {} {} {} participant(s)",
        ev.chat,
        ev.actor,
        verb,
        ev.participants.len()
    );

    match config.mode {
        GuardMode::Revert => {
            if let Err(e) = state
                .transport
                .update_participants(&ev.chat, &ev.participants, undo)
                .await
            {
                warn!("failed to revert role change in {}: {}", ev.chat, e);
            }
        }
        GuardMode::Kick => {
            if let Err(e) = state
                .transport
                .update_participants(&ev.chat, std::slice::from_ref(&ev.actor), ParticipantUpdate::Remove)
                .await
            {
                warn!("failed to kick {} from {}: {}", ev.actor, ev.chat, e);
            }
        }
    }
}
