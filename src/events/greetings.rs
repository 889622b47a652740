//! Welcome and goodbye messages.

use tracing::warn;

use crate::bot::dispatcher::AppState;
use crate::transport::{GroupParticipantsEvent, ParticipantUpdate};
use crate::utils::mention;

const DEFAULT_WELCOME: &str = "👋 Welcome {user} to {subject}!";
const DEFAULT_GOODBYE: &str = "👋 Goodbye {user}.";

pub async fn on_membership(state: &AppState, ev: &GroupParticipantsEvent) {
    let (store, default_text) = match ev.action {
        ParticipantUpdate::Add => (&state.stores.welcome, DEFAULT_WELCOME),
        ParticipantUpdate::Remove => (&state.stores.goodbye, DEFAULT_GOODBYE),
        _ => return,
    };

    let config = store.get(&ev.chat).await;
    if !config.enabled {
        return;
    }

    let subject = match state.transport.group_metadata(&ev.chat).await {
        Ok(meta) => meta.subject,
        Err(_) => ev.chat.to_string(),
    };

    for participant in &ev.participants {
        let user = state.resolver.resolve(participant);
        if state.is_self(&user) {
            continue;
        }

        let text = config.render(default_text, &mention(&user), &subject);
        if let Err(e) = state
            .transport
            .send_mention(&ev.chat, &text, std::slice::from_ref(&user))
            .await
        {
            warn!("failed to send greeting in {}: {}", ev.chat, e);
        }
    }
}
