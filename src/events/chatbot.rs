//! Chatbot auto-reply for direct messages.
//!
//! When no command matched in a DM and the peer has the chatbot enabled,
//! the message text goes to the configured proxy endpoint and the reply
//! comes back into the chat. The proxy call uses the shared HTTP client
//! (timeout + bounded retry); failures are logged and swallowed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bot::dispatcher::AppState;
use crate::bot::normalize::NormalizedMessage;

#[derive(Serialize)]
struct ChatbotRequest {
    prompt: String,
    session: String,
}

#[derive(Deserialize)]
struct ChatbotResponse {
    reply: String,
}

pub async fn check_chatbot(state: &AppState, msg: &NormalizedMessage) -> anyhow::Result<()> {
    if msg.is_group || msg.from_me || msg.text.is_empty() {
        return Ok(());
    }

    let config = state.stores.chatbot.get(&msg.chat).await;
    if !config.enabled {
        return Ok(());
    }

    let Some(url) = state.settings.chatbot_api_url.clone() else {
        debug!("chatbot enabled for {} but no endpoint configured", msg.chat);
        return Ok(());
    };

    // The proxy call can take the full timeout across retries; run it as
    // its own task so dispatch keeps moving for other chats.
    let http = state.http.clone();
    let transport = state.transport.clone();
    let chat = msg.chat.clone();
    let request = ChatbotRequest {
        prompt: msg.text.clone(),
        session: chat.to_string(),
    };

    tokio::spawn(async move {
        let response: ChatbotResponse = match http.post_json(&url, &request).await {
            Ok(r) => r,
            Err(e) => {
                warn!("chatbot proxy call failed for {}: {e:#}", chat);
                return;
            }
        };
        if response.reply.is_empty() {
            return;
        }
        if let Err(e) = transport.send_text(&chat, &response.reply).await {
            warn!("failed to send chatbot reply to {}: {}", chat, e);
        }
    });

    Ok(())
}
