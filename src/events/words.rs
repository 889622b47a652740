//! Bad-word detector.

use super::{Decision, enforce, exempt};
use crate::bot::dispatcher::AppState;
use crate::bot::normalize::NormalizedMessage;
use crate::store::models::AntiwordConfig;

/// Pure decision for one message against one config.
pub fn detect(config: &AntiwordConfig, text: &str) -> Decision {
    if !config.enabled || text.is_empty() {
        return Decision::Ignore;
    }
    match config.matches(text) {
        Some(_) => Decision::Act(config.action),
        None => Decision::Ignore,
    }
}

pub async fn check_words(state: &AppState, msg: &NormalizedMessage) -> anyhow::Result<()> {
    let config = state.stores.antiword.get(&msg.chat).await;
    let Decision::Act(action) = detect(&config, &msg.text) else {
        return Ok(());
    };

    if exempt(state, msg).await {
        return Ok(());
    }

    enforce(state, msg, action, "that language").await;
    Ok(())
}
