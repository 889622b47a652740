//! Sticker and photo detectors.

use super::{Decision, enforce, exempt};
use crate::bot::dispatcher::AppState;
use crate::bot::normalize::{MediaKind, NormalizedMessage};
use crate::store::models::{AntiphotoConfig, AntistickerConfig};

/// Pure decision for stickers.
pub fn detect_stickers(config: &AntistickerConfig, media: MediaKind) -> Decision {
    if !config.enabled || media != MediaKind::Sticker {
        return Decision::Ignore;
    }
    Decision::Act(config.action)
}

/// Pure decision for photos.
pub fn detect_photos(config: &AntiphotoConfig, media: MediaKind) -> Decision {
    if !config.enabled || media != MediaKind::Image {
        return Decision::Ignore;
    }
    Decision::Act(config.action)
}

pub async fn check_stickers(state: &AppState, msg: &NormalizedMessage) -> anyhow::Result<()> {
    let config = state.stores.antisticker.get(&msg.chat).await;
    let Decision::Act(action) = detect_stickers(&config, msg.media) else {
        return Ok(());
    };

    if exempt(state, msg).await {
        return Ok(());
    }

    // Deleting stickers needs admin rights; without them, acting would
    // only produce a failed delete and a dangling warning.
    let status = state.gate.check(&msg.chat, &msg.raw_sender).await;
    if !status.is_bot_admin {
        return Ok(());
    }

    enforce(state, msg, action, "stickers").await;
    Ok(())
}

pub async fn check_photos(state: &AppState, msg: &NormalizedMessage) -> anyhow::Result<()> {
    let config = state.stores.antiphoto.get(&msg.chat).await;
    let Decision::Act(action) = detect_photos(&config, msg.media) else {
        return Ok(());
    };

    if exempt(state, msg).await {
        return Ok(());
    }

    enforce(state, msg, action, "photos").await;
    Ok(())
}
