//! Mass-tag and group-mention detectors.
//!
//! Two related features: antitag fires on messages that mention an
//! unusual number of users at once; antigroupmention fires on the
//! literal broadcast tokens (`@everyone`, `@tagall`, `@all`).

use super::{Decision, enforce, exempt};
use crate::bot::dispatcher::AppState;
use crate::bot::normalize::NormalizedMessage;
use crate::store::models::{AntimentionConfig, AntitagConfig};

/// Broadcast tokens matched literally, token-wise.
const GROUP_MENTION_TOKENS: &[&str] = &["@everyone", "@tagall", "@all"];

/// Pure decision for mass tags.
pub fn detect_tags(config: &AntitagConfig, mentioned_count: usize) -> Decision {
    if !config.enabled || mentioned_count < config.threshold.max(1) {
        return Decision::Ignore;
    }
    Decision::Act(config.action)
}

/// Whether the text carries a literal group-mention token.
pub fn contains_group_mention(text: &str) -> bool {
    text.split_whitespace()
        .any(|token| GROUP_MENTION_TOKENS.iter().any(|t| token.eq_ignore_ascii_case(t)))
}

/// Pure decision for group-mention tokens.
pub fn detect_group_mentions(config: &AntimentionConfig, text: &str) -> Decision {
    if !config.enabled || !contains_group_mention(text) {
        return Decision::Ignore;
    }
    Decision::Act(config.action)
}

pub async fn check_tags(state: &AppState, msg: &NormalizedMessage) -> anyhow::Result<()> {
    let config = state.stores.antitag.get(&msg.chat).await;
    let Decision::Act(action) = detect_tags(&config, msg.mentioned.len()) else {
        return Ok(());
    };

    if exempt(state, msg).await {
        return Ok(());
    }

    enforce(state, msg, action, "mass tagging").await;
    Ok(())
}

pub async fn check_group_mentions(state: &AppState, msg: &NormalizedMessage) -> anyhow::Result<()> {
    let config = state.stores.antimention.get(&msg.chat).await;
    let Decision::Act(action) = detect_group_mentions(&config, &msg.text) else {
        return Ok(());
    };

    if exempt(state, msg).await {
        return Ok(());
    }

    enforce(state, msg, action, "group-wide mentions").await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::ModAction;

    #[test]
    fn tag_threshold_is_inclusive() {
        let config = AntitagConfig {
            enabled: true,
            action: ModAction::Delete,
            threshold: 5,
        };
        assert_eq!(detect_tags(&config, 4), Decision::Ignore);
        assert_eq!(detect_tags(&config, 5), Decision::Act(ModAction::Delete));
        assert_eq!(detect_tags(&config, 50), Decision::Act(ModAction::Delete));
    }

    #[test]
    fn zero_threshold_does_not_flag_plain_messages() {
        let config = AntitagConfig {
            enabled: true,
            action: ModAction::Delete,
            threshold: 0,
        };
        assert_eq!(detect_tags(&config, 0), Decision::Ignore);
        assert_eq!(detect_tags(&config, 1), Decision::Act(ModAction::Delete));
    }

    #[test]
    fn group_mention_tokens_match_literally() {
        assert!(contains_group_mention("hey @everyone wake up"));
        assert!(contains_group_mention("@TagAll"));
        assert!(contains_group_mention("hi @all"));
        assert!(!contains_group_mention("email me@all.example.com"));
        assert!(!contains_group_mention("all of you"));
    }
}
