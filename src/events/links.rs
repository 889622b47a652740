//! Invite-link detector.

use url::Url;

use super::{Decision, enforce, exempt};
use crate::bot::dispatcher::AppState;
use crate::bot::normalize::NormalizedMessage;
use crate::store::models::AntilinkConfig;

/// Hosts that count as invite links.
const FLAGGED_HOSTS: &[&str] = &["chat.whatsapp.com", "wa.me", "t.me", "telegram.me"];

fn flagged_host(host: &str) -> bool {
    let host = host.trim_start_matches("www.");
    FLAGGED_HOSTS.iter().any(|h| *h == host)
}

/// Whether the text contains an invite-link URL, with or without scheme.
pub fn contains_invite_link(text: &str) -> bool {
    text.split_whitespace().any(|token| {
        let parsed = Url::parse(token).ok().or_else(|| {
            // Bare "chat.whatsapp.com/ABC" style tokens.
            token
                .contains('.')
                .then(|| Url::parse(&format!("https://{token}")).ok())
                .flatten()
        });
        parsed
            .and_then(|u| u.host_str().map(flagged_host))
            .unwrap_or(false)
    })
}

/// Pure decision for one message against one config.
pub fn detect(config: &AntilinkConfig, text: &str) -> Decision {
    if !config.enabled || !contains_invite_link(text) {
        return Decision::Ignore;
    }
    Decision::Act(config.action)
}

/// Detector entry point, called for every non-command group message.
pub async fn check_links(state: &AppState, msg: &NormalizedMessage) -> anyhow::Result<()> {
    let config = state.stores.antilink.get(&msg.chat).await;
    let Decision::Act(action) = detect(&config, &msg.text) else {
        return Ok(());
    };

    if exempt(state, msg).await {
        return Ok(());
    }

    enforce(state, msg, action, "sharing invite links").await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::ModAction;

    #[test]
    fn catches_known_invite_hosts() {
        assert!(contains_invite_link("join https://chat.whatsapp.com/ABC123"));
        assert!(contains_invite_link("go to wa.me/254700000000 now"));
        assert!(contains_invite_link("https://t.me/somechannel"));
        assert!(contains_invite_link("www.telegram.me/x"));
    }

    #[test]
    fn ignores_ordinary_urls_and_text() {
        assert!(!contains_invite_link("see https://example.com/chat.whatsapp.com"));
        assert!(!contains_invite_link("whatsapp is great"));
        assert!(!contains_invite_link("time is 12.30 today"));
        assert!(!contains_invite_link(""));
    }

    #[test]
    fn disabled_config_ignores_matches() {
        let config = AntilinkConfig::default();
        assert_eq!(detect(&config, "https://chat.whatsapp.com/ABC"), Decision::Ignore);
    }

    #[test]
    fn enabled_config_uses_configured_action() {
        let config = AntilinkConfig {
            enabled: true,
            action: ModAction::Kick,
        };
        assert_eq!(
            detect(&config, "https://chat.whatsapp.com/ABC"),
            Decision::Act(ModAction::Kick)
        );
        assert_eq!(detect(&config, "hello"), Decision::Ignore);
    }
}
