//! Moderation feature configs.
//!
//! One struct per detector. Every feature starts disabled; the action
//! defaults differ per feature (delete for link/media, warn for bad
//! words) to match how groups actually want them escalated.

use serde::{Deserialize, Serialize};

/// What a detector does once a message matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModAction {
    /// Delete the offending message.
    Delete,
    /// Delete and send a warning mention.
    Warn,
    /// Delete and remove the sender from the group.
    Kick,
}

impl ModAction {
    /// Parse a user-supplied action word.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "delete" => Some(Self::Delete),
            "warn" => Some(Self::Warn),
            "kick" => Some(Self::Kick),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Warn => "warn",
            Self::Kick => "kick",
        }
    }
}

/// Common surface of the enabled/action configs, so the toggle commands
/// can share one handler.
pub trait ModToggle {
    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, on: bool);
    fn action(&self) -> ModAction;
    fn set_action(&mut self, action: ModAction);
}

macro_rules! impl_mod_toggle {
    ($($ty:ty),+ $(,)?) => {
        $(impl ModToggle for $ty {
            fn enabled(&self) -> bool {
                self.enabled
            }
            fn set_enabled(&mut self, on: bool) {
                self.enabled = on;
            }
            fn action(&self) -> ModAction {
                self.action
            }
            fn set_action(&mut self, action: ModAction) {
                self.action = action;
            }
        })+
    };
}

impl_mod_toggle!(
    AntilinkConfig,
    AntiwordConfig,
    AntitagConfig,
    AntimentionConfig,
    AntistickerConfig,
    AntiphotoConfig,
);

fn default_delete() -> ModAction {
    ModAction::Delete
}

fn default_warn() -> ModAction {
    ModAction::Warn
}

/// Invite-link detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntilinkConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_delete")]
    pub action: ModAction,
}

impl Default for AntilinkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            action: ModAction::Delete,
        }
    }
}

/// Bad-word detection with a per-chat word list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntiwordConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_warn")]
    pub action: ModAction,

    /// Configured substrings, stored lowercase.
    #[serde(default)]
    pub words: Vec<String>,
}

impl Default for AntiwordConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            action: ModAction::Warn,
            words: Vec::new(),
        }
    }
}

impl AntiwordConfig {
    /// Add a word. Returns false if it was already present.
    pub fn add_word(&mut self, word: &str) -> bool {
        let word = word.to_lowercase();
        if self.words.contains(&word) {
            return false;
        }
        self.words.push(word);
        true
    }

    /// Remove a word. Returns false if it was not present.
    pub fn remove_word(&mut self, word: &str) -> bool {
        let word = word.to_lowercase();
        if let Some(pos) = self.words.iter().position(|w| *w == word) {
            self.words.remove(pos);
            true
        } else {
            false
        }
    }

    /// First configured word contained in `text`, case-insensitive.
    pub fn matches(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.words
            .iter()
            .find(|w| lower.contains(w.as_str()))
            .map(String::as_str)
    }
}

fn default_tag_threshold() -> usize {
    5
}

/// Mass-mention detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntitagConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_delete")]
    pub action: ModAction,

    /// Minimum number of mentioned users that counts as a mass tag.
    #[serde(default = "default_tag_threshold")]
    pub threshold: usize,
}

impl Default for AntitagConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            action: ModAction::Delete,
            threshold: default_tag_threshold(),
        }
    }
}

/// Literal group-mention token detection (`@everyone` and friends).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntimentionConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_delete")]
    pub action: ModAction,
}

impl Default for AntimentionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            action: ModAction::Delete,
        }
    }
}

/// Sticker suppression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntistickerConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_delete")]
    pub action: ModAction,
}

impl Default for AntistickerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            action: ModAction::Delete,
        }
    }
}

/// Photo suppression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntiphotoConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_delete")]
    pub action: ModAction,
}

impl Default for AntiphotoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            action: ModAction::Delete,
        }
    }
}

/// How a role-change reversal responds to an unauthorized promote/demote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GuardMode {
    /// Undo the role change.
    #[default]
    Revert,
    /// Remove the actor from the group.
    Kick,
}

impl GuardMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "revert" => Some(Self::Revert),
            "kick" => Some(Self::Kick),
            _ => None,
        }
    }
}

/// Promote/demote reversal (one store each for antipromote and antidemote).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleGuardConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub mode: GuardMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn antiword_matching_is_case_insensitive() {
        let mut cfg = AntiwordConfig::default();
        assert!(cfg.add_word("Spam"));
        assert!(!cfg.add_word("SPAM"), "duplicates are rejected");

        assert_eq!(cfg.matches("buy SpAm now"), Some("spam"));
        assert_eq!(cfg.matches("clean message"), None);
    }

    #[test]
    fn old_documents_deserialize_with_defaults() {
        // A document written before the `threshold` field existed.
        let cfg: AntitagConfig = serde_json::from_str(r#"{"enabled":true}"#).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.threshold, 5);
        assert_eq!(cfg.action, ModAction::Delete);
    }

    #[test]
    fn action_words_parse() {
        assert_eq!(ModAction::parse("KICK"), Some(ModAction::Kick));
        assert_eq!(ModAction::parse("nuke"), None);
    }
}
