//! Edit/delete capture configs.

use serde::{Deserialize, Serialize};

/// Where a capture notice is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifyTarget {
    /// Owner's direct chat only.
    #[default]
    Owner,
    /// The chat the message originated in.
    Chat,
    /// Both of the above.
    Both,
}

impl NotifyTarget {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Some(Self::Owner),
            "chat" => Some(Self::Chat),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn includes_owner(&self) -> bool {
        matches!(self, Self::Owner | Self::Both)
    }

    pub fn includes_chat(&self) -> bool {
        matches!(self, Self::Chat | Self::Both)
    }
}

/// Config shared by antiedit and antidelete (one store each).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub notify: NotifyTarget,
}
