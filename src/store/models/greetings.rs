//! Welcome/goodbye and chatbot configs.

use serde::{Deserialize, Serialize};

/// Greeting config (one store for welcome, one for goodbye).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GreetingConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Message template. `{user}` and `{subject}` are filled in.
    #[serde(default)]
    pub text: Option<String>,
}

impl GreetingConfig {
    /// Render the template for a user mention and group subject.
    pub fn render(&self, default_text: &str, user: &str, subject: &str) -> String {
        self.text
            .as_deref()
            .unwrap_or(default_text)
            .replace("{user}", user)
            .replace("{subject}", subject)
    }
}

/// DM auto-reply toggle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatbotConfig {
    #[serde(default)]
    pub enabled: bool,
}
