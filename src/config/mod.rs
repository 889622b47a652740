//! Configuration module for the warden core.
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// Owner phone number (digits only, no JID suffix).
    /// This account has full access to every command and is implicitly sudo.
    pub owner_number: String,

    /// Bot display name, used in warnings and capture notices.
    pub bot_name: String,

    /// Directory holding the per-feature JSON documents.
    pub data_dir: PathBuf,

    /// Command prefix used until a `setprefix` command overrides it.
    /// `"none"` enables bare-keyword mode.
    pub default_prefix: String,

    /// Endpoint for the chatbot auto-reply proxy.
    /// Optional - chatbot replies are disabled when unset.
    pub chatbot_api_url: Option<String>,

    /// Maximum entries kept per capture buffer (antiedit/antidelete).
    pub capture_capacity: usize,
}

impl Settings {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if required environment variables are not set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let owner_number: String = env::var("OWNER_NUMBER")
            .expect("OWNER_NUMBER must be set")
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();

        if owner_number.is_empty() {
            panic!("OWNER_NUMBER must contain a phone number");
        }

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let capture_capacity = env::var("CAPTURE_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2000);

        Self {
            owner_number,
            bot_name: env::var("BOT_NAME").unwrap_or_else(|_| "Warden".to_string()),
            data_dir,
            default_prefix: env::var("PREFIX").unwrap_or_else(|_| ".".to_string()),
            chatbot_api_url: env::var("CHATBOT_API_URL").ok().filter(|s| !s.is_empty()),
            capture_capacity,
        }
    }

    /// Construct settings directly, bypassing the environment.
    ///
    /// Used by embedders that carry their own configuration layer.
    pub fn new(owner_number: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            owner_number: owner_number.into(),
            bot_name: "Warden".to_string(),
            data_dir: data_dir.into(),
            default_prefix: ".".to_string(),
            chatbot_api_url: None,
            capture_capacity: 2000,
        }
    }
}
