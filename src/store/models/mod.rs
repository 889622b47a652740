//! Per-feature configuration models.
//!
//! Add new feature configs by:
//! 1. Creating a struct with `#[serde(default)]` fields and a `Default` impl
//! 2. Adding `pub mod your_feature;` / re-export below
//! 3. Registering a `FeatureStore` for it in `store::Stores`

pub mod capture;
pub mod greetings;
pub mod moderation;

pub use capture::{CaptureConfig, NotifyTarget};
pub use greetings::{ChatbotConfig, GreetingConfig};
pub use moderation::{
    AntilinkConfig, AntimentionConfig, AntiphotoConfig, AntistickerConfig, AntitagConfig,
    AntiwordConfig, GuardMode, ModAction, ModToggle, RoleGuardConfig,
};
