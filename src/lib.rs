//! Warden - dispatch and moderation core for WhatsApp group bots.
//!
//! This crate contains everything between a WhatsApp transport and the
//! individual bot features: identity resolution, per-chat moderation
//! state, admin checking, command routing, and the passive detectors
//! that police group chats.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `identity` - JID types and LID-to-phone resolution
//! - `transport` - The capability trait a protocol backend implements
//! - `store` - JSON-file-backed per-feature configuration
//! - `cache` - LRU-based caching with Moka
//! - `permissions` - Admin checking with caching
//! - `bot` - Message normalization and command dispatch
//! - `plugins` - Command handlers (extensible)
//! - `events` - Passive detectors and event handlers (extensible)
//! - `utils` - Utility functions
//!
//! The embedding binary owns the socket: it feeds [`transport::Event`]s
//! into [`bot::Dispatcher::dispatch`] and provides a [`transport::Transport`]
//! implementation for the side effects.

pub mod bot;
pub mod cache;
pub mod config;
pub mod events;
pub mod identity;
pub mod permissions;
pub mod plugins;
pub mod store;
pub mod transport;
pub mod utils;

pub use bot::dispatcher::{AppState, Dispatcher};
pub use config::Settings;
pub use identity::Jid;
pub use transport::{Event, Transport};
