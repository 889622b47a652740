//! Command handlers.
//!
//! Add new commands by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Appending its `commands()` to `Registry::builtin()`
//!
//! Commands are matched on the exact first token after the prefix, never
//! by substring, so `antidemote` can never be shadowed by a shorter
//! overlapping name. Duplicate tokens are a wiring bug and panic at
//! registry construction.

pub mod antilink;
pub mod antimedia;
pub mod antitag;
pub mod antiword;
pub mod banned;
pub mod capture;
pub mod chatbot;
pub mod greetings;
pub mod help;
pub mod prefix;
pub mod roleguard;
pub mod sudo;

use std::collections::HashMap;

use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::bot::dispatcher::AppState;
use crate::bot::normalize::NormalizedMessage;
use crate::store::FeatureStore;
use crate::store::models::{ModAction, ModToggle};

/// Everything a handler gets to work with.
pub struct CommandContext {
    pub state: AppState,

    pub msg: NormalizedMessage,

    /// Argument remainder in its original case (session strings and
    /// greeting templates need the literal text).
    pub args: String,
}

impl CommandContext {
    pub fn arg_tokens(&self) -> impl Iterator<Item = &str> {
        self.args.split_whitespace()
    }

    /// Send a reply into the chat the command came from.
    pub async fn reply(&self, text: &str) -> anyhow::Result<()> {
        self.state.transport.send_text(&self.msg.chat, text).await?;
        Ok(())
    }
}

pub type HandlerFuture<'a> = BoxFuture<'a, anyhow::Result<()>>;
pub type HandlerFn = for<'a> fn(&'a CommandContext) -> HandlerFuture<'a>;

/// One registered command.
pub struct CommandSpec {
    /// Primary token, lowercase.
    pub name: &'static str,

    /// Alternate tokens, lowercase.
    pub aliases: &'static [&'static str],

    /// In groups: bot must be admin and sender must be admin/owner/sudo.
    pub requires_admin: bool,

    /// Sender must be the bot account, the owner number, or sudo.
    pub requires_owner: bool,

    pub help: &'static str,

    pub handler: HandlerFn,
}

/// The command table, built once at startup and immutable afterwards.
pub struct Registry {
    commands: Vec<CommandSpec>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// # Panics
    /// Panics if two commands register the same token.
    pub fn new(commands: Vec<CommandSpec>) -> Self {
        let mut index = HashMap::new();
        for (i, spec) in commands.iter().enumerate() {
            for token in std::iter::once(spec.name).chain(spec.aliases.iter().copied()) {
                if index.insert(token, i).is_some() {
                    panic!("duplicate command token '{token}'");
                }
            }
        }
        Self { commands, index }
    }

    /// The full built-in command table.
    pub fn builtin() -> &'static Self {
        static BUILTIN: Lazy<Registry> = Lazy::new(|| {
            let mut commands = Vec::new();
            commands.extend(antilink::commands());
            commands.extend(antiword::commands());
            commands.extend(antitag::commands());
            commands.extend(antimedia::commands());
            commands.extend(roleguard::commands());
            commands.extend(capture::commands());
            commands.extend(greetings::commands());
            commands.extend(chatbot::commands());
            commands.extend(sudo::commands());
            commands.extend(prefix::commands());
            commands.extend(banned::commands());
            commands.extend(help::commands());
            Registry::new(commands)
        });
        &BUILTIN
    }

    /// Exact-token lookup. `token` must already be lowercased.
    pub fn lookup(&self, token: &str) -> Option<&CommandSpec> {
        self.index.get(token).map(|&i| &self.commands[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Shared handler body for the enabled/action feature toggles
/// (`<cmd> on|off|delete|warn|kick|status`).
pub(crate) async fn run_toggle<T>(
    ctx: &CommandContext,
    store: &FeatureStore<T>,
    feature: &str,
    extra_usage: &str,
) -> anyhow::Result<()>
where
    T: ModToggle + Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let sub = ctx
        .arg_tokens()
        .next()
        .unwrap_or("status")
        .to_lowercase();

    match sub.as_str() {
        "on" => {
            store.update(&ctx.msg.chat, |c| c.set_enabled(true)).await;
            ctx.reply(&format!("✅ {feature} enabled for this chat.")).await
        }
        "off" => {
            store.update(&ctx.msg.chat, |c| c.set_enabled(false)).await;
            ctx.reply(&format!("✅ {feature} disabled for this chat.")).await
        }
        "delete" | "warn" | "kick" => {
            let action = ModAction::parse(&sub).unwrap_or(ModAction::Delete);
            store.update(&ctx.msg.chat, |c| c.set_action(action)).await;
            ctx.reply(&format!("✅ {feature} action set to {}.", action.as_str())).await
        }
        "status" => {
            let config = store.get(&ctx.msg.chat).await;
            let enabled = if config.enabled() { "on" } else { "off" };
            ctx.reply(&format!(
                "{feature}: {enabled}, action: {}\nUsage: on | off | delete | warn | kick{extra_usage}",
                config.action().as_str()
            ))
            .await
        }
        other => {
            warn!("unknown {} subcommand '{}'", feature, other);
            ctx.reply(&format!(
                "Usage: on | off | delete | warn | kick{extra_usage}"
            ))
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_matches_exact_tokens_only() {
        let registry = Registry::builtin();
        assert!(!registry.is_empty());

        // Exact names and aliases resolve.
        assert_eq!(registry.lookup("antidemote").unwrap().name, "antidemote");
        assert_eq!(registry.lookup("antiword").unwrap().name, "antibadword");
        assert_eq!(registry.lookup("menu").unwrap().name, "help");

        // No substring or prefix matching: a bare "anti" is not a command
        // and cannot shadow the more specific names.
        assert!(registry.lookup("anti").is_none());
        assert!(registry.lookup("antidemotely").is_none());

        // Matching is done on pre-lowercased tokens.
        assert!(registry.lookup("AntiLink").is_none());
        assert!(registry.lookup("antilink").is_some());
    }

    #[test]
    fn owner_commands_are_flagged() {
        let registry = Registry::builtin();
        for name in ["sudo", "setprefix", "ban", "unban"] {
            assert!(registry.lookup(name).unwrap().requires_owner, "{name} is owner-only");
        }
        for name in ["antilink", "antitag", "welcome", "antiedit"] {
            assert!(registry.lookup(name).unwrap().requires_admin, "{name} needs admin");
        }
    }

    #[test]
    #[should_panic(expected = "duplicate command token")]
    fn duplicate_tokens_are_rejected() {
        let mut commands = antilink::commands();
        commands.extend(antilink::commands());
        Registry::new(commands);
    }
}
