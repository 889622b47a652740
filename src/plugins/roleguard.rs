//! Promote/demote guard commands.

use super::{CommandContext, CommandSpec, HandlerFuture};
use crate::store::FeatureStore;
use crate::store::models::{GuardMode, RoleGuardConfig};

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "antipromote",
            aliases: &[],
            requires_admin: true,
            requires_owner: false,
            help: "Revert or punish unauthorized promotes (on/off/revert/kick)",
            handler: antipromote_command,
        },
        CommandSpec {
            name: "antidemote",
            aliases: &[],
            requires_admin: true,
            requires_owner: false,
            help: "Revert or punish unauthorized demotes (on/off/revert/kick)",
            handler: antidemote_command,
        },
    ]
}

fn antipromote_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move { run_guard(ctx, &ctx.state.stores.antipromote, "Antipromote").await })
}

fn antidemote_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move { run_guard(ctx, &ctx.state.stores.antidemote, "Antidemote").await })
}

async fn run_guard(
    ctx: &CommandContext,
    store: &FeatureStore<RoleGuardConfig>,
    feature: &str,
) -> anyhow::Result<()> {
    let sub = ctx.arg_tokens().next().unwrap_or("status").to_lowercase();

    match sub.as_str() {
        "on" => {
            store.update(&ctx.msg.chat, |c| c.enabled = true).await;
            ctx.reply(&format!("✅ {feature} enabled for this chat.")).await
        }
        "off" => {
            store.update(&ctx.msg.chat, |c| c.enabled = false).await;
            ctx.reply(&format!("✅ {feature} disabled for this chat.")).await
        }
        "revert" | "kick" => {
            let mode = GuardMode::parse(&sub).unwrap_or_default();
            store.update(&ctx.msg.chat, |c| c.mode = mode).await;
            ctx.reply(&format!("✅ {feature} mode set to {sub}.")).await
        }
        "status" => {
            let config = store.get(&ctx.msg.chat).await;
            let enabled = if config.enabled { "on" } else { "off" };
            let mode = match config.mode {
                GuardMode::Revert => "revert",
                GuardMode::Kick => "kick",
            };
            ctx.reply(&format!(
                "{feature}: {enabled}, mode: {mode}\nUsage: on | off | revert | kick"
            ))
            .await
        }
        _ => ctx.reply("Usage: on | off | revert | kick").await,
    }
}
