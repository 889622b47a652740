//! Antiedit/antidelete commands.

use super::{CommandContext, CommandSpec, HandlerFuture};
use crate::store::FeatureStore;
use crate::store::models::{CaptureConfig, NotifyTarget};

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "antiedit",
            aliases: &[],
            requires_admin: true,
            requires_owner: false,
            help: "Report edited messages (on/off/owner/chat/both)",
            handler: antiedit_command,
        },
        CommandSpec {
            name: "antidelete",
            aliases: &[],
            requires_admin: true,
            requires_owner: false,
            help: "Repost deleted messages (on/off/owner/chat/both)",
            handler: antidelete_command,
        },
    ]
}

fn antiedit_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move { run_capture(ctx, &ctx.state.stores.antiedit, "Antiedit").await })
}

fn antidelete_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move { run_capture(ctx, &ctx.state.stores.antidelete, "Antidelete").await })
}

async fn run_capture(
    ctx: &CommandContext,
    store: &FeatureStore<CaptureConfig>,
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
        "owner" | "chat" | "both" => {
            let notify = NotifyTarget::parse(&sub).unwrap_or_default();
            store.update(&ctx.msg.chat, |c| c.notify = notify).await;
            ctx.reply(&format!("✅ {feature} notices go to: {sub}.")).await
        }
        "status" => {
            let config = store.get(&ctx.msg.chat).await;
            let enabled = if config.enabled { "on" } else { "off" };
            let notify = match config.notify {
                NotifyTarget::Owner => "owner",
                NotifyTarget::Chat => "chat",
                NotifyTarget::Both => "both",
            };
            ctx.reply(&format!(
                "{feature}: {enabled}, notify: {notify}\nUsage: on | off | owner | chat | both"
            ))
            .await
        }
        _ => ctx.reply("Usage: on | off | owner | chat | both").await,
    }
}
