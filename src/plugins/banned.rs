//! Bot-level ban list. Owner only.
//!
//! Banned senders are dropped by the dispatcher before any routing;
//! `unban` stays reachable so a mistaken ban can always be undone.

use super::{CommandContext, CommandSpec, HandlerFuture};
use crate::utils::phone_digits;

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "ban",
            aliases: &[],
            requires_admin: false,
            requires_owner: true,
            help: "Ban a number from using the bot",
            handler: ban_command,
        },
        CommandSpec {
            name: "unban",
            aliases: &[],
            requires_admin: false,
            requires_owner: true,
            help: "Lift a bot ban",
            handler: unban_command,
        },
    ]
}

fn ban_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let Some(number) = target_number(ctx) else {
            return ctx.reply("Usage: ban <number> (or mention the user)").await;
        };
        if number == ctx.state.settings.owner_number {
            return ctx.reply("The owner cannot be banned.").await;
        }
        if ctx.state.stores.banned.add(&number).await {
            ctx.reply(&format!("🚫 {number} is now banned from the bot.")).await
        } else {
            ctx.reply(&format!("{number} is already banned.")).await
        }
    })
}

fn unban_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let Some(number) = target_number(ctx) else {
            return ctx.reply("Usage: unban <number> (or mention the user)").await;
        };
        if ctx.state.stores.banned.remove(&number).await {
            ctx.reply(&format!("✅ {number} can use the bot again.")).await
        } else {
            ctx.reply(&format!("{number} is not banned.")).await
        }
    })
}

fn target_number(ctx: &CommandContext) -> Option<String> {
    if let Some(jid) = ctx.msg.mentioned.first() {
        let resolved = ctx.state.resolver.resolve(jid);
        if let Some(number) = resolved.phone_number() {
            return Some(number.to_string());
        }
    }

    let digits = phone_digits(ctx.arg_tokens().next()?);
    (!digits.is_empty()).then_some(digits)
}
