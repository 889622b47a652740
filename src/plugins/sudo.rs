//! Sudo list management. Owner only.

use super::{CommandContext, CommandSpec, HandlerFuture};
use crate::utils::phone_digits;

pub fn commands() -> Vec<CommandSpec> {
    vec![CommandSpec {
        name: "sudo",
        aliases: &[],
        requires_admin: false,
        requires_owner: true,
        help: "Manage sudo users (add/del/list)",
        handler: sudo_command,
    }]
}

fn sudo_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let sudo = &ctx.state.stores.sudo;
        let sub = ctx.arg_tokens().next().unwrap_or("list").to_lowercase();

        match sub.as_str() {
            "add" => {
                let Some(number) = target_number(ctx) else {
                    return ctx.reply("Usage: sudo add <number>").await;
                };
                if number == ctx.state.settings.owner_number {
                    return ctx.reply("The owner is always privileged.").await;
                }
                if sudo.add(&number).await {
                    ctx.reply(&format!("✅ {number} can now use owner commands.")).await
                } else {
                    ctx.reply(&format!("{number} is already a sudo user.")).await
                }
            }
            "del" | "remove" => {
                let Some(number) = target_number(ctx) else {
                    return ctx.reply("Usage: sudo del <number>").await;
                };
                if number == ctx.state.settings.owner_number {
                    // The owner's own number is implicitly privileged and
                    // cannot be revoked.
                    return ctx.reply("The owner cannot be removed.").await;
                }
                if sudo.remove(&number).await {
                    ctx.reply(&format!("✅ Removed {number} from sudo.")).await
                } else {
                    ctx.reply(&format!("{number} is not a sudo user.")).await
                }
            }
            "list" => {
                let numbers = sudo.list().await;
                if numbers.is_empty() {
                    ctx.reply("No sudo users configured.").await
                } else {
                    ctx.reply(&format!("Sudo users:\n{}", numbers.join("\n"))).await
                }
            }
            _ => ctx.reply("Usage: sudo add <number> | del <number> | list").await,
        }
    })
}

/// Number from the first mentioned user, or from the second argument.
fn target_number(ctx: &CommandContext) -> Option<String> {
    if let Some(jid) = ctx.msg.mentioned.first() {
        let resolved = ctx.state.resolver.resolve(jid);
        if let Some(number) = resolved.phone_number() {
            return Some(number.to_string());
        }
    }

    let digits = phone_digits(ctx.arg_tokens().nth(1)?);
    (!digits.is_empty()).then_some(digits)
}
