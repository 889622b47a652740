//! Sticker and photo moderation commands.

use super::{CommandContext, CommandSpec, HandlerFuture, run_toggle};

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "antisticker",
            aliases: &[],
            requires_admin: true,
            requires_owner: false,
            help: "Moderate stickers (on/off/delete/warn/kick)",
            handler: antisticker_command,
        },
        CommandSpec {
            name: "antiphoto",
            aliases: &[],
            requires_admin: true,
            requires_owner: false,
            help: "Moderate photos (on/off/delete/warn/kick)",
            handler: antiphoto_command,
        },
    ]
}

fn antisticker_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move { run_toggle(ctx, &ctx.state.stores.antisticker, "Antisticker", "").await })
}

fn antiphoto_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move { run_toggle(ctx, &ctx.state.stores.antiphoto, "Antiphoto", "").await })
}
