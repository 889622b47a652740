//! Mass-tag and group-mention commands.

use super::{CommandContext, CommandSpec, HandlerFuture, run_toggle};

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "antitag",
            aliases: &[],
            requires_admin: true,
            requires_owner: false,
            help: "Moderate mass tagging (on/off/limit <n>)",
            handler: antitag_command,
        },
        CommandSpec {
            name: "antigroupmention",
            aliases: &["antimention"],
            requires_admin: true,
            requires_owner: false,
            help: "Moderate @everyone-style mentions (on/off)",
            handler: antimention_command,
        },
    ]
}

fn antitag_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let store = &ctx.state.stores.antitag;
        let sub = ctx.arg_tokens().next().unwrap_or("").to_lowercase();

        if sub == "limit" {
            let Some(limit) = ctx.arg_tokens().nth(1).and_then(|t| t.parse::<usize>().ok()) else {
                return ctx.reply("Usage: antitag limit <number>").await;
            };
            if limit == 0 {
                return ctx.reply("The limit must be at least 1.").await;
            }
            store.update(&ctx.msg.chat, |c| c.threshold = limit).await;
            return ctx
                .reply(&format!("✅ Messages tagging {limit}+ users will be moderated."))
                .await;
        }

        run_toggle(ctx, store, "Antitag", " | limit <n>").await
    })
}

fn antimention_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        run_toggle(ctx, &ctx.state.stores.antimention, "Antigroupmention", "").await
    })
}
