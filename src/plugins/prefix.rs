//! Prefix configuration. Owner only.

use super::{CommandContext, CommandSpec, HandlerFuture};
use crate::store::Prefix;

pub fn commands() -> Vec<CommandSpec> {
    vec![CommandSpec {
        name: "setprefix",
        aliases: &["prefix"],
        requires_admin: false,
        requires_owner: true,
        help: "Set the command prefix (1-3 chars, or \"none\")",
        handler: setprefix_command,
    }]
}

fn setprefix_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let Some(raw) = ctx.arg_tokens().next() else {
            let current = ctx.state.stores.prefix.get().await;
            return ctx
                .reply(&format!(
                    "Current prefix: {}\nUsage: setprefix <prefix|none>",
                    current.display()
                ))
                .await;
        };

        let Some(prefix) = Prefix::parse(raw) else {
            return ctx
                .reply("A prefix is 1-3 non-space characters, or \"none\" for bare commands.")
                .await;
        };

        ctx.state.stores.prefix.set(prefix.clone()).await;
        match prefix {
            Prefix::None => ctx.reply("✅ Prefix disabled - commands are bare keywords now.").await,
            Prefix::Symbol(s) => ctx.reply(&format!("✅ Prefix set to \"{s}\".")).await,
        }
    })
}
