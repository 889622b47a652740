//! Help command, rendered from the registry.

use std::fmt::Write as _;

use super::{CommandContext, CommandSpec, HandlerFuture, Registry};

pub fn commands() -> Vec<CommandSpec> {
    vec![CommandSpec {
        name: "help",
        aliases: &["menu"],
        requires_admin: false,
        requires_owner: false,
        help: "List available commands",
        handler: help_command,
    }]
}

fn help_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let prefix = ctx.state.stores.prefix.get().await;
        let marker = match &prefix {
            crate::store::Prefix::Symbol(s) => s.clone(),
            crate::store::Prefix::None => String::new(),
        };

        let mut text = format!("*{}* - available commands:\n", ctx.state.settings.bot_name);
        for spec in Registry::builtin().iter() {
            let _ = writeln!(text, "• {}{} - {}", marker, spec.name, spec.help);
        }
        ctx.reply(text.trim_end()).await
    })
}
