//! Antilink commands.

use super::{CommandContext, CommandSpec, HandlerFuture, run_toggle};

pub fn commands() -> Vec<CommandSpec> {
    vec![CommandSpec {
        name: "antilink",
        aliases: &[],
        requires_admin: true,
        requires_owner: false,
        help: "Moderate invite links (on/off/delete/warn/kick)",
        handler: antilink_command,
    }]
}

fn antilink_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move { run_toggle(ctx, &ctx.state.stores.antilink, "Antilink", "").await })
}
