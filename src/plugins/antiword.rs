//! Bad-word list commands.
//!
//! `antibadword` extends the common toggle with word-list management:
//! `add <word>`, `del <word>`, `list`.

use super::{CommandContext, CommandSpec, HandlerFuture, run_toggle};

pub fn commands() -> Vec<CommandSpec> {
    vec![CommandSpec {
        name: "antibadword",
        aliases: &["antiword"],
        requires_admin: true,
        requires_owner: false,
        help: "Moderate configured bad words (on/off/add/del/list)",
        handler: antiword_command,
    }]
}

fn antiword_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let store = &ctx.state.stores.antiword;
        let sub = ctx.arg_tokens().next().unwrap_or("").to_lowercase();

        match sub.as_str() {
            "add" => {
                let Some(word) = ctx.arg_tokens().nth(1) else {
                    return ctx.reply("Usage: antibadword add <word>").await;
                };
                let added = store.update(&ctx.msg.chat, |c| c.add_word(word)).await;
                if added {
                    ctx.reply(&format!("✅ Added \"{}\" to the bad-word list.", word.to_lowercase()))
                        .await
                } else {
                    ctx.reply("That word is already on the list.").await
                }
            }
            "del" | "remove" => {
                let Some(word) = ctx.arg_tokens().nth(1) else {
                    return ctx.reply("Usage: antibadword del <word>").await;
                };
                let removed = store.update(&ctx.msg.chat, |c| c.remove_word(word)).await;
                if removed {
                    ctx.reply(&format!("✅ Removed \"{}\".", word.to_lowercase())).await
                } else {
                    ctx.reply("That word is not on the list.").await
                }
            }
            "list" => {
                let config = store.get(&ctx.msg.chat).await;
                if config.words.is_empty() {
                    ctx.reply("No bad words configured for this chat.").await
                } else {
                    ctx.reply(&format!("Bad words: {}", config.words.join(", "))).await
                }
            }
            _ => {
                run_toggle(ctx, store, "Antibadword", " | add <word> | del <word> | list").await
            }
        }
    })
}
