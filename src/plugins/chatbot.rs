//! Chatbot auto-reply toggle.

use super::{CommandContext, CommandSpec, HandlerFuture};

pub fn commands() -> Vec<CommandSpec> {
    vec![CommandSpec {
        name: "chatbot",
        aliases: &[],
        requires_admin: false,
        requires_owner: true,
        help: "Toggle AI auto-replies for this chat (on/off)",
        handler: chatbot_command,
    }]
}

fn chatbot_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move {
        let store = &ctx.state.stores.chatbot;
        match ctx.arg_tokens().next().unwrap_or("status").to_lowercase().as_str() {
            "on" => {
                if ctx.state.settings.chatbot_api_url.is_none() {
                    return ctx.reply("No chatbot endpoint is configured.").await;
                }
                store.update(&ctx.msg.chat, |c| c.enabled = true).await;
                ctx.reply("🤖 Chatbot enabled for this chat.").await
            }
            "off" => {
                store.update(&ctx.msg.chat, |c| c.enabled = false).await;
                ctx.reply("🤖 Chatbot disabled for this chat.").await
            }
            _ => {
                let config = store.get(&ctx.msg.chat).await;
                let enabled = if config.enabled { "on" } else { "off" };
                ctx.reply(&format!("Chatbot: {enabled}\nUsage: chatbot on | off")).await
            }
        }
    })
}
