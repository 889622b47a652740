//! Welcome/goodbye commands.

use super::{CommandContext, CommandSpec, HandlerFuture};
use crate::store::FeatureStore;
use crate::store::models::GreetingConfig;

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "welcome",
            aliases: &[],
            requires_admin: true,
            requires_owner: false,
            help: "Greet new members (on/off/set <text>/reset)",
            handler: welcome_command,
        },
        CommandSpec {
            name: "goodbye",
            aliases: &["bye"],
            requires_admin: true,
            requires_owner: false,
            help: "Send a farewell when members leave (on/off/set <text>/reset)",
            handler: goodbye_command,
        },
    ]
}

fn welcome_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move { run_greeting(ctx, &ctx.state.stores.welcome, "Welcome").await })
}

fn goodbye_command(ctx: &CommandContext) -> HandlerFuture<'_> {
    Box::pin(async move { run_greeting(ctx, &ctx.state.stores.goodbye, "Goodbye").await })
}

async fn run_greeting(
    ctx: &CommandContext,
    store: &FeatureStore<GreetingConfig>,
    feature: &str,
) -> anyhow::Result<()> {
    let sub = ctx.arg_tokens().next().unwrap_or("status").to_lowercase();

    match sub.as_str() {
        "on" => {
            store.update(&ctx.msg.chat, |c| c.enabled = true).await;
            ctx.reply(&format!("✅ {feature} messages enabled.")).await
        }
        "off" => {
            store.update(&ctx.msg.chat, |c| c.enabled = false).await;
            ctx.reply(&format!("✅ {feature} messages disabled.")).await
        }
        "set" => {
            // Keep the template in its original case.
            let template = strip_subcommand(&ctx.args);
            if template.is_empty() {
                return ctx
                    .reply("Usage: set <text> ({user} and {subject} are filled in)")
                    .await;
            }
            store
                .update(&ctx.msg.chat, |c| c.text = Some(template.to_string()))
                .await;
            ctx.reply(&format!("✅ {feature} message updated.")).await
        }
        "reset" => {
            store.remove(&ctx.msg.chat).await;
            ctx.reply(&format!("✅ {feature} reset to defaults.")).await
        }
        "status" => {
            let config = store.get(&ctx.msg.chat).await;
            let enabled = if config.enabled { "on" } else { "off" };
            let text = config.text.as_deref().unwrap_or("(default)");
            ctx.reply(&format!(
                "{feature}: {enabled}\nMessage: {text}\nUsage: on | off | set <text> | reset"
            ))
            .await
        }
        _ => ctx.reply("Usage: on | off | set <text> | reset").await,
    }
}

/// The argument remainder after the first token, original case preserved.
fn strip_subcommand(args: &str) -> &str {
    let trimmed = args.trim_start();
    match trimmed.find(char::is_whitespace) {
        Some(pos) => trimmed[pos..].trim(),
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_subcommand_preserves_case_and_spacing() {
        assert_eq!(strip_subcommand("set Hello {user}!"), "Hello {user}!");
        assert_eq!(strip_subcommand("set"), "");
        assert_eq!(strip_subcommand("  set   Welcome Aboard "), "Welcome Aboard");
    }
}
