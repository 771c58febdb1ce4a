use crate::error::Result;

use super::Context;

/// Usage text for the lookup command.
#[must_use]
pub fn help_text(prefix: &str) -> String {
    format!(
        "`{prefix}ipinfo <ip_or_hostname>` — Look up public information about an IP address or hostname on ipinfo.io\n\
         Example: `{prefix}ipinfo 8.8.8.8` or `{prefix}ipinfo example.com`"
    )
}

/// Show how to use the bot.
#[poise::command(prefix_command, slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<()> {
    ctx.say(help_text(ctx.data().prefix())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_names_command_and_example_with_prefix() {
        let text = help_text("?");
        assert!(text.starts_with("`?ipinfo <ip_or_hostname>`"));
        assert!(text.contains("Example: `?ipinfo 8.8.8.8`"));
    }
}
