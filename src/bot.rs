//! Discord client setup and framework wiring.

use log::{debug, error, info, warn};
use poise::{
    Framework, FrameworkError, FrameworkOptions, PrefixFrameworkOptions, builtins,
    serenity_prelude::{ClientBuilder, GatewayIntents},
};

use crate::commands::{all_commands, usage_hint};
use crate::config::Config;
use crate::cooldown::{Cooldowns, LOOKUP_COOLDOWN};
use crate::error::{BotError, Result};
use crate::ipinfo::IpInfoClient;

/// Application state handed to every command.
pub struct Data {
    prefix: String,
    lookup: IpInfoClient,
    cooldowns: Cooldowns,
}

impl Data {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            prefix: config.prefix.clone(),
            lookup: IpInfoClient::new(config.ipinfo_token.clone()),
            cooldowns: Cooldowns::new(LOOKUP_COOLDOWN),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn lookup(&self) -> &IpInfoClient {
        &self.lookup
    }

    #[must_use]
    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }
}

/// Run the Discord bot.
///
/// # Errors
///
/// Fails when the bot token is missing or the Discord client cannot start.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::load()?;
    let data = Data::new(&config);

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: all_commands(),
            prefix_options: PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {} (id: {})", ready.user.tag(), ready.user.id);
                debug!("Registering commands globally");
                builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Bot is ready.");
                Ok(data)
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(&config.bot_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down.");
        }
    }

    Ok(())
}

async fn on_error(error: FrameworkError<'_, Data, BotError>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command '{}' failed for {}: {}",
                ctx.command().name,
                ctx.author().tag(),
                error
            );
            if let Err(e) = ctx.say(error.user_message()).await {
                warn!("Failed to send error reply: {e}");
            }
        }
        FrameworkError::ArgumentParse { error, ctx, .. } => {
            debug!(
                "Bad arguments for '{}' from {}: {}",
                ctx.command().name,
                ctx.author().tag(),
                error
            );
            if let Err(e) = ctx.say(usage_hint(ctx.data().prefix())).await {
                warn!("Failed to send usage hint: {e}");
            }
        }
        other => {
            if let Err(e) = builtins::on_error(other).await {
                error!("Error while handling framework error: {e}");
            }
        }
    }
}
