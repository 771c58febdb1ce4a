use std::{
    env, fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use serde::Deserialize;

use crate::error::{BotError, Result};

/// Location of the optional YAML settings file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "data/settings/config.yml";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "BOT_CONFIG_PATH";

pub const DEFAULT_PREFIX: &str = "!";

/// On-disk settings file layout.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsFile {
    #[serde(rename = "BOT_CONFIG", default)]
    pub bot: Option<BotSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BotSection {
    #[serde(rename = "TOKEN", default)]
    pub token: Option<String>,
    #[serde(rename = "PREFIX", default)]
    pub prefix: Option<String>,
    #[serde(rename = "IPINFO_TOKEN", default)]
    pub ipinfo_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub prefix: String,
    pub ipinfo_token: Option<String>,
}

impl Config {
    /// Load configuration from `.env`, the settings file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::MissingBotToken`] when no bot token is configured.
    pub fn load() -> Result<Self> {
        debug!("Loading configuration");
        dotenvy::dotenv().ok();

        let path = env::var(CONFIG_PATH_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        let settings = read_settings(&path);

        Self::resolve(settings.as_ref(), |key| env::var(key).ok())
    }

    /// Resolve each value by precedence: settings file, then environment, then default.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::MissingBotToken`] when neither the file nor the
    /// environment provides a bot token.
    pub fn resolve(
        settings: Option<&SettingsFile>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let section = settings.and_then(|s| s.bot.as_ref());
        let from_file = |pick: fn(&BotSection) -> Option<&String>| {
            section.and_then(pick).and_then(|v| non_empty(v.clone()))
        };
        let from_env = |key: &str| env(key).and_then(non_empty);

        let Some(bot_token) = from_file(|s| s.token.as_ref())
            .or_else(|| from_env("BOT_TOKEN"))
            .or_else(|| from_env("DISCORD_TOKEN"))
        else {
            error!("{}", BotError::MissingBotToken);
            return Err(BotError::MissingBotToken);
        };

        let prefix = from_file(|s| s.prefix.as_ref())
            .or_else(|| from_env("BOT_PREFIX"))
            .unwrap_or_else(|| {
                info!("No command prefix configured, using default '{DEFAULT_PREFIX}'");
                DEFAULT_PREFIX.to_string()
            });

        let ipinfo_token = from_file(|s| s.ipinfo_token.as_ref())
            .or_else(|| from_env("IPINFO_TOKEN"))
            .or_else(|| from_env("IPINFO_IO_TOKEN"));
        if ipinfo_token.is_none() {
            warn!("No ipinfo.io token provided. Requests will be subject to unauthenticated rate limits");
        }

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", bot_token.len());
        debug!("Command prefix: {prefix}");
        debug!(
            "ipinfo token length: {} characters",
            ipinfo_token.as_ref().map_or(0, String::len)
        );

        Ok(Self {
            bot_token,
            prefix,
            ipinfo_token,
        })
    }
}

/// Read and parse the settings file.
///
/// A missing, unreadable or malformed file yields `None` so that resolution
/// falls through to the environment.
#[must_use]
pub fn read_settings(path: &Path) -> Option<SettingsFile> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            info!(
                "Config file not found at {} ({e}), falling back to environment variables",
                path.display()
            );
            return None;
        }
    };

    if content.trim().is_empty() {
        return Some(SettingsFile::default());
    }

    match serde_yaml::from_str(&content) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Failed to parse {}: {e}", path.display());
            None
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
