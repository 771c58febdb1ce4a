use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Serenity error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),

    #[error("No Discord bot token found. Set TOKEN under BOT_CONFIG in the config file, or BOT_TOKEN / DISCORD_TOKEN in the environment")]
    MissingBotToken,
}

impl From<poise::serenity_prelude::Error> for BotError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        BotError::Serenity(Box::new(err))
    }
}

impl BotError {
    /// Returns a user-friendly error message suitable for displaying in Discord
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            BotError::Serenity(_) => {
                "Sorry, I'm having trouble communicating with Discord right now. Please try again later.".to_string()
            }
            BotError::MissingBotToken => {
                "Sorry, there's a configuration issue on my end. Please contact the bot administrator.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Failure of a single ipinfo.io lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    /// DNS, connection or timeout failure while talking to the provider.
    #[error("{0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The provider answered with something other than 200 OK.
    #[error("ipinfo returned status {status}: {body}")]
    Provider { status: StatusCode, body: String },

    /// Anything else that went wrong around the call.
    #[error("{0}")]
    Request(String),
}

impl LookupError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            LookupError::Network(e) => format!("Network error while querying ipinfo: {e}"),
            LookupError::Provider { .. } | LookupError::Request(_) => {
                format!("Error fetching data: {self}")
            }
        }
    }
}

/// Drops the request URL, which carries the API token.
impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_builder() || err.is_decode() {
            LookupError::Request(err.to_string())
        } else {
            LookupError::Network(Box::new(err))
        }
    }
}
