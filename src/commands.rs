//! Prefix and slash commands.

mod help;
mod lookup;

pub use help::{help, help_text};
pub use lookup::{Reply, handle_ipinfo, ipinfo, usage_hint};

use crate::{bot::Data, error::BotError};

/// Context type for bot commands.
pub type Context<'a> = poise::Context<'a, Data, BotError>;

/// Get all bot commands.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<Data, BotError>> {
    vec![help(), ipinfo()]
}
