//! The `ipinfo` lookup command.

use std::time::{Duration, Instant};

use log::{debug, error, info};
use poise::{CreateReply, serenity_prelude::UserId};

use crate::{
    card::{DisplayCard, build_card},
    cooldown::Cooldowns,
    error::{LookupError, Result},
    ipinfo::GeoLookup,
};

use super::Context;

pub const COMMAND_NAME: &str = "ipinfo";

pub const BOGON_NOTICE: &str =
    "The queried IP is a bogon/reserved address and has no public information.";

/// What to send back for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Card(Box<DisplayCard>),
}

#[must_use]
pub fn usage_hint(prefix: &str) -> String {
    format!("You need to provide an IP address or hostname. Example: `{prefix}ipinfo 8.8.8.8`")
}

fn cooldown_notice(remaining: Duration) -> String {
    format!(
        "You are on cooldown. Try again in {:.2}s.",
        remaining.as_secs_f64()
    )
}

/// Run one `ipinfo` invocation against `lookup` and decide the reply.
///
/// The argument is checked before the cooldown so a bad invocation does not
/// use up the caller's bucket.
pub async fn handle_ipinfo<L: GeoLookup>(
    lookup: &L,
    cooldowns: &Cooldowns,
    user: UserId,
    target: Option<&str>,
    prefix: &str,
    now: Instant,
) -> Reply {
    let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) else {
        return Reply::Text(usage_hint(prefix));
    };

    if let Err(remaining) = cooldowns.try_acquire(COMMAND_NAME, user, now) {
        debug!("User {user} hit the {COMMAND_NAME} cooldown ({remaining:?} left)");
        return Reply::Text(cooldown_notice(remaining));
    }

    let result = match lookup.fetch(target).await {
        Ok(result) => result,
        Err(e) => {
            match &e {
                LookupError::Network(_) => {
                    error!("Network error fetching ipinfo for '{target}': {e}");
                }
                LookupError::Provider { .. } | LookupError::Request(_) => {
                    error!("Failed to fetch ipinfo for '{target}': {e}");
                }
            }
            return Reply::Text(e.user_message());
        }
    };

    if result.is_bogon() {
        info!("'{target}' is a bogon address");
        return Reply::Text(BOGON_NOTICE.to_string());
    }
    if let Some(provider_error) = result.provider_error() {
        info!("ipinfo reported an error for '{target}': {provider_error}");
        return Reply::Text(format!("ipinfo error: {provider_error}"));
    }

    Reply::Card(Box::new(build_card(target, &result)))
}

/// Look up public information about an IP address or hostname.
#[poise::command(prefix_command, slash_command)]
pub async fn ipinfo(
    ctx: Context<'_>,
    #[description = "IP address or hostname"] target: Option<String>,
) -> Result<()> {
    let data = ctx.data();
    info!(
        "{} requested ipinfo for {:?} in channel {}",
        ctx.author().tag(),
        target,
        ctx.channel_id()
    );

    if let Err(e) = ctx.defer_or_broadcast().await {
        debug!("Failed to broadcast typing indicator: {e}");
    }

    let reply = handle_ipinfo(
        data.lookup(),
        data.cooldowns(),
        ctx.author().id,
        target.as_deref(),
        data.prefix(),
        Instant::now(),
    )
    .await;

    match reply {
        Reply::Text(text) => {
            ctx.say(text).await?;
        }
        Reply::Card(card) => {
            ctx.send(CreateReply::default().embed(card.to_embed())).await?;
        }
    }
    Ok(())
}
