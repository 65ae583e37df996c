//! Subreddit link expansion and its per-server toggle.

use crate::dispatch::MessageCtx;
use crate::error::Result;
use crate::state::BotState;
use crate::store::DEFAULT_KEY;

/// First subreddit reference (`/r/<name>`) in the arguments.
pub fn subreddit_in(args: &[String]) -> Option<&str> {
    args.iter()
        .find_map(|arg| arg.strip_prefix("/r/"))
        .filter(|name| !name.is_empty())
}

/// Expand the reference to a full link, if the server has the feature on.
///
/// Only a truthy server setting overrides the default: switching a server
/// off falls back to whatever the default says.
pub async fn link(state: &BotState, ctx: &MessageCtx, args: &[String]) -> Result<Option<String>> {
    let name = match subreddit_in(args) {
        Some(name) => name,
        None => return Ok(None),
    };

    let reddit = state.reddit.lock().await;
    let default_enabled = reddit.get(DEFAULT_KEY).copied().unwrap_or(false);
    let server_enabled = reddit.get(&ctx.server_id).copied().unwrap_or(false);

    Ok(if server_enabled || default_enabled {
        Some(format!("https://www.reddit.com/r/{}", name))
    } else {
        None
    })
}

/// Flip the server's toggle. Used by `!rufus --reddit`.
pub async fn toggle(state: &BotState, ctx: &MessageCtx) -> Result<String> {
    let mut reddit = state.reddit.lock().await;
    let enabled = reddit.get(&ctx.server_id).copied().unwrap_or(false);

    Ok(if enabled {
        reddit.set(&ctx.server_id, false)?;
        "*Automatic subreddit linking* ***disabled*** *for this server*".to_string()
    } else {
        reddit.set(&ctx.server_id, true)?;
        "*Automatic subreddit linking* ***enabled*** *for this server*".to_string()
    })
}
