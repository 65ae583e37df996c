//! `!yn` - yes/no (or multiple choice) replies with per-channel lists.
//!
//! Scope precedence on lookup: channel list over server list over the
//! process-wide default.

use rand::seq::IndexedRandom;

use crate::dispatch::MessageCtx;
use crate::error::Result;
use crate::state::BotState;
use crate::store::DEFAULT_KEY;

const SAME_AS_SERVER_WARNING: &str =
    "\n*setting YN for this channel is* ***the same*** *as setting server wide YN*";

pub async fn run(state: &BotState, ctx: &MessageCtx, args: &[String]) -> Result<Option<String>> {
    let mut reply: Option<String> = None;

    if args.len() > 1 && (args[1] == "--set" || args[1] == "--global-set") {
        let globally = args[1] == "--global-set";
        let scope_key = if globally {
            &ctx.server_id
        } else {
            &ctx.channel_id
        };
        let scope_name = if globally { "server" } else { "channel" };

        let mut yn = state.yn.lock().await;

        if let Some((mentioned_id, mention_text)) = ctx.channel_mentions.first() {
            // Clone the mentioned channel's list into this scope.
            if let Some(list) = yn.get(mentioned_id).cloned() {
                yn.set(scope_key, list)?;
                reply = Some(format!(
                    "YN {}cloned from {}",
                    if globally { "globally " } else { "" },
                    mention_text
                ));
            }
        } else if args.len() > 3 {
            let values: Vec<String> = args[2..].iter().map(|a| a.replace('_', " ")).collect();
            yn.set(scope_key, values.clone())?;

            let formatted = values
                .iter()
                .map(|v| format!("`{}`", v))
                .collect::<Vec<_>>()
                .join(",");
            reply = Some(format!("YN set to {} for this {}", formatted, scope_name));
        } else {
            yn.remove(scope_key)?;
            reply = Some(format!("YN reset for this {}", scope_name));
        }

        // In a plain chat the channel and the server are the same scope.
        if let Some(text) = reply.as_mut() {
            if !globally && ctx.channel_id == ctx.server_id {
                text.push_str(SAME_AS_SERVER_WARNING);
            }
        }
    }

    if reply.is_none() {
        let yn = state.yn.lock().await;
        let list = yn
            .get(&ctx.channel_id)
            .or_else(|| yn.get(&ctx.server_id))
            .or_else(|| yn.get(DEFAULT_KEY))
            .cloned()
            .unwrap_or_else(|| vec!["yes".to_string(), "no".to_string()]);
        reply = list.choose(&mut rand::rng()).cloned();
    }

    Ok(reply)
}
