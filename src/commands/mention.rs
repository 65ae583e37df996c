//! Conversational replies when the bot is mentioned.

use crate::dispatch::{Dispatcher, MessageCtx};
use crate::error::Result;

pub async fn run(d: &Dispatcher, ctx: &MessageCtx, args: &[String]) -> Result<Option<String>> {
    if !d.clever.enabled() {
        return Ok(None);
    }

    // Strip mention tokens; what remains is the question.
    let question = args
        .iter()
        .filter(|arg| !arg.starts_with('@'))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    if question.trim().is_empty() {
        return Ok(None);
    }

    let _ = d.platform.typing(&ctx.channel_id).await;

    let previous = {
        let sessions = d.state.clever_sessions.lock().await;
        sessions.get(&ctx.channel_id).cloned()
    };

    let reply = d.clever.ask(&question, previous.as_deref()).await?;

    if !reply.state.is_empty() {
        let mut sessions = d.state.clever_sessions.lock().await;
        sessions.insert(ctx.channel_id.clone(), reply.state);
    }

    Ok(Some(reply.output))
}
