//! `!remindme` - schedule a private wake-up call.

use chrono::Local;

use crate::dispatch::{Dispatcher, MessageCtx};
use crate::error::Result;
use crate::reminders;

const USAGE_REPLY: &str =
    "Please specify when you want to be reminded: `!remindme <at> <time ...>`";

pub async fn run(d: &Dispatcher, ctx: &MessageCtx, args: &[String]) -> Result<Option<String>> {
    if args.len() < 2 || args[1] != "at" {
        return Ok(Some(USAGE_REPLY.to_string()));
    }
    if args.len() < 3 {
        return Ok(Some(
            "When do you want to be reminded? `!remindme <at> <time ...>`".to_string(),
        ));
    }

    let requested = args[2..].join(" ");
    let now = Local::now();

    let when = match reminders::parse_when(&requested, now) {
        Some(when) => when,
        None => return Ok(Some(format!("I can not remind you at {}", requested))),
    };
    if when <= now {
        return Ok(Some("I can only remind you in the future.".to_string()));
    }

    reminders::schedule(
        d.state.clone(),
        d.platform.clone(),
        ctx.author_id.clone(),
        when,
    )
    .await?;

    Ok(Some(format!(
        "I will remind you at {}",
        when.format("%Y-%m-%d %H:%M:%S")
    )))
}
