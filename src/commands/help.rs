//! `!help`, `!rufus` and its flags (`--git`, `--reddit`, `--mood`).

use crate::commands::{reddit, GIT_URL, USAGE};
use crate::dispatch::{Dispatcher, MessageCtx};
use crate::error::Result;

pub async fn run(d: &Dispatcher, ctx: &MessageCtx, args: &[String]) -> Result<Option<String>> {
    if args.len() > 1 {
        match args[1].as_str() {
            "--git" => return Ok(Some(GIT_URL.to_string())),
            "--reddit" => return Ok(Some(reddit::toggle(&d.state, ctx).await?)),
            "--mood" => {
                if args.len() > 2 && d.platform.is_admin(ctx).await? {
                    set_mood(d, &args[2].to_lowercase()).await?;
                }
                return Ok(None);
            }
            _ => {}
        }
    }

    Ok(Some(render_usage()))
}

/// Persist the mood and publish it as the bot's profile note. `default`
/// clears both.
pub async fn set_mood(d: &Dispatcher, mood: &str) -> Result<()> {
    if mood == "default" {
        d.platform.set_profile_note(None).await?;
        d.state.moods.lock().await.remove("current")?;
    } else {
        d.platform.set_profile_note(Some(mood)).await?;
        d.state
            .moods
            .lock()
            .await
            .set("current", mood.to_string())?;
    }
    tracing::info!("Mood set to {}", mood);
    Ok(())
}

/// The command table as an aligned code block.
fn render_usage() -> String {
    let width = USAGE.iter().map(|(trigger, _)| trigger.len()).max().unwrap_or(0) + 4;

    let mut out = String::from("Commands: ```");
    for (trigger, description) in USAGE {
        out.push('\n');
        out.push_str(trigger);
        for _ in trigger.len()..width {
            out.push(' ');
        }
        out.push_str(description);
    }
    out.push_str("```");
    out
}
