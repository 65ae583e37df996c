//! `!story` - record channel messages starting with `+` into a transcript.

use rand::seq::IndexedRandom;

use crate::dispatch::MessageCtx;
use crate::state::BotState;

const ADJECTIVES: &[&str] = &[
    "amazing",
    "fantastic",
    "wonderful",
    "excellent",
    "magnificent",
    "brilliant",
    "genius",
    "wonderful",
    "mesmerizing",
];

pub const NO_WORDS: &str = "Your story had no words! 👎";
pub const RECORDING: &str =
    "Recording *all words* starting with +, write only + to add new paragraph.";

/// Toggle story mode for the channel. Toggling off emits the transcript.
pub async fn toggle(state: &BotState, ctx: &MessageCtx) -> String {
    let mut stories = state.stories.lock().await;
    let story = stories.entry(ctx.channel_id.clone()).or_default();

    if story.recording {
        story.recording = false;
        if story.text.is_empty() {
            NO_WORDS.to_string()
        } else {
            let adjective = ADJECTIVES
                .choose(&mut rand::rng())
                .copied()
                .unwrap_or("amazing");
            format!("Your {} story: ```{}```", adjective, story.text)
        }
    } else {
        story.recording = true;
        story.text.clear();
        RECORDING.to_string()
    }
}

pub async fn is_recording(state: &BotState, ctx: &MessageCtx) -> bool {
    state
        .stories
        .lock()
        .await
        .get(&ctx.channel_id)
        .map(|s| s.recording)
        .unwrap_or(false)
}

/// Append a `+`-prefixed message to the transcript. A bare `+` starts a new
/// paragraph; a leading `+` on a word is stripped.
pub async fn append(state: &BotState, ctx: &MessageCtx, args: &[String]) {
    let mut stories = state.stories.lock().await;
    let story = stories.entry(ctx.channel_id.clone()).or_default();

    for token in args {
        if token == "+" {
            story.text.push_str("\n\n");
        } else if !token.is_empty() {
            let word = token.strip_prefix('+').unwrap_or(token);
            story.text.push_str(word);
            story.text.push(' ');
        }
    }
}
