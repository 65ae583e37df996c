//! `!wordsearch` - guess the host's secret word by dictionary order.
//!
//! Per channel the game moves idle -> awaiting word -> in progress -> idle.
//! The host supplies the secret in private; everyone else guesses with
//! `<word>!`. Guesses are answered with before/after in dictionary order,
//! and the discovered prefix ("hint") only ever grows.

use rand::seq::IndexedRandom;

use crate::api::wordlist;
use crate::dispatch::{Dispatcher, MessageCtx};
use crate::error::Result;
use crate::state::{BotState, WordSearch, DEFAULT_CHARSET};
use crate::store::DEFAULT_KEY;

const IN_PROGRESS: &str =
    "A word search is already in progress. Enter a word ending with `!` to guess the word!";
const NO_PERMISSION: &str = "You do not have permissions to use this command.";
const MAX_WORD_LEN: usize = 32;

/// `!wordsearch` and its flags.
pub async fn command(
    d: &Dispatcher,
    ctx: &MessageCtx,
    args: &[String],
) -> Result<Option<String>> {
    if args.len() > 1 && args[1] == "--charset" {
        return charset(d, ctx, args).await;
    }

    let session_exists = d
        .state
        .wordsearch
        .lock()
        .await
        .contains_key(&ctx.channel_id);

    if !session_exists {
        return start(d, ctx, args).await;
    }

    if args.len() > 1 && (args[1] == "--stop" || args[1] == "-s") {
        return stop(&d.state, ctx).await;
    }

    let sessions = d.state.wordsearch.lock().await;
    let session = match sessions.get(&ctx.channel_id) {
        Some(session) => session,
        None => return Ok(None),
    };
    Ok(Some(if session.word.is_some() {
        IN_PROGRESS.to_string()
    } else {
        format!("The host ({}) has yet to set a word!", session.host_mention)
    }))
}

/// Show or change the channel's secret-word alphabet.
async fn charset(d: &Dispatcher, ctx: &MessageCtx, args: &[String]) -> Result<Option<String>> {
    let requested = args.get(2).map(|s| s.to_lowercase()).unwrap_or_default();

    let existing = d
        .state
        .wordsearch_chars
        .lock()
        .await
        .get(&ctx.channel_id)
        .cloned();
    if let Some(existing) = existing {
        if requested.is_empty() {
            return Ok(Some(format!("This channels charset is `{}`.", existing)));
        }
    }

    if !d.platform.is_admin(ctx).await? {
        return Ok(Some(NO_PERMISSION.to_string()));
    }

    d.state
        .wordsearch_chars
        .lock()
        .await
        .set(&ctx.channel_id, requested.clone())?;
    Ok(Some(format!(
        "Channel `!wordsearch` charset set to `{}`.",
        requested
    )))
}

/// Start a session: manual (host picks in private) or `--auto`.
async fn start(d: &Dispatcher, ctx: &MessageCtx, args: &[String]) -> Result<Option<String>> {
    if args.len() > 1 && (args[1] == "--auto" || args[1] == "-a") {
        let amount = args
            .get(2)
            .and_then(|a| a.parse::<i64>().ok())
            .unwrap_or(1)
            .clamp(1, 5) as usize;

        let word = auto_word(&d.state, amount).await?;
        let mut session = WordSearch::new(&ctx.author_id, &ctx.author_mention);
        session.word = Some(word);
        d.state
            .wordsearch
            .lock()
            .await
            .insert(ctx.channel_id.clone(), session);
        return Ok(Some("Made me set a word.".to_string()));
    }

    d.state
        .wordsearch
        .lock()
        .await
        .insert(
            ctx.channel_id.clone(),
            WordSearch::new(&ctx.author_id, &ctx.author_mention),
        );

    d.platform
        .send_channel(
            &ctx.channel_id,
            &format!("Waiting for {} to choose a word.", ctx.author_mention),
        )
        .await?;
    d.platform
        .send_user(&ctx.author_id, "Please enter a word!")
        .await?;
    Ok(None)
}

/// Concatenate `amount` random words from the downloaded list.
async fn auto_word(state: &BotState, amount: usize) -> Result<String> {
    {
        let mut words = state.wordlist.lock().await;
        if words.is_empty() {
            *words = wordlist::fetch().await?;
        }
    }

    let words = state.wordlist.lock().await;
    let mut word = String::new();
    for _ in 0..amount {
        if let Some(chosen) = words.choose(&mut rand::rng()) {
            word.push_str(chosen.trim());
        }
    }
    Ok(word)
}

/// Cancel the session. Host only.
async fn stop(state: &BotState, ctx: &MessageCtx) -> Result<Option<String>> {
    let mut sessions = state.wordsearch.lock().await;
    let host = match sessions.get(&ctx.channel_id) {
        Some(session) => session.host_id.clone(),
        None => return Ok(None),
    };

    Ok(Some(if host == ctx.author_id {
        sessions.remove(&ctx.channel_id);
        "Word search cancelled.".to_string()
    } else {
        "You are not the host of this word search.".to_string()
    }))
}

/// A guess: the first token minus its trailing `!`.
pub async fn guess(state: &BotState, ctx: &MessageCtx, token: &str) -> Result<Option<String>> {
    let user_word = match token.strip_suffix('!') {
        Some(word) => word,
        None => return Ok(None),
    };

    let mut sessions = state.wordsearch.lock().await;
    let session = match sessions.get_mut(&ctx.channel_id) {
        Some(session) => session,
        None => return Ok(None),
    };
    // Guesses before the host has set a word go nowhere.
    let word = match session.word.clone() {
        Some(word) => word,
        None => return Ok(None),
    };

    session.tries += 1;
    let tries = session.tries;

    // The hint is only recomputed when the guess reaches it, so it can only
    // ever grow.
    let old_hint;
    let user_hint;
    if user_word.starts_with(&session.hint) {
        old_hint = session.hint.clone();
        let found = common_prefix(user_word, &word);
        session.hint = found.clone();
        user_hint = found;
    } else {
        old_hint = String::new();
        user_hint = session.hint.clone();
    }

    if user_hint == word {
        sessions.remove(&ctx.channel_id);
        let reply = if tries == 1 {
            format!(
                "***got it*** after *ONE TRY???* ✋🚫VAC🚫✋The word was `{}`.",
                word
            )
        } else if old_hint.is_empty() {
            format!(
                "***🎺🎺👌🎺WOW THIS IS UNBELIEVABLE🎺HISTORY HAS BEEN MADE, @EVERYONE🎺👌🎺🎺***\nThe word was `{}`!!",
                word.to_uppercase()
            )
        } else {
            format!(
                "***got it*** after **{}** tries! The word was `{}`.",
                tries, word
            )
        };
        return Ok(Some(reply));
    }

    let mut reply = if user_word > word.as_str() {
        format!("`{}` is *after* in the dictionary.", user_word)
    } else {
        format!("`{}` is *before* in the dictionary.", user_word)
    };
    if !user_hint.is_empty() {
        reply.push_str(&format!(" The word starts with `{}`.", user_hint));
    }
    Ok(Some(reply))
}

/// A private message from a host supplying the secret for their session.
pub async fn supply_word(
    d: &Dispatcher,
    ctx: &MessageCtx,
    args: &[String],
) -> Result<Option<String>> {
    let token = match args.first() {
        Some(token) => token,
        None => return Ok(None),
    };
    if token.chars().count() <= 1 {
        return Ok(None);
    }

    let hosted: Vec<String> = {
        let sessions = d.state.wordsearch.lock().await;
        sessions
            .iter()
            .filter(|(_, s)| s.host_id == ctx.author_id)
            .map(|(channel, _)| channel.clone())
            .collect()
    };

    let mut reply: Option<String> = None;
    for channel in hosted {
        let existing = {
            let sessions = d.state.wordsearch.lock().await;
            match sessions.get(&channel) {
                Some(session) => session.word.clone(),
                None => continue,
            }
        };

        if let Some(word) = existing {
            if reply.is_none() {
                reply = Some(format!("Word is already set to `{}`.", word));
            }
            continue;
        }

        let word = token.to_lowercase();

        let valid_chars = {
            let chars = d.state.wordsearch_chars.lock().await;
            chars
                .get(&channel)
                .or_else(|| chars.get(DEFAULT_KEY))
                .cloned()
                .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
        };
        if let Some(bad) = word.chars().find(|c| !valid_chars.contains(*c)) {
            return Ok(Some(format!("Your word has an invalid character `{}`", bad)));
        }
        if token.chars().count() > MAX_WORD_LEN {
            return Ok(Some(
                "This word is wicked long! Please choose a shorter one.".to_string(),
            ));
        }

        let host_mention = {
            let mut sessions = d.state.wordsearch.lock().await;
            match sessions.get_mut(&channel) {
                Some(session) => {
                    session.word = Some(word.clone());
                    session.host_mention.clone()
                }
                None => continue,
            }
        };

        reply = Some(format!("Word set to `{}`.", word));
        d.platform
            .send_channel(
                &channel,
                &format!(
                    "{} has started a word search. Enter a word ending with `!` to guess the word!",
                    host_mention
                ),
            )
            .await?;
    }

    Ok(reply)
}

fn common_prefix(guess: &str, word: &str) -> String {
    guess
        .chars()
        .zip(word.chars())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a)
        .collect()
}
