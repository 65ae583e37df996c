//! Telegram bot client - simple polling version.
//!
//! Channel identifiers are `<chat id>` or `<chat id>/<thread id>` for forum
//! topics; the containing chat doubles as the server identifier.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::payloads::{SendMessageSetters, SetMyShortDescriptionSetters};
use teloxide::prelude::*;
use teloxide::types::{ChatAction, Message, MessageId, ThreadId};

use crate::config::Settings;
use crate::dispatch::{Dispatcher, MessageCtx, Platform};
use crate::error::{Error, Result};
use crate::reminders;
use crate::state::BotState;

/// Run the bot: load state, re-arm reminders, poll for messages.
pub async fn run_bot(settings: Settings) -> Result<()> {
    tracing::info!("Starting Telegram bot...");

    let bot = Bot::new(settings.telegram_token.clone());
    let me = bot.get_me().await?;
    let bot_username = me.username().to_string();
    tracing::info!("Logged in as @{}", bot_username);

    let state = Arc::new(BotState::open(&settings.data_dir)?);
    let platform: Arc<dyn Platform> = Arc::new(TelegramPlatform { bot: bot.clone() });
    let dispatcher = Arc::new(Dispatcher::new(state.clone(), platform.clone(), &settings));

    // Re-apply the persisted mood, if any.
    let mood = state.moods.lock().await.get("current").cloned();
    if let Some(mood) = mood {
        if let Err(e) = platform.set_profile_note(Some(&mood)).await {
            tracing::warn!("Failed to restore mood '{}': {}", mood, e);
        }
    }

    let armed = reminders::restore(state.clone(), platform.clone()).await?;
    tracing::info!("Re-armed {} pending reminders", armed);

    teloxide::repl(bot, move |_bot: Bot, msg: Message| {
        let dispatcher = dispatcher.clone();
        let bot_username = bot_username.clone();
        async move {
            if let Some((ctx, text)) = message_ctx(&msg, &bot_username) {
                // One worker per inbound message; a slow handler only delays
                // its own reply.
                tokio::spawn(handle(dispatcher, ctx, text));
            }
            Ok(())
        }
    })
    .await;

    Ok(())
}

/// Run the dispatcher and send back the reply, prefixed with a mention of
/// the sender.
async fn handle(dispatcher: Arc<Dispatcher>, ctx: MessageCtx, text: String) {
    match dispatcher.dispatch(&ctx, &text).await {
        Ok(Some(reply)) => {
            tracing::info!("{}> {}", ctx.author_name, text);
            let full = format!("{} {}", ctx.author_mention, reply);
            if let Err(e) = dispatcher
                .platform
                .send_channel(&ctx.channel_id, &full)
                .await
            {
                tracing::error!("Failed to send reply to {}: {}", ctx.channel_id, e);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::error!("Command failed: {} ({})", e, text),
    }
}

/// Build the platform-agnostic message context. `None` for messages the bot
/// ignores outright (no text, no sender, other bots).
fn message_ctx(msg: &Message, bot_username: &str) -> Option<(MessageCtx, String)> {
    let text = msg.text()?.trim().to_string();
    if text.is_empty() {
        return None;
    }
    let from = msg.from.as_ref()?;
    if from.is_bot {
        return None;
    }

    let chat_id = msg.chat.id.0.to_string();
    let channel_id = match msg.thread_id {
        Some(ThreadId(MessageId(thread))) => format!("{}/{}", chat_id, thread),
        None => chat_id.clone(),
    };

    let mention = format!("@{}", bot_username);
    let bot_mentioned = text
        .split_whitespace()
        .any(|token| token.eq_ignore_ascii_case(&mention));

    let ctx = MessageCtx {
        channel_id,
        server_id: chat_id,
        author_id: from.id.0.to_string(),
        author_name: from.full_name(),
        author_mention: from.mention().unwrap_or_else(|| from.full_name()),
        bot_mentioned,
        mention_everyone: false,
        channel_mentions: Vec::new(),
        private: msg.chat.is_private(),
    };
    Some((ctx, text))
}

fn parse_channel_id(channel_id: &str) -> Result<(ChatId, Option<ThreadId>)> {
    let (chat, thread) = match channel_id.split_once('/') {
        Some((chat, thread)) => (chat, Some(thread)),
        None => (channel_id, None),
    };

    let chat: i64 = chat
        .parse()
        .map_err(|_| Error::Telegram(format!("Bad channel id: {}", channel_id)))?;
    let thread = match thread {
        Some(thread) => Some(ThreadId(MessageId(thread.parse().map_err(|_| {
            Error::Telegram(format!("Bad thread id: {}", channel_id))
        })?))),
        None => None,
    };
    Ok((ChatId(chat), thread))
}

struct TelegramPlatform {
    bot: Bot,
}

#[async_trait]
impl Platform for TelegramPlatform {
    async fn send_channel(&self, channel_id: &str, text: &str) -> Result<()> {
        let (chat, thread) = parse_channel_id(channel_id)?;
        let mut request = self.bot.send_message(chat, text);
        if let Some(thread) = thread {
            request = request.message_thread_id(thread);
        }
        request.await?;
        Ok(())
    }

    async fn send_user(&self, user_id: &str, text: &str) -> Result<()> {
        // A private chat shares its id with the user.
        let id: i64 = user_id
            .parse()
            .map_err(|_| Error::Telegram(format!("Bad user id: {}", user_id)))?;
        self.bot.send_message(ChatId(id), text).await?;
        Ok(())
    }

    async fn is_admin(&self, ctx: &MessageCtx) -> Result<bool> {
        if ctx.private {
            return Ok(true);
        }
        let (chat, _) = parse_channel_id(&ctx.server_id)?;
        let admins = self.bot.get_chat_administrators(chat).await?;
        Ok(admins
            .iter()
            .any(|member| member.user.id.0.to_string() == ctx.author_id))
    }

    async fn set_profile_note(&self, note: Option<&str>) -> Result<()> {
        self.bot
            .set_my_short_description()
            .short_description(note.unwrap_or_default())
            .await?;
        Ok(())
    }

    async fn typing(&self, channel_id: &str) -> Result<()> {
        let (chat, _) = parse_channel_id(channel_id)?;
        self.bot.send_chat_action(chat, ChatAction::Typing).await?;
        Ok(())
    }
}
