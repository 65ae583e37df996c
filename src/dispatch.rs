//! The command dispatcher.
//!
//! Given raw message text and sender/channel identity, produce either no
//! reply or a single reply string. Matching is strictly sequential: the first
//! matching branch wins and all later branches are skipped, including the
//! content sniffers (beatmap links, subreddit references, bot mentions),
//! which only run when no literal command matched.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{CleverClient, OsuClient, SearchClient, UrbanClient};
use crate::commands;
use crate::config::Settings;
use crate::error::Result;
use crate::state::BotState;

/// Fixed reply for commands invoked with missing or malformed arguments.
pub const PLACEHOLDER: &str = "👎";

/// Identity and placement of an inbound message.
///
/// A *channel* is a chat (or forum topic within one); the *server* is the
/// containing chat. In a plain group the two coincide.
#[derive(Clone, Debug, Default)]
pub struct MessageCtx {
    pub channel_id: String,
    pub server_id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_mention: String,
    pub bot_mentioned: bool,
    pub mention_everyone: bool,
    /// Channels referenced in the message, as `(channel id, mention text)`.
    pub channel_mentions: Vec<(String, String)>,
    pub private: bool,
}

/// Outbound side of the chat platform.
///
/// The dispatcher goes through this for everything that is not the single
/// returned reply: side announcements, private prompts, reminder wake-ups,
/// permission checks. Implemented by the Telegram client and by test doubles.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn send_channel(&self, channel_id: &str, text: &str) -> Result<()>;
    async fn send_user(&self, user_id: &str, text: &str) -> Result<()>;
    async fn is_admin(&self, ctx: &MessageCtx) -> Result<bool>;
    /// Publish or clear the bot's mood note.
    async fn set_profile_note(&self, note: Option<&str>) -> Result<()>;
    async fn typing(&self, _channel_id: &str) -> Result<()> {
        Ok(())
    }
}

pub struct Dispatcher {
    pub state: Arc<BotState>,
    pub platform: Arc<dyn Platform>,
    pub osu: OsuClient,
    pub urban: UrbanClient,
    pub clever: CleverClient,
    pub search: SearchClient,
}

impl Dispatcher {
    pub fn new(state: Arc<BotState>, platform: Arc<dyn Platform>, settings: &Settings) -> Self {
        Self {
            state,
            platform,
            osu: OsuClient::new(settings.osu_api_key.clone()),
            urban: UrbanClient::new(),
            clever: CleverClient::new(settings.clever_api_key.clone()),
            search: SearchClient::new(),
        }
    }

    /// Route one message. Returns the reply to send back to the channel, if
    /// any.
    pub async fn dispatch(&self, ctx: &MessageCtx, text: &str) -> Result<Option<String>> {
        if ctx.private {
            return self.dispatch_pm(ctx, text).await;
        }

        let mut args: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if args.is_empty() {
            return Ok(None);
        }
        // Story entries keep their case.
        if !args[0].starts_with('+') {
            let lowered = args[0].to_lowercase();
            args[0] = lowered;
        }

        match args[0].as_str() {
            "!lmgtfy" => Ok(Some(commands::lmgtfy::run(&args))),
            "!define" => commands::define::run(&self.urban, &args).await,
            "!profile" => commands::osu::profile(&self.state, &self.osu, ctx, &args).await,
            "!stats" => commands::osu::stats(&self.state, &self.osu, ctx, &args).await,
            "!roll" => Ok(Some(commands::roll::run(&args))),
            "!yn" => commands::yn::run(&self.state, ctx, &args).await,
            "!story" => Ok(Some(commands::story::toggle(&self.state, ctx).await)),
            "!wordsearch" => commands::wordsearch::command(self, ctx, &args).await,
            "!remindme" => commands::remind::run(self, ctx, &args).await,
            "!help" => Ok(Some("`!rufus`".to_string())),
            "!rufus" => commands::help::run(self, ctx, &args).await,
            "?trigger" => Ok(Some("Trigger is !".to_string())),
            "!search" => commands::search::search(&self.search, &args).await,
            "!image" => commands::search::image(&self.search, &args).await,
            "!lucky" => commands::search::lucky(&self.search, &args).await,
            _ => self.fall_through(ctx, &args).await,
        }
    }

    /// Non-literal branches, in the original evaluation order: story entries,
    /// word-search guesses, then the content sniffers.
    async fn fall_through(&self, ctx: &MessageCtx, args: &[String]) -> Result<Option<String>> {
        if args[0].starts_with('+') && commands::story::is_recording(&self.state, ctx).await {
            commands::story::append(&self.state, ctx, args).await;
            return Ok(None);
        }

        if args[0].ends_with('!') {
            let active = self
                .state
                .wordsearch
                .lock()
                .await
                .contains_key(&ctx.channel_id);
            if active {
                return commands::wordsearch::guess(&self.state, ctx, &args[0]).await;
            }
        }

        let maps = commands::osu::maps_in(args);
        if !maps.is_empty() {
            let info = commands::osu::map_info(&self.osu, &maps).await?;
            return Ok(if info.is_empty() { None } else { Some(info) });
        }

        if commands::reddit::subreddit_in(args).is_some() {
            return commands::reddit::link(&self.state, ctx, args).await;
        }

        if ctx.bot_mentioned && !ctx.mention_everyone {
            return commands::mention::run(self, ctx, args).await;
        }

        Ok(None)
    }

    /// Private messages only carry word-search secrets.
    async fn dispatch_pm(&self, ctx: &MessageCtx, text: &str) -> Result<Option<String>> {
        let args: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if args.is_empty() {
            return Ok(None);
        }
        commands::wordsearch::supply_word(self, ctx, &args).await
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use std::path::Path;
    use tokio::sync::Mutex;

    /// Records outbound traffic instead of talking to a chat platform.
    pub(crate) struct FakePlatform {
        pub channel_messages: Mutex<Vec<(String, String)>>,
        pub user_messages: Mutex<Vec<(String, String)>>,
        pub profile_note: Mutex<Option<String>>,
        pub admin: bool,
    }

    impl FakePlatform {
        pub(crate) fn new(admin: bool) -> Self {
            Self {
                channel_messages: Mutex::new(Vec::new()),
                user_messages: Mutex::new(Vec::new()),
                profile_note: Mutex::new(None),
                admin,
            }
        }
    }

    #[async_trait]
    impl Platform for FakePlatform {
        async fn send_channel(&self, channel_id: &str, text: &str) -> Result<()> {
            self.channel_messages
                .lock()
                .await
                .push((channel_id.to_string(), text.to_string()));
            Ok(())
        }

        async fn send_user(&self, user_id: &str, text: &str) -> Result<()> {
            self.user_messages
                .lock()
                .await
                .push((user_id.to_string(), text.to_string()));
            Ok(())
        }

        async fn is_admin(&self, _ctx: &MessageCtx) -> Result<bool> {
            Ok(self.admin)
        }

        async fn set_profile_note(&self, note: Option<&str>) -> Result<()> {
            *self.profile_note.lock().await = note.map(str::to_string);
            Ok(())
        }
    }

    pub(crate) fn ctx(channel: &str, server: &str, author: &str) -> MessageCtx {
        MessageCtx {
            channel_id: channel.to_string(),
            server_id: server.to_string(),
            author_id: author.to_string(),
            author_name: format!("user-{}", author),
            author_mention: format!("@user-{}", author),
            ..MessageCtx::default()
        }
    }

    pub(crate) fn dispatcher(data_dir: &Path, admin: bool) -> (Dispatcher, Arc<FakePlatform>) {
        let platform = Arc::new(FakePlatform::new(admin));
        let state = Arc::new(BotState::open(data_dir).unwrap());
        let dispatcher = Dispatcher {
            state,
            platform: platform.clone(),
            osu: OsuClient::new(None),
            urban: UrbanClient::new(),
            clever: CleverClient::new(None),
            search: SearchClient::new(),
        };
        (dispatcher, platform)
    }
}
