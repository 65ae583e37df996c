//! Shared bot state: persistent store domains plus volatile session maps.
//!
//! Everything a per-message worker can touch lives here behind a lock, so
//! concurrent messages on the same channel cannot race a read-modify-write.

use std::collections::HashMap;
use std::path::Path;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::store::{KvStore, DEFAULT_KEY};

/// The secret-word alphabet used when a channel has no override.
pub const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyz";

/// A channel's story transcript.
#[derive(Debug, Default, Clone)]
pub struct Story {
    pub recording: bool,
    pub text: String,
}

/// A channel's word-search session.
///
/// `word` is `None` while the host has yet to supply the secret. The session
/// is removed outright on success or cancellation, so its mere presence means
/// the channel is not idle.
#[derive(Debug, Clone)]
pub struct WordSearch {
    pub host_id: String,
    pub host_mention: String,
    pub word: Option<String>,
    pub hint: String,
    pub tries: u32,
}

impl WordSearch {
    pub fn new(host_id: &str, host_mention: &str) -> Self {
        Self {
            host_id: host_id.to_string(),
            host_mention: host_mention.to_string(),
            word: None,
            hint: String::new(),
            tries: 0,
        }
    }
}

/// All mutable bot state, shared across per-message workers.
pub struct BotState {
    /// Per-channel/per-server yes/no reply lists.
    pub yn: Mutex<KvStore<Vec<String>>>,
    /// Chat user id -> osu! user id/name.
    pub osu_users: Mutex<KvStore<String>>,
    /// Per-server subreddit-expansion toggle.
    pub reddit: Mutex<KvStore<bool>>,
    /// Per-channel secret-word alphabet.
    pub wordsearch_chars: Mutex<KvStore<String>>,
    /// Mood bookkeeping; the `current` key names the active mood.
    pub moods: Mutex<KvStore<String>>,
    /// Chat user id -> RFC 3339 timestamp of a pending reminder.
    pub reminders: Mutex<KvStore<String>>,

    /// Per-channel story buffers.
    pub stories: Mutex<HashMap<String, Story>>,
    /// Per-channel word-search sessions.
    pub wordsearch: Mutex<HashMap<String, WordSearch>>,
    /// Per-channel Cleverbot conversation tokens.
    pub clever_sessions: Mutex<HashMap<String, String>>,
    /// Word list for `!wordsearch --auto`, downloaded on first use.
    pub wordlist: Mutex<Vec<String>>,
}

impl BotState {
    /// Load every store domain from `data_dir`, seeding defaults on first run.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;

        let mut yn_defaults = HashMap::new();
        yn_defaults.insert(
            DEFAULT_KEY.to_string(),
            vec!["yes".to_string(), "no".to_string()],
        );

        let mut reddit_defaults = HashMap::new();
        reddit_defaults.insert(DEFAULT_KEY.to_string(), false);

        let mut charset_defaults = HashMap::new();
        charset_defaults.insert(DEFAULT_KEY.to_string(), DEFAULT_CHARSET.to_string());

        Ok(Self {
            yn: Mutex::new(KvStore::open(data_dir, "yn", yn_defaults)?),
            osu_users: Mutex::new(KvStore::open(data_dir, "osu-users", HashMap::new())?),
            reddit: Mutex::new(KvStore::open(data_dir, "reddit", reddit_defaults)?),
            wordsearch_chars: Mutex::new(KvStore::open(
                data_dir,
                "wordsearch-chars",
                charset_defaults,
            )?),
            moods: Mutex::new(KvStore::open(data_dir, "moods", HashMap::new())?),
            reminders: Mutex::new(KvStore::open(data_dir, "reminders", HashMap::new())?),
            stories: Mutex::new(HashMap::new()),
            wordsearch: Mutex::new(HashMap::new()),
            clever_sessions: Mutex::new(HashMap::new()),
            wordlist: Mutex::new(Vec::new()),
        })
    }
}
