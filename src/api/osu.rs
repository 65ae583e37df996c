//! osu! v1 API client: user stats, beatmap info, top scores.
//!
//! The v1 API serializes every field as a JSON string, so the response
//! structs keep strings and the formatting layer parses what it needs.

use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;

const BASE_URL: &str = "https://osu.ppy.sh/api";

/// Reference to a beatmap extracted from a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BeatmapRef {
    /// `/s/<id>`: a whole mapset.
    Set(String),
    /// `/b/<id>`: a single difficulty.
    Difficulty(String),
}

impl BeatmapRef {
    fn query_param(&self) -> (&'static str, &str) {
        match self {
            BeatmapRef::Set(id) => ("s", id),
            BeatmapRef::Difficulty(id) => ("b", id),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct OsuUser {
    pub user_id: String,
    pub username: String,
    pub country: String,
    pub pp_raw: String,
    pub pp_rank: String,
    pub pp_country_rank: String,
    pub accuracy: String,
    pub count_rank_ss: String,
    pub count_rank_s: String,
    pub count_rank_a: String,
    pub playcount: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Beatmap {
    pub artist: String,
    pub title: String,
    pub creator: String,
    #[serde(default)]
    pub version: String,
    pub approved: String,
    pub total_length: String,
    pub hit_length: String,
    pub bpm: String,
    #[serde(default)]
    pub max_combo: Option<String>,
    pub diff_size: String,
    pub diff_approach: String,
    pub diff_overall: String,
    pub diff_drain: String,
    pub difficultyrating: String,
    pub favourite_count: String,
    pub playcount: String,
    pub passcount: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Score {
    pub username: String,
    pub score: String,
    #[serde(default)]
    pub pp: Option<String>,
    pub maxcombo: String,
    pub countmiss: String,
    pub count300: String,
    pub count100: String,
    pub count50: String,
    /// UTC+8 timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
}

pub struct OsuClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OsuClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Whether an API key was configured. Without one every osu! command
    /// degrades to a disabled notice.
    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }

    /// Look up a user by name or id.
    pub async fn get_user(&self, user: &str) -> Result<Option<OsuUser>> {
        let response = self
            .http
            .get(format!("{}/get_user", self.base_url))
            .query(&[("k", self.key()), ("u", user)])
            .send()
            .await?
            .error_for_status()?;

        let mut users: Vec<OsuUser> = response.json().await?;
        Ok(if users.is_empty() {
            None
        } else {
            Some(users.remove(0))
        })
    }

    /// Resolve a user name to their id.
    pub async fn get_user_id(&self, user: &str) -> Result<Option<String>> {
        Ok(self.get_user(user).await?.map(|u| u.user_id))
    }

    /// Fetch a beatmap (difficulty or mapset).
    pub async fn get_beatmap(&self, map: &BeatmapRef) -> Result<Option<Beatmap>> {
        let (param, id) = map.query_param();
        let response = self
            .http
            .get(format!("{}/get_beatmaps", self.base_url))
            .query(&[("k", self.key()), (param, id)])
            .send()
            .await?
            .error_for_status()?;

        let mut maps: Vec<Beatmap> = response.json().await?;
        Ok(if maps.is_empty() {
            None
        } else {
            Some(maps.remove(0))
        })
    }

    /// Fetch the top score of a ranked difficulty.
    pub async fn get_top_score(&self, map_id: &str) -> Result<Option<Score>> {
        let response = self
            .http
            .get(format!("{}/get_scores", self.base_url))
            .query(&[("k", self.key()), ("b", map_id), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?;

        let mut scores: Vec<Score> = response.json().await?;
        Ok(if scores.is_empty() {
            None
        } else {
            Some(scores.remove(0))
        })
    }
}
