//! Cleverbot conversational replies for when the bot is mentioned.

use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;

const BASE_URL: &str = "https://www.cleverbot.com";

pub struct CleverClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct CleverResponse {
    /// Conversation state token to thread follow-up requests with.
    #[serde(default)]
    cs: String,
    output: String,
}

/// A conversational answer plus the state token for the next turn.
#[derive(Clone, Debug)]
pub struct CleverReply {
    pub output: String,
    pub state: String,
}

impl CleverClient {
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

    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask for a reply, threading the previous conversation state if any.
    pub async fn ask(&self, input: &str, state: Option<&str>) -> Result<CleverReply> {
        let key = self.api_key.as_deref().unwrap_or("");
        let mut query = vec![("key", key), ("input", input)];
        if let Some(cs) = state {
            query.push(("cs", cs));
        }

        let response = self
            .http
            .get(format!("{}/getreply", self.base_url))
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        let body: CleverResponse = response.json().await?;
        Ok(CleverReply {
            output: body.output,
            state: body.cs,
        })
    }
}
