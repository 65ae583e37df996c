//! Urban Dictionary lookups for `!define`.

use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;

const BASE_URL: &str = "https://api.urbandictionary.com";

pub struct UrbanClient {
    http: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct DefineResponse {
    #[serde(default)]
    list: Vec<Definition>,
}

/// A single crowd-sourced definition.
#[derive(Deserialize, Clone, Debug)]
pub struct Definition {
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub example: String,
}

impl UrbanClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Look up a term. Returns the first definition, if any.
    pub async fn define(&self, term: &str) -> Result<Option<Definition>> {
        let response = self
            .http
            .get(format!("{}/v0/define", self.base_url))
            .query(&[("term", term)])
            .send()
            .await?
            .error_for_status()?;

        let body: DefineResponse = response.json().await?;
        Ok(body.list.into_iter().next())
    }
}

impl Default for UrbanClient {
    fn default() -> Self {
        Self::new()
    }
}
