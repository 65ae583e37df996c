//! DuckDuckGo instant-answer lookups: `!search`, `!image`, `!lucky`.

use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;

const BASE_URL: &str = "https://api.duckduckgo.com";

pub struct SearchClient {
    http: Client,
    base_url: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct InstantAnswer {
    #[serde(rename = "AbstractText")]
    abstract_text: String,
    #[serde(rename = "AbstractURL")]
    abstract_url: String,
    #[serde(rename = "Image")]
    image: String,
    #[serde(rename = "Redirect")]
    redirect: String,
    #[serde(rename = "RelatedTopics")]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RelatedTopic {
    #[serde(rename = "Text")]
    text: String,
    #[serde(rename = "FirstURL")]
    first_url: String,
}

impl SearchClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn instant(&self, query: &str) -> Result<InstantAnswer> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_redirect", "1"),
                ("no_html", "1"),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// First text result for a query: the abstract, else the first related
    /// topic.
    pub async fn search(&self, query: &str) -> Result<Option<String>> {
        let answer = self.instant(query).await?;

        if !answer.abstract_url.is_empty() {
            let text = answer.abstract_text.trim();
            return Ok(Some(if text.is_empty() {
                answer.abstract_url
            } else {
                format!("{} {}", text, answer.abstract_url)
            }));
        }

        Ok(answer
            .related_topics
            .into_iter()
            .find(|t| !t.first_url.is_empty())
            .map(|t| {
                if t.text.is_empty() {
                    t.first_url
                } else {
                    format!("{} {}", t.text, t.first_url)
                }
            }))
    }

    /// First image URL for a query.
    pub async fn image(&self, query: &str) -> Result<Option<String>> {
        let answer = self.instant(query).await?;

        if answer.image.is_empty() {
            return Ok(None);
        }
        Ok(Some(if answer.image.starts_with('/') {
            format!("https://duckduckgo.com{}", answer.image)
        } else {
            answer.image
        }))
    }

    /// "I'm feeling lucky": resolve the `\query` redirect to its target URL.
    pub async fn lucky(&self, query: &str) -> Result<Option<String>> {
        let answer = self.instant(&format!("\\{}", query)).await?;

        Ok(if answer.redirect.is_empty() {
            None
        } else {
            Some(answer.redirect)
        })
    }
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_prefers_abstract() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"AbstractText":"Rust is a language","AbstractURL":"https://rust-lang.org",
                    "Image":"","Redirect":"","RelatedTopics":[]}"#,
            )
            .create_async()
            .await;

        let client = SearchClient::with_base_url(server.url());
        let result = client.search("rust").await.unwrap().unwrap();
        assert_eq!(result, "Rust is a language https://rust-lang.org");
    }

    #[tokio::test]
    async fn test_search_falls_back_to_related() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"AbstractText":"","AbstractURL":"","Image":"","Redirect":"",
                    "RelatedTopics":[{"Text":"topic","FirstURL":"https://example.com"}]}"#,
            )
            .create_async()
            .await;

        let client = SearchClient::with_base_url(server.url());
        let result = client.search("anything").await.unwrap().unwrap();
        assert_eq!(result, "topic https://example.com");
    }

    #[tokio::test]
    async fn test_image_relative_path() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"AbstractText":"","AbstractURL":"","Image":"/i/cat.jpg","Redirect":"",
                    "RelatedTopics":[]}"#,
            )
            .create_async()
            .await;

        let client = SearchClient::with_base_url(server.url());
        let result = client.image("cat").await.unwrap().unwrap();
        assert_eq!(result, "https://duckduckgo.com/i/cat.jpg");
    }

    #[tokio::test]
    async fn test_lucky_empty_redirect_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"AbstractText":"","AbstractURL":"","Image":"","Redirect":"",
                    "RelatedTopics":[]}"#,
            )
            .create_async()
            .await;

        let client = SearchClient::with_base_url(server.url());
        assert!(client.lucky("whatever").await.unwrap().is_none());
    }
}
