//! `!search`, `!image`, `!lucky` - instant-answer lookups.

use crate::api::SearchClient;
use crate::dispatch::PLACEHOLDER;
use crate::error::Result;

const NO_RESULTS: &str = "No results.";

pub async fn search(client: &SearchClient, args: &[String]) -> Result<Option<String>> {
    let query = match query_of(args) {
        Some(query) => query,
        None => return Ok(Some(PLACEHOLDER.to_string())),
    };
    Ok(Some(
        client
            .search(&query)
            .await?
            .unwrap_or_else(|| NO_RESULTS.to_string()),
    ))
}

pub async fn image(client: &SearchClient, args: &[String]) -> Result<Option<String>> {
    let query = match query_of(args) {
        Some(query) => query,
        None => return Ok(Some(PLACEHOLDER.to_string())),
    };
    Ok(Some(
        client
            .image(&query)
            .await?
            .unwrap_or_else(|| NO_RESULTS.to_string()),
    ))
}

pub async fn lucky(client: &SearchClient, args: &[String]) -> Result<Option<String>> {
    let query = match query_of(args) {
        Some(query) => query,
        None => return Ok(Some(PLACEHOLDER.to_string())),
    };
    Ok(Some(
        client
            .lucky(&query)
            .await?
            .unwrap_or_else(|| NO_RESULTS.to_string()),
    ))
}

fn query_of(args: &[String]) -> Option<String> {
    if args.len() > 1 {
        Some(args[1..].join(" "))
    } else {
        None
    }
}
