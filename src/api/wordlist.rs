//! English word-list download used to seed `!wordsearch --auto`.

use crate::error::Result;

const WORDLIST_URL: &str = "http://www.mieliestronk.com/corncob_lowercase.txt";

/// Download the word list, one word per line.
pub async fn fetch() -> Result<Vec<String>> {
    fetch_from(WORDLIST_URL).await
}

pub async fn fetch_from(url: &str) -> Result<Vec<String>> {
    let body = reqwest::get(url).await?.error_for_status()?.text().await?;
    Ok(parse(&body))
}

fn parse(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_blanks() {
        let words = parse("apple\r\nbanana\r\n\r\n cherry \n");
        assert_eq!(words, vec!["apple", "banana", "cherry"]);
    }

    #[tokio::test]
    async fn test_fetch_from_server() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/corncob_lowercase.txt")
            .with_body("aardvark\r\nabacus\r\n")
            .create_async()
            .await;

        let words = fetch_from(&format!("{}/corncob_lowercase.txt", server.url()))
            .await
            .unwrap();
        assert_eq!(words, vec!["aardvark", "abacus"]);
    }
}
