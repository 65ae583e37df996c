//! `!define` - Urban Dictionary lookups.

use crate::api::UrbanClient;
use crate::dispatch::PLACEHOLDER;
use crate::error::Result;

pub async fn run(urban: &UrbanClient, args: &[String]) -> Result<Option<String>> {
    if args.len() < 2 {
        return Ok(Some(PLACEHOLDER.to_string()));
    }

    let term = args[1..].join(" ");
    let reply = match urban.define(&term).await? {
        Some(def) => {
            let example = if def.example.is_empty() {
                String::new()
            } else {
                format!("```{}```", def.example)
            };
            format!("**{}**:\n{}\n{}", def.word, def.definition, example)
        }
        None => "No such word is defined.".to_string(),
    };

    Ok(Some(reply))
}
