//! `!lmgtfy` - format a let-me-google-that-for-you link.

use crate::dispatch::PLACEHOLDER;

pub fn run(args: &[String]) -> String {
    if args.len() > 1 {
        format!("http://lmgtfy.com/?q={}", args[1..].join("+"))
    } else {
        PLACEHOLDER.to_string()
    }
}
