//! Command handlers, one module per command family.
//!
//! Each handler gets the message context and the whitespace-split arguments
//! (first token already case-normalized) and returns the reply text, if any.

pub mod define;
pub mod help;
pub mod lmgtfy;
pub mod mention;
pub mod osu;
pub mod reddit;
pub mod remind;
pub mod roll;
pub mod search;
pub mod story;
pub mod wordsearch;
pub mod yn;

/// Repository link for `!rufus --git`.
pub const GIT_URL: &str = "https://github.com/rufus-bot/rufus";

/// Trigger-to-usage table, rendered by `!rufus`. Read-only after startup.
pub const USAGE: &[(&str, &str)] = &[
    ("!rufus [--git | --reddit]", "display commands"),
    ("!lmgtfy <query ...>", "let me google that for you~"),
    ("!define <word/phrase ...>", "define this!"),
    (
        "!profile [-m | --me] <user> [*tag]",
        "sends link to osu! profile (assign with -m)",
    ),
    ("!stats <user>", "displays various stats for user"),
    ("!roll [range]", "roll dice"),
    (
        "!yn [--set | --global-set [<yes> <no>]]",
        "yes or no (alternatively multiple choice)",
    ),
    ("!story", "toggle story mode"),
    (
        "!wordsearch [-a | --auto] [-s | --stop]",
        "start a wordsearch or stop with --stop",
    ),
    ("!remindme at <time ...>", "get a wake-up call in private"),
    ("!search <query ...>", "first result for a query"),
    ("!image <query ...>", "first image for a query"),
    ("!lucky <query ...>", "follow the first result"),
];
