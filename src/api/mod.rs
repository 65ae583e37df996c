//! External API adapters.
//!
//! One client per third-party service. Each issues one or more HTTP requests
//! and hands typed JSON back to the command handlers, which own the reply
//! templates.

pub mod clever;
pub mod osu;
pub mod search;
pub mod urban;
pub mod wordlist;

pub use clever::CleverClient;
pub use osu::OsuClient;
pub use search::SearchClient;
pub use urban::UrbanClient;
