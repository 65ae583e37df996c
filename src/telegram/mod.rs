//! Telegram integration.

pub mod client;

pub use client::run_bot;
