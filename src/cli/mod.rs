//! CLI commands for rufus using clap.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::logging;
use crate::telegram;

/// rufus - chat companion bot.
#[derive(Parser)]
#[command(name = "rufus")]
#[command(version)]
#[command(about = "rufus - chat companion bot", long_about = None)]
pub struct Commands {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the bot
    Run {
        /// Telegram bot token
        #[arg(long, env = "RUFUS_TELEGRAM_TOKEN")]
        token: String,

        /// osu! API key; osu! commands reply a disabled notice without one.
        /// Prompted for on stdin when omitted.
        #[arg(long, env = "RUFUS_OSU_KEY")]
        osu_key: Option<String>,

        /// Cleverbot API key; mention replies stay silent without one
        #[arg(long, env = "RUFUS_CLEVER_KEY")]
        clever_key: Option<String>,

        /// Data directory (default ~/.rufus)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Run {
                token,
                osu_key,
                clever_key,
                data_dir,
            } => {
                let osu_key = match osu_key {
                    Some(key) => Some(key),
                    None => prompt_osu_key()?,
                };

                let settings = Settings::new(token, osu_key, clever_key, data_dir)?;
                std::fs::create_dir_all(&settings.data_dir)?;

                let _guard = logging::init(&settings.data_dir)?;
                tracing::info!(
                    "Starting rufus (osu!: {}, cleverbot: {})",
                    if settings.osu_api_key.is_some() { "on" } else { "off" },
                    if settings.clever_api_key.is_some() { "on" } else { "off" },
                );

                telegram::run_bot(settings).await?;
                Ok(())
            }
        }
    }
}

fn prompt_osu_key() -> Result<Option<String>> {
    print!("Enter a valid osu! API key for osu! functions (enter nothing to disable): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let line = line.trim();

    Ok(if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    })
}
