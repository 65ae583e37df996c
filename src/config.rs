//! Runtime configuration for rufus.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Get the rufus home directory (~/.rufus).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".rufus"))
}

/// Settings assembled from the command line and environment at startup.
///
/// Nothing here is persisted; the per-domain stores live in [`crate::store`].
#[derive(Clone, Debug)]
pub struct Settings {
    /// Telegram bot token.
    pub telegram_token: String,
    /// osu! v1 API key. All osu! commands reply a disabled notice without it.
    pub osu_api_key: Option<String>,
    /// Cleverbot API key. The mention responder stays silent without it.
    pub clever_api_key: Option<String>,
    /// Directory holding the store files and logs.
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn new(
        telegram_token: String,
        osu_api_key: Option<String>,
        clever_api_key: Option<String>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => get_home_dir()?,
        };

        Ok(Self {
            telegram_token,
            osu_api_key: osu_api_key.filter(|k| !k.trim().is_empty()),
            clever_api_key: clever_api_key.filter(|k| !k.trim().is_empty()),
            data_dir,
        })
    }
}
