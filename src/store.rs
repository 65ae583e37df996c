//! Disk-backed key-value stores, one per configuration domain.
//!
//! Each domain is a flat JSON file under the data directory. The whole map
//! is loaded at startup and rewritten wholesale on every mutation. There are
//! no transactions and no concurrent-writer protection; callers serialize
//! access through [`crate::state::BotState`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Key under which every domain keeps its process-wide fallback value.
pub const DEFAULT_KEY: &str = "default";

/// A named persistent mapping from string keys to one value shape.
#[derive(Debug)]
pub struct KvStore<V> {
    path: PathBuf,
    entries: HashMap<String, V>,
}

impl<V> KvStore<V>
where
    V: Serialize + DeserializeOwned + Clone,
{
    /// Open the store at `dir/<name>.json`.
    ///
    /// On first use (or if the file has gone) the defaults are written out,
    /// so a fresh install starts from a well-formed file.
    pub fn open(dir: &Path, name: &str, defaults: HashMap<String, V>) -> Result<Self> {
        let path = dir.join(format!("{}.json", name));

        let mut store = Self {
            path,
            entries: defaults,
        };

        if store.path.exists() {
            let content = std::fs::read_to_string(&store.path)?;
            store.entries = serde_json::from_str(&content)?;
        } else {
            store.save()?;
        }

        Ok(store)
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Get a value, falling back to the `default` entry.
    pub fn get_or_default(&self, key: &str) -> Option<&V> {
        self.entries.get(key).or_else(|| self.entries.get(DEFAULT_KEY))
    }

    /// Set a value and rewrite the file.
    pub fn set(&mut self, key: &str, value: V) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.save()
    }

    /// Remove a key and rewrite the file. Returns the removed value.
    pub fn remove(&mut self, key: &str) -> Result<Option<V>> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    /// All entries, for startup sweeps.
    pub fn entries(&self) -> &HashMap<String, V> {
        &self.entries
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
