//! File-backed key/value store
//!
//! The on-disk equivalent of browser local storage: one JSON object of
//! string keys to string values, at `{data_dir}/local-storage.json`.
//! Structured values are stored as JSON text under their key.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Well-known keys
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";

    pub fn quiz_state(quiz_id: &str) -> String {
        format!("quiz:{}:state", quiz_id)
    }

    pub fn quiz_result(quiz_id: &str) -> String {
        format!("quiz:{}:result", quiz_id)
    }

    pub fn review_states(deck_id: &str) -> String {
        format!("review:{}:states", deck_id)
    }
}

const FILE_NAME: &str = "local-storage.json";

#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Store inside a data directory
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling file and rename so a crash never leaves half a file
        let tmp = self.tmp_path();
        write_private(&tmp, &serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    /// Remove a key; returns whether it was present
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.load()?;
        let removed = entries.remove(key).is_some();
        if removed {
            self.save(&entries)?;
        }
        Ok(removed)
    }

    /// Remove several keys with a single write
    pub fn remove_all(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self.load()?;
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() != before {
            self.save(&entries)?;
        }
        Ok(())
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .load()?
            .into_keys()
            .filter(|k| k.starts_with(prefix))
            .collect())
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.set(key, &serde_json::to_string(value)?)
    }
}

/// Tokens live in this file, so on Unix it is created owner-only
fn write_private(path: &Path, content: &str) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // mode() only applies on creation; a leftover tmp file keeps its own
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
