//! File-backed history of past sends.
//!
//! Entries are stored as a JSON array, newest first, and capped at a fixed
//! number of entries. A missing or unreadable file reads as an empty history.

use crate::config::Config;
use crate::error::{ConfigError, HistoryError};
use crate::types::HistoryEntry;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default maximum number of entries kept.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Persistent, bounded history log.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    max_entries: usize,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl HistoryStore {
    /// Open a store at `path` keeping at most `max_entries` entries.
    pub fn open(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries: max_entries.max(1),
            lock: Mutex::new(()),
        }
    }

    /// Open the store configured in `config`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::open(config.history_file()?, config.history.max_entries))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maximum number of entries kept.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// All entries, newest first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let _guard = self.lock.lock();
        self.read_entries()
    }

    /// Prepend an entry, dropping the oldest ones past the cap.
    pub fn add(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries();
        entries.insert(0, entry);
        entries.truncate(self.max_entries);
        self.write_entries(&entries)
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.lock.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HistoryError::io(&self.path, e)),
        }
    }

    fn read_entries(&self) -> Vec<HistoryEntry> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Could not read history at {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("History at {:?} is corrupt, starting fresh: {}", self.path, e);
                Vec::new()
            }
        }
    }

    fn write_entries(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| HistoryError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(|e| HistoryError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| HistoryError::io(&self.path, e))?;

        debug!("Wrote {} history entries", entries.len());
        Ok(())
    }
}
