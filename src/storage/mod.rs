//! Persistence layer for the seen-article set.
//!
//! The set is stored as a JSON array of identifiers, oldest first.
//! It is read once at startup and overwritten wholesale at the end of
//! every cycle, truncated to the most recent `max_entries` identifiers.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::types::NewsBotError;

/// Default store file path.
pub const DEFAULT_SEEN_FILE: &str = "sent_articles.json";

/// Default cap on persisted identifiers.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

// ---------------------------------------------------------------------------
// SeenSet
// ---------------------------------------------------------------------------

/// Identifiers already notified, in insertion order.
///
/// Membership is exact string equality. The order sequence and the
/// index always hold the same identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    order: VecDeque<String>,
    index: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Insert an identifier. Returns `false` if it was already present,
    /// in which case its position is left unchanged.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.index.contains(&id) {
            return false;
        }
        self.index.insert(id.clone());
        self.order.push_back(id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identifiers oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Drop the oldest identifiers until at most `cap` remain.
    pub fn truncate_to_recent(&mut self, cap: usize) {
        while self.order.len() > cap {
            if let Some(old) = self.order.pop_front() {
                self.index.remove(&old);
            }
        }
    }

    /// The most recent `cap` identifiers, oldest-first.
    fn recent(&self, cap: usize) -> Vec<&str> {
        let skip = self.order.len().saturating_sub(cap);
        self.order.iter().skip(skip).map(String::as_str).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SeenSet::new();
        for id in iter {
            set.add(id);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// SeenStore
// ---------------------------------------------------------------------------

/// File-backed durable copy of a [`SeenSet`].
#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
    max_entries: usize,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Read the durable set.
    ///
    /// Never fails: a missing file is a fresh start, and an unreadable
    /// or corrupt file is logged and treated as empty.
    pub fn load(&self) -> SeenSet {
        if !self.path.exists() {
            info!(path = %self.path.display(), "No seen-article file found, starting fresh");
            return SeenSet::new();
        }

        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read seen-article file, starting empty");
                return SeenSet::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&json) {
            Ok(ids) => {
                let set: SeenSet = ids.into_iter().collect();
                info!(path = %self.path.display(), count = set.len(), "Loaded previously sent articles");
                set
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Seen-article file is corrupt, starting empty");
                SeenSet::new()
            }
        }
    }

    /// Overwrite the durable copy with the most recent `max_entries`
    /// identifiers of `set`. The in-memory set is not modified.
    pub fn persist(&self, set: &SeenSet) -> Result<(), NewsBotError> {
        let recent = set.recent(self.max_entries);
        let json = serde_json::to_string(&recent)
            .map_err(|e| NewsBotError::Storage(format!("Failed to serialise seen set: {e}")))?;

        std::fs::write(&self.path, json).map_err(|e| {
            NewsBotError::Storage(format!("Failed to write {}: {e}", self.path.display()))
        })?;

        debug!(path = %self.path.display(), count = recent.len(), "Seen set saved");
        Ok(())
    }

    /// Delete the store file (for testing or reset).
    pub fn delete(&self) -> Result<(), NewsBotError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| {
                NewsBotError::Storage(format!("Failed to delete {}: {e}", self.path.display()))
            })?;
        }
        Ok(())
    }
}

impl Default for SeenStore {
    fn default() -> Self {
        Self::new(DEFAULT_SEEN_FILE, DEFAULT_MAX_ENTRIES)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
