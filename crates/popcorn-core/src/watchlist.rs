use popcorn_models::{WatchedEntry, WatchedSummary};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;
use crate::error::CoreError;
use crate::store::Persisted;

/// Where a committed rating goes.
pub trait WatchedSink {
    fn contains(&self, id: &str) -> bool;
    fn rating_for(&self, id: &str) -> Option<u8>;
    fn add(&mut self, entry: WatchedEntry) -> Result<(), CoreError>;
}

/// The user's watched movies, in insertion order, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<WatchedEntry>", into = "Vec<WatchedEntry>")]
pub struct WatchList {
    entries: Vec<WatchedEntry>,
}

impl From<Vec<WatchedEntry>> for WatchList {
    /// Keeps the first entry for each id
    fn from(entries: Vec<WatchedEntry>) -> Self {
        let mut seen = HashSet::new();
        let before = entries.len();
        let entries: Vec<WatchedEntry> = entries
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        if entries.len() != before {
            warn!("Dropped {} duplicate watched entries", before - entries.len());
        }
        Self { entries }
    }
}

impl From<WatchList> for Vec<WatchedEntry> {
    fn from(list: WatchList) -> Self {
        list.entries
    }
}

impl WatchList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn add(&mut self, entry: WatchedEntry) -> Result<(), CoreError> {
        if self.contains(&entry.id) {
            return Err(CoreError::Duplicate(entry.id));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Remove by id, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<WatchedEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(&self.entries)
    }
}

impl WatchedSink for WatchList {
    fn contains(&self, id: &str) -> bool {
        WatchList::contains(self, id)
    }

    fn rating_for(&self, id: &str) -> Option<u8> {
        self.get(id).map(|e| e.user_rating)
    }

    fn add(&mut self, entry: WatchedEntry) -> Result<(), CoreError> {
        WatchList::add(self, entry)
    }
}

impl WatchedSink for Persisted<WatchList> {
    fn contains(&self, id: &str) -> bool {
        self.get().contains(id)
    }

    fn rating_for(&self, id: &str) -> Option<u8> {
        self.get().rating_for(id)
    }

    fn add(&mut self, entry: WatchedEntry) -> Result<(), CoreError> {
        self.update(|list| list.add(entry))
    }
}
