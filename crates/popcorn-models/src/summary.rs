use serde::{Deserialize, Serialize};
use crate::watched::WatchedEntry;

/// Aggregate figures shown above the watched list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime_minutes: f64,
}

impl WatchedSummary {
    /// Arithmetic means over the list. Entries with an unknown IMDb rating or
    /// runtime are left out of that average only; an empty input averages to 0.
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_imdb_rating: average(entries.iter().filter_map(|e| e.imdb_rating)),
            avg_user_rating: average(entries.iter().map(|e| f64::from(e.user_rating))),
            avg_runtime_minutes: average(entries.iter().filter_map(|e| e.runtime_minutes.map(f64::from))),
        }
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Two-decimal display used for every average.
pub fn format_average(value: f64) -> String {
    format!("{:.2}", value)
}
