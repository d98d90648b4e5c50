use serde::{Deserialize, Serialize};

/// One row of a catalog search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}

/// Full catalog record for a single title.
///
/// Numeric fields the catalog reports as text ("142 min", "8.8") are parsed
/// on the way in; values the catalog does not know ("N/A") are `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub runtime_minutes: Option<u32>,
    pub imdb_rating: Option<f64>,
    pub plot: String,
    pub release_date: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

impl MovieDetail {
    /// "142 min" style label, or "N/A" when the runtime is unknown.
    pub fn runtime_label(&self) -> String {
        match self.runtime_minutes {
            Some(minutes) => format!("{} min", minutes),
            None => "N/A".to_string(),
        }
    }
}
