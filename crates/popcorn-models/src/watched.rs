use serde::{Deserialize, Serialize};
use crate::movie::MovieDetail;

pub const MAX_USER_RATING: u8 = 10;

/// A movie the user has rated and added to their watched list.
///
/// Serialized with the same keys the browser build kept in local storage, so
/// a list exported from there loads unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub id: String,
    pub title: String,
    pub year: String,
    #[serde(rename = "poster")]
    pub poster_url: String,
    #[serde(rename = "userRating")]
    pub user_rating: u8, // 1-10 stars
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<f64>,
    #[serde(rename = "runtime")]
    pub runtime_minutes: Option<u32>,
    #[serde(rename = "countRatingDec", default)]
    pub rating_revision_count: u32, // how often the rating changed before it was committed
}

impl WatchedEntry {
    pub fn from_detail(detail: &MovieDetail, user_rating: u8, rating_revision_count: u32) -> Self {
        Self {
            id: detail.id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            user_rating,
            imdb_rating: detail.imdb_rating,
            runtime_minutes: detail.runtime_minutes,
            rating_revision_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> MovieDetail {
        MovieDetail {
            id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: "https://example.com/inception.jpg".to_string(),
            runtime_minutes: Some(148),
            imdb_rating: Some(8.8),
            plot: "A thief who steals corporate secrets.".to_string(),
            release_date: "16 Jul 2010".to_string(),
            actors: "Leonardo DiCaprio".to_string(),
            director: "Christopher Nolan".to_string(),
            genre: "Action, Sci-Fi".to_string(),
        }
    }

    #[test]
    fn test_from_detail_copies_catalog_fields() {
        let entry = WatchedEntry::from_detail(&detail(), 9, 2);
        assert_eq!(entry.id, "tt1375666");
        assert_eq!(entry.user_rating, 9);
        assert_eq!(entry.imdb_rating, Some(8.8));
        assert_eq!(entry.runtime_minutes, Some(148));
        assert_eq!(entry.rating_revision_count, 2);
    }

    #[test]
    fn test_serializes_with_storage_keys() {
        let entry = WatchedEntry::from_detail(&detail(), 9, 2);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["imdbID"], "tt1375666");
        assert_eq!(json["poster"], "https://example.com/inception.jpg");
        assert_eq!(json["userRating"], 9);
        assert_eq!(json["imdbRating"], 8.8);
        assert_eq!(json["runtime"], 148);
        assert_eq!(json["countRatingDec"], 2);
    }

    #[test]
    fn test_deserializes_stored_entry() {
        let raw = r#"{"imdbID":"tt0133093","title":"The Matrix","year":"1999","poster":"p.jpg","userRating":10,"imdbRating":8.7,"runtime":136,"countRatingDec":1}"#;
        let entry: WatchedEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.title, "The Matrix");
        assert_eq!(entry.user_rating, 10);
        assert_eq!(entry.runtime_minutes, Some(136));
    }
}
