use popcorn_catalog::{CancelToken, CatalogError};
use popcorn_models::MovieSummary;
use tracing::{debug, warn};
use crate::episode::EpisodeSlot;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SearchEpisode {
    pub episode: u64,
    pub query: String,
    pub cancel: CancelToken,
}

/// Search box state: the query, its results, and the one outstanding search.
pub struct SearchController {
    query: String,
    min_query_len: usize,
    status: SearchStatus,
    results: Vec<MovieSummary>,
    episodes: EpisodeSlot,
}

impl SearchController {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            query: String::new(),
            min_query_len,
            status: SearchStatus::Idle,
            results: Vec::new(),
            episodes: EpisodeSlot::default(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn results(&self) -> &[MovieSummary] {
        &self.results
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Replace the query. Short queries clear the results without a request.
    pub fn set_query(&mut self, query: &str) -> Option<SearchEpisode> {
        self.query = query.to_string();
        self.episodes.cancel();

        let trimmed = query.trim();
        if trimmed.chars().count() < self.min_query_len {
            debug!("Query '{}' below {} characters, clearing results", trimmed, self.min_query_len);
            self.results.clear();
            self.status = SearchStatus::Idle;
            return None;
        }

        self.status = SearchStatus::Loading;
        let (episode, cancel) = self.episodes.begin();
        Some(SearchEpisode {
            episode,
            query: trimmed.to_string(),
            cancel,
        })
    }

    pub fn on_search_success(&mut self, episode: u64, results: Vec<MovieSummary>) -> bool {
        if !self.episodes.finish(episode) {
            debug!("Discarding results for stale search {}", episode);
            return false;
        }
        debug!("Search {} returned {} results", episode, results.len());
        self.results = results;
        self.status = SearchStatus::Ready;
        true
    }

    pub fn on_search_failure(&mut self, episode: u64, error: CatalogError) -> Option<String> {
        if error.is_cancelled() {
            return None;
        }
        if !self.episodes.finish(episode) {
            debug!("Discarding failure for stale search {}: {}", episode, error);
            return None;
        }

        let message = error.to_string();
        warn!("Search failed: {}", message);
        self.results.clear();
        self.status = SearchStatus::Failed(message.clone());
        Some(message)
    }
}
