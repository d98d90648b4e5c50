//! Selected-movie detail lifecycle.
//!
//! The controller owns "which movie is open" and walks it through
//! Idle -> Loading -> Ready | Failed. It never performs I/O itself:
//! [`DetailController::select`] hands back a [`FetchEpisode`] for the caller
//! to run, and the outcome comes back through `on_fetch_success` or
//! `on_fetch_failure` tagged with the episode number. Outcomes for any
//! episode other than the current one are dropped.

use popcorn_catalog::{CancelToken, CatalogError};
use popcorn_models::{MovieDetail, WatchedEntry, MAX_USER_RATING};
use std::rc::Rc;
use tracing::{debug, info, warn};
use crate::episode::EpisodeSlot;
use crate::error::CoreError;
use crate::title::{movie_title, TitleScope, TitleSink};
use crate::watchlist::WatchedSink;

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// A detail request the caller must run against the catalog.
#[derive(Debug, Clone)]
pub struct FetchEpisode {
    pub episode: u64,
    pub id: String,
    pub cancel: CancelToken,
}

struct TitleTarget {
    sink: Rc<dyn TitleSink>,
    default_title: String,
}

pub struct DetailController {
    selection: Option<String>,
    status: LifecycleStatus,
    detail: Option<MovieDetail>,
    rating: u8,
    rating_revision_count: u32,
    episodes: EpisodeSlot,
    title_target: Option<TitleTarget>,
    title_scope: Option<TitleScope>,
}

impl DetailController {
    pub fn new() -> Self {
        Self {
            selection: None,
            status: LifecycleStatus::Idle,
            detail: None,
            rating: 0,
            rating_revision_count: 0,
            episodes: EpisodeSlot::default(),
            title_target: None,
            title_scope: None,
        }
    }

    /// Mirror the loaded movie's title into `sink` while a detail is shown.
    pub fn with_title_sink(mut self, sink: Rc<dyn TitleSink>, default_title: impl Into<String>) -> Self {
        self.title_target = Some(TitleTarget {
            sink,
            default_title: default_title.into(),
        });
        self
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn status(&self) -> &LifecycleStatus {
        &self.status
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.detail.as_ref()
    }

    /// Current star rating, 0 when none has been picked.
    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn rating_revision_count(&self) -> u32 {
        self.rating_revision_count
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.episodes.in_flight()
    }

    /// Rating previously committed for the open movie, if it is already watched.
    pub fn watched_rating<S: WatchedSink + ?Sized>(&self, watched: &S) -> Option<u8> {
        self.selection.as_deref().and_then(|id| watched.rating_for(id))
    }

    /// Whether `commit` would currently succeed.
    pub fn can_commit<S: WatchedSink + ?Sized>(&self, watched: &S) -> bool {
        self.status == LifecycleStatus::Ready
            && self.rating >= 1
            && self.selection.as_deref().is_some_and(|id| !watched.contains(id))
    }

    /// Open `id`, or close it if it is already the selection.
    ///
    /// Any in-flight fetch is cancelled either way. Returns the episode to run
    /// when a new selection was made.
    pub fn select(&mut self, id: &str) -> Option<FetchEpisode> {
        if self.selection.as_deref() == Some(id) {
            debug!("Deselecting {}", id);
            self.close();
            return None;
        }

        self.release_detail();
        self.reset_rating();
        self.selection = Some(id.to_string());
        self.status = LifecycleStatus::Loading;

        let (episode, cancel) = self.episodes.begin();
        debug!("Selected {} (episode {})", id, episode);
        Some(FetchEpisode {
            episode,
            id: id.to_string(),
            cancel,
        })
    }

    /// Apply a loaded detail. Returns false when `episode` is stale.
    pub fn on_fetch_success(&mut self, episode: u64, detail: MovieDetail) -> bool {
        if !self.episodes.finish(episode) {
            debug!("Discarding detail for stale episode {}", episode);
            return false;
        }

        self.release_detail();
        if !detail.title.is_empty() {
            if let Some(target) = &self.title_target {
                self.title_scope = Some(TitleScope::acquire(
                    Rc::clone(&target.sink),
                    &movie_title(&detail.title),
                    target.default_title.clone(),
                ));
            }
        }

        debug!("Loaded detail for {} (episode {})", detail.id, episode);
        self.detail = Some(detail);
        self.status = LifecycleStatus::Ready;
        self.reset_rating();
        true
    }

    /// Apply a failed fetch. Cancellations and stale episodes are ignored;
    /// anything else moves to `Failed` and the message is returned for display.
    pub fn on_fetch_failure(&mut self, episode: u64, error: CatalogError) -> Option<String> {
        if error.is_cancelled() {
            debug!("Episode {} was cancelled", episode);
            return None;
        }
        if !self.episodes.finish(episode) {
            debug!("Discarding failure for stale episode {}: {}", episode, error);
            return None;
        }

        let message = error.to_string();
        warn!("Failed to load movie details (episode {}): {}", episode, message);
        self.status = LifecycleStatus::Failed(message.clone());
        Some(message)
    }

    /// Pick a star rating for the open movie. Every change of value counts
    /// as one revision; setting the same value again does not.
    pub fn set_rating<S: WatchedSink + ?Sized>(&mut self, stars: u8, watched: &S) -> Result<(), CoreError> {
        if self.status != LifecycleStatus::Ready {
            return Err(CoreError::NotReady);
        }
        if !(1..=MAX_USER_RATING).contains(&stars) {
            return Err(CoreError::InvalidRating(stars));
        }
        if let Some(id) = self.selection.as_deref() {
            if watched.contains(id) {
                return Err(CoreError::AlreadyWatched(id.to_string()));
            }
        }

        if stars != self.rating {
            self.rating = stars;
            self.rating_revision_count += 1;
            debug!("Rating set to {} (revision {})", stars, self.rating_revision_count);
        }
        Ok(())
    }

    /// Add the open movie to `watched` with the chosen rating, then close.
    pub fn commit<S: WatchedSink + ?Sized>(&mut self, watched: &mut S) -> Result<WatchedEntry, CoreError> {
        if self.status != LifecycleStatus::Ready {
            return Err(CoreError::NotReady);
        }
        let (Some(id), Some(detail)) = (self.selection.as_deref(), self.detail.as_ref()) else {
            return Err(CoreError::NotReady);
        };
        if self.rating < 1 {
            return Err(CoreError::NoRating);
        }
        if watched.contains(id) {
            return Err(CoreError::AlreadyWatched(id.to_string()));
        }

        let mut entry = WatchedEntry::from_detail(detail, self.rating, self.rating_revision_count);
        entry.id = id.to_string();
        watched.add(entry.clone())?;

        info!(
            "Added {} ({}) to watched list with rating {} after {} revision(s)",
            entry.title, entry.id, entry.user_rating, entry.rating_revision_count
        );
        self.close();
        Ok(entry)
    }

    /// Clear the selection and cancel any in-flight fetch.
    pub fn close(&mut self) {
        self.episodes.cancel();
        self.release_detail();
        self.reset_rating();
        if let Some(id) = self.selection.take() {
            debug!("Closed {}", id);
        }
        self.status = LifecycleStatus::Idle;
    }

    fn release_detail(&mut self) {
        // Restore the title before the next scope is acquired
        self.title_scope = None;
        self.detail = None;
    }

    fn reset_rating(&mut self) {
        self.rating = 0;
        self.rating_revision_count = 0;
    }
}

impl Default for DetailController {
    fn default() -> Self {
        Self::new()
    }
}
