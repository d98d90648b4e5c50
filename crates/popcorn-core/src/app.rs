//! Application state and command loop.
//!
//! [`App`] ties the search box, the detail view and the watched list
//! together. Commands mutate state synchronously; catalog requests run on
//! spawned tasks and report back through an event channel that the caller
//! drains with [`App::next_event`] or [`App::settle`].

use popcorn_catalog::{CatalogClient, CatalogError};
use popcorn_config::UiConfig;
use popcorn_models::{MovieDetail, MovieSummary, WatchedEntry};
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use crate::error::CoreError;
use crate::keys::{KeyBinding, KeyListener};
use crate::lifecycle::{DetailController, FetchEpisode};
use crate::search::{SearchController, SearchEpisode};
use crate::store::Persisted;
use crate::title::TitleSink;
use crate::watchlist::WatchList;

pub const ENTER_KEY: &str = "Enter";
pub const ESCAPE_KEY: &str = "Escape";

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    SetQuery(String),
    Select(String),
    Close,
    Rate(u8),
    Commit,
    RemoveWatched(String),
    FocusSearch,
    BlurSearch,
}

#[derive(Debug)]
pub enum AppEvent {
    SearchFinished {
        episode: u64,
        result: Result<Vec<MovieSummary>, CatalogError>,
    },
    DetailFinished {
        episode: u64,
        result: Result<MovieDetail, CatalogError>,
    },
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub min_query_len: usize,
    pub default_title: String,
}

impl From<&UiConfig> for AppSettings {
    fn from(ui: &UiConfig) -> Self {
        Self {
            min_query_len: ui.min_query_len,
            default_title: ui.default_title.clone(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self::from(&UiConfig::default())
    }
}

pub struct AppState {
    pub search_focused: bool,
    pub search: SearchController,
    pub detail: DetailController,
    pub watched: Persisted<WatchList>,
    /// Last search or detail failure, shown next to the results.
    pub error: Option<String>,
}

impl AppState {
    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn watched_list(&self) -> &WatchList {
        self.watched.get()
    }
}

pub struct App<C: CatalogClient + 'static> {
    client: Arc<C>,
    settings: AppSettings,
    state: AppState,
    keys: KeyListener<AppCommand>,
    _enter: KeyBinding<AppCommand>,
    escape: Option<KeyBinding<AppCommand>>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    pending: usize,
}

impl<C: CatalogClient + 'static> App<C> {
    pub fn new(client: Arc<C>, watched: Persisted<WatchList>, settings: AppSettings) -> Self {
        let keys = KeyListener::new();
        let enter = keys.bind(ENTER_KEY, AppCommand::FocusSearch);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            client,
            state: AppState {
                search_focused: false,
                search: SearchController::new(settings.min_query_len),
                detail: DetailController::new(),
                watched,
                error: None,
            },
            settings,
            keys,
            _enter: enter,
            escape: None,
            events_tx,
            events_rx,
            pending: 0,
        }
    }

    /// Mirror the open movie's title into `sink`.
    pub fn with_title_sink(mut self, sink: Rc<dyn TitleSink>) -> Self {
        self.state.detail.close();
        self.state.detail = DetailController::new().with_title_sink(sink, self.settings.default_title.clone());
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Number of catalog requests whose outcome has not been applied yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Result<(), CoreError> {
        debug!("Dispatching {:?}", command);
        let result = match command {
            AppCommand::SetQuery(query) => {
                self.set_query(&query);
                Ok(())
            }
            AppCommand::Select(id) => {
                if let Some(fetch) = self.state.detail.select(&id) {
                    self.spawn_fetch(fetch);
                }
                Ok(())
            }
            AppCommand::Close => {
                self.state.detail.close();
                Ok(())
            }
            AppCommand::Rate(stars) => self.state.detail.set_rating(stars, &self.state.watched),
            AppCommand::Commit => self.commit().map(|_| ()),
            AppCommand::RemoveWatched(id) => {
                let removed = self.state.watched.update(|list| Ok(list.remove(&id)))?;
                if let Some(entry) = removed {
                    info!("Removed {} ({}) from watched list", entry.title, entry.id);
                }
                Ok(())
            }
            AppCommand::FocusSearch => {
                if !self.state.search_focused {
                    self.state.search_focused = true;
                    self.set_query("");
                }
                Ok(())
            }
            AppCommand::BlurSearch => {
                self.state.search_focused = false;
                Ok(())
            }
        };
        self.sync_escape_binding();
        result
    }

    /// Run every command bound to the key `code`. Returns the commands run.
    pub fn key(&mut self, code: &str) -> Result<Vec<AppCommand>, CoreError> {
        let commands = self.keys.dispatch(code);
        for command in &commands {
            self.dispatch(command.clone())?;
        }
        Ok(commands)
    }

    /// Add the open movie to the watched list and close it.
    pub fn commit(&mut self) -> Result<WatchedEntry, CoreError> {
        let entry = self.state.detail.commit(&mut self.state.watched)?;
        self.sync_escape_binding();
        Ok(entry)
    }

    /// Wait for one outstanding request and apply its outcome.
    /// Returns false when nothing is outstanding.
    pub async fn next_event(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.pending -= 1;
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Apply outcomes until no request is outstanding.
    pub async fn settle(&mut self) {
        while self.next_event().await {}
    }

    fn set_query(&mut self, query: &str) {
        self.state.error = None;
        if let Some(search) = self.state.search.set_query(query) {
            self.spawn_search(search);
        }
    }

    fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchFinished { episode, result } => match result {
                Ok(results) => {
                    if self.state.search.on_search_success(episode, results) {
                        self.state.error = None;
                    }
                }
                Err(e) => {
                    if let Some(message) = self.state.search.on_search_failure(episode, e) {
                        self.state.error = Some(message);
                    }
                }
            },
            AppEvent::DetailFinished { episode, result } => match result {
                Ok(detail) => {
                    if self.state.detail.on_fetch_success(episode, detail) {
                        self.state.error = None;
                    }
                }
                Err(e) => {
                    if let Some(message) = self.state.detail.on_fetch_failure(episode, e) {
                        self.state.error = Some(message);
                    }
                }
            },
        }
        self.sync_escape_binding();
    }

    fn sync_escape_binding(&mut self) {
        let selected = self.state.detail.selection().is_some();
        match (selected, self.escape.is_some()) {
            (true, false) => self.escape = Some(self.keys.bind(ESCAPE_KEY, AppCommand::Close)),
            (false, true) => self.escape = None,
            _ => {}
        }
    }

    fn spawn_search(&mut self, search: SearchEpisode) {
        let client = Arc::clone(&self.client);
        let tx = self.events_tx.clone();
        self.pending += 1;
        tokio::spawn(async move {
            let result = client.search(&search.query, &search.cancel).await;
            let _ = tx.send(AppEvent::SearchFinished {
                episode: search.episode,
                result,
            });
        });
    }

    fn spawn_fetch(&mut self, fetch: FetchEpisode) {
        let client = Arc::clone(&self.client);
        let tx = self.events_tx.clone();
        self.pending += 1;
        tokio::spawn(async move {
            let result = client.fetch_detail(&fetch.id, &fetch.cancel).await;
            let _ = tx.send(AppEvent::DetailFinished {
                episode: fetch.episode,
                result,
            });
        });
    }
}

#[cfg(test)]
mod tests;
