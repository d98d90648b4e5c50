pub mod app;
pub mod episode;
pub mod error;
pub mod keys;
pub mod lifecycle;
pub mod search;
pub mod store;
pub mod title;
pub mod watchlist;

pub use app::{App, AppCommand, AppEvent, AppSettings, AppState};
pub use error::CoreError;
pub use keys::{KeyBinding, KeyListener};
pub use lifecycle::{DetailController, FetchEpisode, LifecycleStatus};
pub use search::{SearchController, SearchEpisode, SearchStatus};
pub use store::{JsonStore, Persisted};
pub use title::{movie_title, TitleScope, TitleSink};
pub use watchlist::{WatchList, WatchedSink};
