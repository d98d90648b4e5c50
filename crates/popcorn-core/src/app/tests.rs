use super::*;
use crate::lifecycle::LifecycleStatus;
use crate::search::SearchStatus;
use crate::store::JsonStore;
use crate::title::testing::RecordingTitle;
use async_trait::async_trait;
use popcorn_catalog::CancelToken;
use std::collections::HashMap;
use tempfile::TempDir;

/// In-memory catalog. Ids starting with "slow" never answer until cancelled.
struct FakeCatalog {
    movies: HashMap<String, MovieDetail>,
}

impl FakeCatalog {
    fn new() -> Self {
        let mut movies = HashMap::new();
        for (id, title, rating) in [
            ("tt0133093", "The Matrix", Some(8.7)),
            ("tt0816692", "Interstellar", Some(8.6)),
            ("tt0113277", "Heat", None),
        ] {
            movies.insert(
                id.to_string(),
                MovieDetail {
                    id: id.to_string(),
                    title: title.to_string(),
                    year: "1999".to_string(),
                    poster_url: String::new(),
                    runtime_minutes: Some(120),
                    imdb_rating: rating,
                    plot: String::new(),
                    release_date: String::new(),
                    actors: String::new(),
                    director: String::new(),
                    genre: String::new(),
                },
            );
        }
        Self { movies }
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    fn catalog_name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str, cancel: &CancelToken) -> Result<Vec<MovieSummary>, CatalogError> {
        if query.starts_with("slow") {
            cancel.cancelled().await;
            return Err(CatalogError::Cancelled);
        }
        let query = query.to_lowercase();
        let mut results: Vec<MovieSummary> = self
            .movies
            .values()
            .filter(|m| m.title.to_lowercase().contains(&query))
            .map(|m| MovieSummary {
                id: m.id.clone(),
                title: m.title.clone(),
                year: m.year.clone(),
                poster_url: m.poster_url.clone(),
            })
            .collect();
        if results.is_empty() {
            return Err(CatalogError::NotFound("Movie not found".to_string()));
        }
        results.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(results)
    }

    async fn fetch_detail(&self, id: &str, cancel: &CancelToken) -> Result<MovieDetail, CatalogError> {
        if id.starts_with("slow") {
            cancel.cancelled().await;
            return Err(CatalogError::Cancelled);
        }
        self.movies.get(id).cloned().ok_or_else(|| CatalogError::Service {
            status: 500,
            message: "Something went wrong with loading movies".to_string(),
        })
    }
}

fn app(dir: &TempDir) -> App<FakeCatalog> {
    let watched = Persisted::load(JsonStore::new(dir.path()), "watched", WatchList::new()).unwrap();
    App::new(Arc::new(FakeCatalog::new()), watched, AppSettings::default())
}

#[tokio::test]
async fn test_search_populates_results() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&dir);

    app.dispatch(AppCommand::SetQuery("matrix".to_string())).unwrap();
    assert_eq!(app.state().search.status(), &SearchStatus::Loading);
    app.settle().await;

    assert_eq!(app.state().search.status(), &SearchStatus::Ready);
    assert_eq!(app.state().search.result_count(), 1);
    assert_eq!(app.state().search.results()[0].id, "tt0133093");
    assert_eq!(app.state().error, None);
}

#[tokio::test]
async fn test_search_failure_sets_error_and_new_query_clears_it() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&dir);

    app.dispatch(AppCommand::SetQuery("zzzzzz".to_string())).unwrap();
    app.settle().await;
    assert_eq!(app.state().error.as_deref(), Some("Movie not found"));

    app.dispatch(AppCommand::SetQuery("ma".to_string())).unwrap();
    assert_eq!(app.state().error, None);
    assert_eq!(app.pending(), 0);
    assert_eq!(app.state().search.status(), &SearchStatus::Idle);
}

#[tokio::test]
async fn test_superseded_search_is_cancelled() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&dir);

    app.dispatch(AppCommand::SetQuery("slow query".to_string())).unwrap();
    app.dispatch(AppCommand::SetQuery("heat".to_string())).unwrap();
    app.settle().await;

    assert_eq!(app.state().search.status(), &SearchStatus::Ready);
    assert_eq!(app.state().search.results()[0].title, "Heat");
    assert_eq!(app.state().error, None);
}

#[tokio::test]
async fn test_last_selection_wins() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&dir);

    app.dispatch(AppCommand::Select("slow-one".to_string())).unwrap();
    app.dispatch(AppCommand::Select("tt0816692".to_string())).unwrap();
    assert_eq!(app.pending(), 2);
    app.settle().await;

    let state = app.state();
    assert_eq!(state.detail.status(), &LifecycleStatus::Ready);
    assert_eq!(state.detail.detail().map(|d| d.title.as_str()), Some("Interstellar"));
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_detail_failure_is_shown() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&dir);

    app.dispatch(AppCommand::Select("tt9999999".to_string())).unwrap();
    app.settle().await;

    assert_eq!(
        app.state().detail.status(),
        &LifecycleStatus::Failed("Something went wrong with loading movies".to_string())
    );
    assert_eq!(app.state().error.as_deref(), Some("Something went wrong with loading movies"));
}

#[tokio::test]
async fn test_escape_binding_follows_selection() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&dir);

    assert!(app.key("Escape").unwrap().is_empty());

    app.dispatch(AppCommand::Select("tt0133093".to_string())).unwrap();
    app.settle().await;
    assert_eq!(app.key("Escape").unwrap(), vec![AppCommand::Close]);
    assert_eq!(app.state().detail.selection(), None);

    // Binding is gone once the detail is closed
    assert!(app.key("Escape").unwrap().is_empty());
}

#[tokio::test]
async fn test_escape_cancels_pending_fetch() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&dir);

    app.dispatch(AppCommand::Select("slow-one".to_string())).unwrap();
    app.key("escape").unwrap();
    app.settle().await;

    assert_eq!(app.state().detail.status(), &LifecycleStatus::Idle);
    assert_eq!(app.state().error, None);
}

#[tokio::test]
async fn test_enter_focuses_and_clears_query() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&dir);

    app.dispatch(AppCommand::SetQuery("matrix".to_string())).unwrap();
    app.settle().await;

    assert_eq!(app.key("Enter").unwrap(), vec![AppCommand::FocusSearch]);
    assert!(app.state().search_focused);
    assert_eq!(app.state().query(), "");
    assert_eq!(app.state().search.result_count(), 0);

    // Already focused: the query is left alone
    app.dispatch(AppCommand::SetQuery("heat".to_string())).unwrap();
    app.key("Enter").unwrap();
    assert_eq!(app.state().query(), "heat");
    app.settle().await;

    app.dispatch(AppCommand::BlurSearch).unwrap();
    app.key("Enter").unwrap();
    assert_eq!(app.state().query(), "");
}

#[tokio::test]
async fn test_rate_commit_and_remove() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&dir);

    app.dispatch(AppCommand::Select("tt0133093".to_string())).unwrap();
    app.settle().await;
    for stars in [3, 7, 7, 9] {
        app.dispatch(AppCommand::Rate(stars)).unwrap();
    }
    let entry = app.commit().unwrap();

    assert_eq!(entry.user_rating, 9);
    assert_eq!(entry.rating_revision_count, 3);
    assert_eq!(app.state().detail.selection(), None);
    assert!(app.state().watched_list().contains("tt0133093"));
    assert!(app.key("Escape").unwrap().is_empty());

    // Persisted across restarts
    drop(app);
    let mut app = self::app(&dir);
    assert_eq!(app.state().watched_list().len(), 1);

    app.dispatch(AppCommand::Select("tt0133093".to_string())).unwrap();
    app.settle().await;
    assert_eq!(app.state().detail.watched_rating(app.state().watched_list()), Some(9));
    assert!(matches!(
        app.dispatch(AppCommand::Rate(5)),
        Err(CoreError::AlreadyWatched(_))
    ));

    app.dispatch(AppCommand::RemoveWatched("tt0133093".to_string())).unwrap();
    assert!(app.state().watched_list().is_empty());
}

#[tokio::test]
async fn test_commit_without_rating_fails() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&dir);

    assert!(matches!(app.dispatch(AppCommand::Commit), Err(CoreError::NotReady)));

    app.dispatch(AppCommand::Select("tt0113277".to_string())).unwrap();
    app.settle().await;
    assert!(matches!(app.dispatch(AppCommand::Commit), Err(CoreError::NoRating)));
    assert!(app.state().watched_list().is_empty());
}

#[tokio::test]
async fn test_title_tracks_open_movie() {
    let dir = TempDir::new().unwrap();
    let title = Rc::new(RecordingTitle::default());
    let mut app = app(&dir).with_title_sink(title.clone());

    app.dispatch(AppCommand::Select("tt0113277".to_string())).unwrap();
    app.settle().await;
    assert_eq!(title.current().as_deref(), Some("Movie | Heat"));

    app.key("Escape").unwrap();
    assert_eq!(title.current().as_deref(), Some("usePopcorn"));
}
