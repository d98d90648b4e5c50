use super::context::Context;
use super::prompts::{prompt_rating, prompt_select, prompt_string, prompt_yes_no};
use super::search::render_results;
use super::show::{render_detail, report_added};
use super::spinner::Spinner;
use super::title::TerminalTitle;
use super::watched::{render_list, render_summary};
use crate::output::Output;
use color_eyre::Result;
use popcorn_catalog::OmdbClient;
use popcorn_core::app::{ENTER_KEY, ESCAPE_KEY};
use popcorn_core::{App, AppCommand, LifecycleStatus, SearchStatus, TitleSink};
use std::rc::Rc;
use std::sync::Arc;

enum ResultsChoice {
    Movie(String),
    NewSearch,
    Watched,
    Quit,
}

pub async fn run_browse(initial_query: Option<String>, output: &Output) -> Result<()> {
    let ctx = Context::load()?;
    let client = Arc::new(ctx.catalog_client()?);
    let settings = ctx.app_settings();

    let title = Rc::new(TerminalTitle::new());
    title.set_title(&settings.default_title);
    let mut app = App::new(client, ctx.watched()?, settings).with_title_sink(title);

    match initial_query {
        Some(query) => app.dispatch(AppCommand::SetQuery(query))?,
        None => {
            app.key(ENTER_KEY)?;
        }
    }

    loop {
        if app.state().detail.selection().is_some() {
            detail_view(&mut app, output).await?;
        } else if app.state().search_focused {
            search_prompt(&mut app, output).await?;
        } else {
            settle(&mut app, "Searching...").await;
            match results_view(&app, output)? {
                ResultsChoice::Movie(id) => {
                    app.dispatch(AppCommand::Select(id))?;
                    settle(&mut app, "Loading details...").await;
                }
                ResultsChoice::NewSearch => {
                    app.key(ENTER_KEY)?;
                }
                ResultsChoice::Watched => watched_view(&mut app, output)?,
                ResultsChoice::Quit => break,
            }
        }
    }

    Ok(())
}

async fn settle(app: &mut App<OmdbClient>, msg: &str) {
    if app.pending() == 0 {
        return;
    }
    let spinner = Spinner::start(msg);
    app.settle().await;
    spinner.finish();
}

async fn search_prompt(app: &mut App<OmdbClient>, output: &Output) -> Result<()> {
    let query = prompt_string("Search movies", None)?;
    app.dispatch(AppCommand::BlurSearch)?;
    if query.trim().is_empty() {
        return Ok(());
    }
    app.dispatch(AppCommand::SetQuery(query))?;

    if app.state().search.status() == &SearchStatus::Idle {
        output.warn(format!(
            "Type at least {} characters to search",
            app.settings().min_query_len
        ));
        app.key(ENTER_KEY)?;
        // Blurred above, so Enter refocuses the empty search box
        return Ok(());
    }
    settle(app, "Searching...").await;
    Ok(())
}

fn results_view(app: &App<OmdbClient>, output: &Output) -> Result<ResultsChoice> {
    let state = app.state();
    if let Some(error) = &state.error {
        output.error(error);
    } else if state.search.status() == &SearchStatus::Ready {
        render_results(state.search.results(), output);
    }

    let results = state.search.results();
    let mut items: Vec<String> = results
        .iter()
        .map(|m| format!("{} ({})", m.title, m.year))
        .collect();
    items.push("🔍 New search".to_string());
    items.push(format!("📋 Watched list ({})", state.watched_list().len()));
    items.push("Quit".to_string());

    let choice = match prompt_select("Pick a movie", &items, 0)? {
        Some(index) if index < results.len() => ResultsChoice::Movie(results[index].id.clone()),
        Some(index) if index == results.len() => ResultsChoice::NewSearch,
        Some(index) if index == results.len() + 1 => ResultsChoice::Watched,
        _ => ResultsChoice::Quit,
    };
    Ok(choice)
}

async fn detail_view(app: &mut App<OmdbClient>, output: &Output) -> Result<()> {
    settle(app, "Loading details...").await;

    let state = app.state();
    let watched_rating = state.detail.watched_rating(state.watched_list());
    match state.detail.status() {
        LifecycleStatus::Ready => {
            if let Some(detail) = state.detail.detail() {
                render_detail(detail, watched_rating, output);
            }
        }
        LifecycleStatus::Failed(message) => output.error(message),
        LifecycleStatus::Idle | LifecycleStatus::Loading => {}
    }

    let rateable = state.detail.status() == &LifecycleStatus::Ready && watched_rating.is_none();
    let rating = state.detail.rating();
    let can_commit = state.detail.can_commit(state.watched_list());

    let mut items = Vec::new();
    if rateable {
        items.push(if rating == 0 {
            "Rate this movie".to_string()
        } else {
            format!("Change rating ({} ⭐)", rating)
        });
    }
    if can_commit {
        items.push("+ Add to list".to_string());
    }
    items.push("← Back".to_string());

    let Some(index) = prompt_select("Movie", &items, 0)? else {
        app.key(ESCAPE_KEY)?;
        return Ok(());
    };

    match items[index].as_str() {
        "+ Add to list" => {
            let entry = app.commit()?;
            report_added(&entry, output);
        }
        "← Back" => app.dispatch(AppCommand::Close)?,
        _ => {
            if let Some(stars) = prompt_rating(rating)? {
                app.dispatch(AppCommand::Rate(stars))?;
                tracing::debug!(
                    "Rating {} after {} revision(s)",
                    stars,
                    app.state().detail.rating_revision_count()
                );
            }
        }
    }
    Ok(())
}

fn watched_view(app: &mut App<OmdbClient>, output: &Output) -> Result<()> {
    loop {
        let list = app.state().watched_list();
        render_summary(&list.summary(), output);
        render_list(list, output);

        let mut items: Vec<String> = list
            .entries()
            .iter()
            .map(|e| format!("✕ Remove {} ({})", e.title, e.year))
            .collect();
        items.push("← Back".to_string());
        let ids: Vec<String> = list.entries().iter().map(|e| e.id.clone()).collect();

        match prompt_select("Watched list", &items, ids.len())? {
            Some(index) if index < ids.len() => {
                if prompt_yes_no("Remove this movie from your list?", false)? {
                    app.dispatch(AppCommand::RemoveWatched(ids[index].clone()))?;
                }
            }
            _ => return Ok(()),
        }
    }
}
