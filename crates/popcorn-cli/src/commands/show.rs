use super::context::Context;
use super::spinner::Spinner;
use crate::output::{new_table, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use popcorn_catalog::CatalogClient;
use popcorn_core::DetailController;
use popcorn_models::{MovieDetail, WatchedEntry};
use serde_json::json;

pub async fn run_show(id: String, rate: Option<u8>, output: &Output) -> Result<()> {
    let ctx = Context::load()?;
    let client = ctx.catalog_client()?;
    let mut watched = ctx.watched()?;
    let mut controller = DetailController::new();

    let Some(fetch) = controller.select(&id) else {
        return Ok(());
    };
    let spinner = Spinner::start(format!("Loading {}...", id));
    let result = client.fetch_detail(&fetch.id, &fetch.cancel).await;
    spinner.finish();

    match result {
        Ok(detail) => {
            controller.on_fetch_success(fetch.episode, detail);
        }
        Err(e) => {
            let message = controller
                .on_fetch_failure(fetch.episode, e)
                .unwrap_or_else(|| "Request was cancelled".to_string());
            output.error(&message);
            return Err(eyre!(message));
        }
    }

    let detail = controller
        .detail()
        .cloned()
        .ok_or_else(|| eyre!("No detail loaded for {}", id))?;
    let rated = controller.watched_rating(&watched);

    output.json(&json!({
        "detail": detail,
        "watched_rating": rated,
    }));
    render_detail(&detail, rated, output);

    if let Some(stars) = rate {
        controller.set_rating(stars, &watched)?;
        let entry = controller.commit(&mut watched)?;
        report_added(&entry, output);
    }
    Ok(())
}

pub fn render_detail(detail: &MovieDetail, watched_rating: Option<u8>, output: &Output) {
    if !output.is_human() || output.is_quiet() {
        return;
    }

    println!();
    println!("{}", detail.title.bright_cyan().bold());
    println!("{} • {}", detail.release_date, detail.runtime_label());
    println!("{}", detail.genre.dimmed());
    match detail.imdb_rating {
        Some(rating) => println!("⭐ {} IMDb rating", rating),
        None => println!("⭐ N/A IMDb rating"),
    }
    println!();

    let mut table = new_table(vec!["Details", ""]);
    table.add_row(vec!["Plot", detail.plot.as_str()]);
    table.add_row(vec!["Starring", detail.actors.as_str()]);
    table.add_row(vec!["Directed by", detail.director.as_str()]);
    output.table(&table);

    if let Some(stars) = watched_rating {
        output.info(format!("You rated this movie {} ⭐", stars));
    }
}

pub fn report_added(entry: &WatchedEntry, output: &Output) {
    output.json(&json!({ "added": entry }));
    if output.is_human() {
        output.success(format!(
            "Added {} to your watched list with {} ⭐",
            entry.title, entry.user_rating
        ));
    }
}
