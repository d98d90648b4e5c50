use super::context::Context;
use super::spinner::Spinner;
use crate::output::{new_table, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_catalog::CatalogClient;
use popcorn_core::SearchController;
use popcorn_models::MovieSummary;
use serde_json::json;

pub async fn run_search(query: String, output: &Output) -> Result<()> {
    let ctx = Context::load()?;
    let mut controller = SearchController::new(ctx.config.ui.min_query_len);
    let Some(search) = controller.set_query(&query) else {
        output.warn(format!("Search needs at least {} characters", ctx.config.ui.min_query_len));
        return Ok(());
    };

    let client = ctx.catalog_client()?;
    let spinner = Spinner::start(format!("Searching for '{}'...", search.query));
    let result = client.search(&search.query, &search.cancel).await;
    spinner.finish();

    match result {
        Ok(results) => {
            controller.on_search_success(search.episode, results);
        }
        Err(e) => {
            let message = controller
                .on_search_failure(search.episode, e)
                .unwrap_or_else(|| "Search was cancelled".to_string());
            output.error(&message);
            return Err(eyre!(message));
        }
    }

    let results = controller.results();
    output.json(&json!({
        "query": search.query,
        "count": results.len(),
        "results": results,
    }));
    render_results(results, output);
    Ok(())
}

pub fn render_results(results: &[MovieSummary], output: &Output) {
    let mut table = new_table(vec!["IMDb ID", "Title", "Year"]);
    for movie in results {
        table.add_row(vec![movie.id.as_str(), movie.title.as_str(), movie.year.as_str()]);
    }
    output.table(&table);
    if output.is_human() {
        output.info(format!("Found {} results", results.len()));
    }
}
