use super::context::Context;
use crate::output::{new_table, Output};
use color_eyre::Result;
use owo_colors::OwoColorize;
use popcorn_models::{format_average, WatchedSummary};
use popcorn_core::WatchList;
use serde_json::json;

pub fn run_list(output: &Output) -> Result<()> {
    let ctx = Context::load()?;
    let watched = ctx.watched()?;
    let list = watched.get();

    output.json(&json!({
        "summary": list.summary(),
        "entries": list.entries(),
    }));
    render_summary(&list.summary(), output);
    render_list(list, output);
    Ok(())
}

pub fn run_summary(output: &Output) -> Result<()> {
    let ctx = Context::load()?;
    let summary = ctx.watched()?.get().summary();
    output.json(&json!(summary));
    render_summary(&summary, output);
    Ok(())
}

pub fn run_remove(id: String, output: &Output) -> Result<()> {
    let ctx = Context::load()?;
    let mut watched = ctx.watched()?;
    match watched.update(|list| Ok(list.remove(&id)))? {
        Some(entry) => {
            tracing::info!("Removed {} ({}) from watched list", entry.title, entry.id);
            output.json(&json!({ "removed": entry }));
            if output.is_human() {
                output.success(format!("Removed {} from your watched list", entry.title));
            }
        }
        None => output.warn(format!("{} is not in your watched list", id)),
    }
    Ok(())
}

pub fn render_summary(summary: &WatchedSummary, output: &Output) {
    if !output.is_human() || output.is_quiet() {
        return;
    }
    println!("{}", "Movies you watched".bright_cyan().bold());
    println!(
        "#️⃣ {} movies   ⭐️ {}   🌟 {}   ⏳ {} min",
        summary.count,
        format_average(summary.avg_imdb_rating),
        format_average(summary.avg_user_rating),
        format_average(summary.avg_runtime_minutes),
    );
}

pub fn render_list(list: &WatchList, output: &Output) {
    let mut table = new_table(vec!["IMDb ID", "Title", "Year", "IMDb", "Yours", "Runtime"]);
    for entry in list.entries() {
        table.add_row(vec![
            entry.id.clone(),
            entry.title.clone(),
            entry.year.clone(),
            entry.imdb_rating.map_or_else(|| "N/A".to_string(), |r| r.to_string()),
            entry.user_rating.to_string(),
            entry.runtime_minutes.map_or_else(|| "N/A".to_string(), |m| format!("{} min", m)),
        ]);
    }
    output.table(&table);
}
