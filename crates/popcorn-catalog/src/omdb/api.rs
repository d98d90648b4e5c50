use crate::error::CatalogError;
use popcorn_models::{MovieDetail, MovieSummary};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const DETAIL_FAILED_MESSAGE: &str = "Something went wrong with loading movies";
pub const SEARCH_FAILED_MESSAGE: &str = "Something went wrong with fetching movies";
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

/// `?i=` lookup body. Every field is optional on the wire; absent ones
/// become empty strings rather than errors.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmdbTitle {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Poster")]
    poster: String,
    #[serde(rename = "Runtime")]
    runtime: String,
    #[serde(rename = "imdbRating")]
    imdb_rating: String,
    #[serde(rename = "Plot")]
    plot: String,
    #[serde(rename = "Released")]
    released: String,
    #[serde(rename = "Actors")]
    actors: String,
    #[serde(rename = "Director")]
    director: String,
    #[serde(rename = "Genre")]
    genre: String,
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Poster")]
    poster: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmdbSearchResponse {
    #[serde(rename = "Search")]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

fn is_false_response(response: Option<&str>) -> bool {
    response.is_some_and(|r| r.eq_ignore_ascii_case("false"))
}

/// "148 min" -> 148
pub fn parse_runtime(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse().ok()
}

/// "8.8" -> 8.8, "N/A" -> None
pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn into_detail(raw: OmdbTitle, requested_id: &str) -> MovieDetail {
    // Keep the requested id when the body omits it so the entry stays addressable
    let id = if raw.imdb_id.is_empty() {
        requested_id.to_string()
    } else {
        raw.imdb_id
    };

    MovieDetail {
        id,
        title: raw.title,
        year: raw.year,
        poster_url: raw.poster,
        runtime_minutes: parse_runtime(&raw.runtime),
        imdb_rating: parse_rating(&raw.imdb_rating),
        plot: raw.plot,
        release_date: raw.released,
        actors: raw.actors,
        director: raw.director,
        genre: raw.genre,
    }
}

fn into_summary(raw: OmdbSearchItem) -> MovieSummary {
    MovieSummary {
        id: raw.imdb_id,
        title: raw.title,
        year: raw.year,
        poster_url: raw.poster,
    }
}

async fn get_body(client: &Client, base_url: &str, query: &[(&str, &str)], failure: &str) -> Result<String, CatalogError> {
    let response = client
        .get(base_url)
        .query(query)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(CatalogError::network)?;

    let status = response.status();
    if !status.is_success() {
        debug!("Catalog request failed with status {}", status);
        return Err(CatalogError::Service {
            status: status.as_u16(),
            message: failure.to_string(),
        });
    }

    response.text().await.map_err(CatalogError::network)
}

/// Fetch the full record for one title
pub async fn get_title(client: &Client, base_url: &str, api_key: &str, id: &str) -> Result<MovieDetail, CatalogError> {
    debug!("Fetching catalog detail for {}", id);
    let body = get_body(client, base_url, &[("apikey", api_key), ("i", id)], DETAIL_FAILED_MESSAGE).await?;

    let raw: OmdbTitle = serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    if is_false_response(raw.response.as_deref()) {
        return Err(CatalogError::NotFound(
            raw.error.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()),
        ));
    }

    Ok(into_detail(raw, id))
}

/// Search titles by free text
pub async fn search_titles(client: &Client, base_url: &str, api_key: &str, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
    debug!("Searching catalog for '{}'", query);
    let body = get_body(client, base_url, &[("apikey", api_key), ("s", query)], SEARCH_FAILED_MESSAGE).await?;

    let raw: OmdbSearchResponse = serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    if is_false_response(raw.response.as_deref()) {
        debug!("Catalog reported no results: {:?}", raw.error);
        return Err(CatalogError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    debug!(
        "Catalog search returned {} results (total {})",
        raw.search.len(),
        raw.total_results.as_deref().unwrap_or("?")
    );
    Ok(raw.search.into_iter().map(into_summary).collect())
}
