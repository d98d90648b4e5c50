use crate::cancel::{cancellable, CancelToken};
use crate::error::CatalogError;
use crate::omdb::api;
use crate::traits::CatalogClient;
use async_trait::async_trait;
use popcorn_config::CatalogConfig;
use popcorn_models::{MovieDetail, MovieSummary};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for the OMDb API (`GET {base}?apikey=..&i=..` / `&s=..`).
#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("usepopcorn/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CatalogError::network)?;
        Ok(Self::with_http_client(client, base_url, api_key))
    }

    pub fn from_config(config: &CatalogConfig, api_key: impl Into<String>) -> Result<Self, CatalogError> {
        Self::new(config.base_url.clone(), api_key, Duration::from_secs(config.timeout_secs))
    }

    /// Use a preconfigured reqwest client (proxies, TLS roots, tests)
    pub fn with_http_client(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CatalogClient for OmdbClient {
    fn catalog_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str, cancel: &CancelToken) -> Result<Vec<MovieSummary>, CatalogError> {
        cancellable(cancel, api::search_titles(&self.client, &self.base_url, &self.api_key, query)).await
    }

    async fn fetch_detail(&self, id: &str, cancel: &CancelToken) -> Result<MovieDetail, CatalogError> {
        cancellable(cancel, api::get_title(&self.client, &self.base_url, &self.api_key, id)).await
    }
}
