use async_trait::async_trait;
use popcorn_models::{MovieDetail, MovieSummary};
use crate::cancel::CancelToken;
use crate::error::CatalogError;

/// A remote movie catalog.
///
/// Implementations must return `CatalogError::Cancelled` once `cancel` fires
/// and must not report a result after that.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    fn catalog_name(&self) -> &str;

    async fn search(&self, query: &str, cancel: &CancelToken) -> Result<Vec<MovieSummary>, CatalogError>;

    async fn fetch_detail(&self, id: &str, cancel: &CancelToken) -> Result<MovieDetail, CatalogError>;
}
