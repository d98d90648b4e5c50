pub mod cancel;
pub mod error;
pub mod omdb;
pub mod traits;

pub use cancel::{cancellable, CancelHandle, CancelToken};
pub use error::CatalogError;
pub use omdb::OmdbClient;
pub use traits::CatalogClient;
