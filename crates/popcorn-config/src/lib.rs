pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{resolve_api_key, CatalogConfig, Config, ConfigError, StorageConfig, UiConfig, API_KEY_ENV};
pub use credentials::CredentialStore;
pub use paths::{home_override, PathManager};
