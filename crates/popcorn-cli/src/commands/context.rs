use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use popcorn_catalog::{CatalogClient, OmdbClient};
use popcorn_config::{resolve_api_key, Config, CredentialStore, PathManager, API_KEY_ENV};
use popcorn_core::{AppSettings, JsonStore, Persisted, WatchList};

/// Paths, config and credentials every command starts from.
pub struct Context {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl Context {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config.validate()?;

        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials.load()
            .map_err(|e| eyre!("Failed to load credentials from {}: {}", paths.credentials_file().display(), e))?;

        Ok(Self { paths, config, credentials })
    }

    /// OMDb client for the configured catalog. Fails before any request when no key is set.
    pub fn catalog_client(&self) -> Result<OmdbClient> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        let api_key = resolve_api_key(env_key.as_deref(), &self.credentials, &self.config)
            .wrap_err("Run 'usepopcorn config set-api-key' to store an OMDb API key")?;
        let client = OmdbClient::from_config(&self.config.catalog, api_key)?;
        tracing::debug!("Using {} catalog at {}", client.catalog_name(), client.base_url());
        Ok(client)
    }

    pub fn watched(&self) -> Result<Persisted<WatchList>> {
        let store_dir = self.paths.store_dir();
        std::fs::create_dir_all(&store_dir)
            .wrap_err_with(|| format!("Failed to create {}", store_dir.display()))?;
        Persisted::load(
            JsonStore::new(store_dir),
            self.config.storage.watched_key.clone(),
            WatchList::new(),
        )
        .wrap_err("Refusing to start with an unreadable watched list")
    }

    pub fn app_settings(&self) -> AppSettings {
        AppSettings::from(&self.config.ui)
    }
}
