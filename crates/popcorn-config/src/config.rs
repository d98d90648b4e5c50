use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use crate::credentials::CredentialStore;

/// Environment variable checked first when looking for the OMDb API key.
pub const API_KEY_ENV: &str = "USEPOPCORN_OMDB_API_KEY";

const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No OMDb API key configured. Set USEPOPCORN_OMDB_API_KEY, run `usepopcorn config set-api-key`, or add catalog.api_key to config.toml")]
    MissingApiKey,
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Lowest-priority key source; prefer the env var or credentials.toml
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_watched_key")]
    pub watched_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    #[serde(default = "default_title")]
    pub default_title: String,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

fn default_base_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_watched_key() -> String {
    "watched".to_string()
}

fn default_title() -> String {
    "usePopcorn".to_string()
}

fn default_min_query_len() -> usize {
    3
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            watched_key: default_watched_key(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Missing file means defaults; a file that exists must parse.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.catalog.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "catalog.base_url must be an http(s) URL, got '{}'",
                self.catalog.base_url
            )));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::Invalid("catalog.timeout_secs must be positive".to_string()));
        }
        if self.storage.watched_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.watched_key cannot be empty".to_string()));
        }
        Ok(())
    }
}

fn usable_key(key: Option<&str>) -> Option<String> {
    key.map(str::trim)
        .filter(|k| !k.is_empty() && *k != API_KEY_PLACEHOLDER)
        .map(str::to_string)
}

/// Pick the API key: env var, then credentials.toml, then config.toml.
pub fn resolve_api_key(
    env_value: Option<&str>,
    credentials: &CredentialStore,
    config: &Config,
) -> Result<String, ConfigError> {
    usable_key(env_value)
        .or_else(|| usable_key(credentials.get_omdb_api_key().map(String::as_str)))
        .or_else(|| usable_key(config.catalog.api_key.as_deref()))
        .ok_or(ConfigError::MissingApiKey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.catalog.timeout_secs = 3;
        config.ui.min_query_len = 2;

        config.save_to_file(file.path()).unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.catalog.base_url, "http://www.omdbapi.com/");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[ui]\ndefault_title = \"Popcorn\"\n").unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.ui.default_title, "Popcorn");
        assert_eq!(loaded.ui.min_query_len, 3);
        assert_eq!(loaded.storage.watched_key, "watched");
    }

    #[test]
    fn test_missing_file_is_default() {
        let loaded = Config::load_or_default(&PathBuf::from("/nonexistent/usepopcorn/config.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.catalog.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.catalog.base_url = "https://example.com/".to_string();
        config.storage.watched_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_api_key_order() {
        let mut creds = CredentialStore::new(PathBuf::from("/tmp/unused"));
        let mut config = Config::default();

        assert!(matches!(
            resolve_api_key(None, &creds, &config),
            Err(ConfigError::MissingApiKey)
        ));

        config.catalog.api_key = Some("from-config".to_string());
        assert_eq!(resolve_api_key(None, &creds, &config).unwrap(), "from-config");

        creds.set_omdb_api_key("from-creds".to_string());
        assert_eq!(resolve_api_key(None, &creds, &config).unwrap(), "from-creds");

        assert_eq!(resolve_api_key(Some("from-env"), &creds, &config).unwrap(), "from-env");
        // Blank env value falls through
        assert_eq!(resolve_api_key(Some(" "), &creds, &config).unwrap(), "from-creds");
    }

    #[test]
    fn test_placeholder_key_is_not_configured() {
        let creds = CredentialStore::new(PathBuf::from("/tmp/unused"));
        let mut config = Config::default();
        config.catalog.api_key = Some("YOUR_API_KEY".to_string());
        assert!(resolve_api_key(None, &creds, &config).is_err());
    }
}
