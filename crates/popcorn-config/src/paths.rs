use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable that relocates every usepopcorn directory under one root.
pub const HOME_ENV: &str = "USEPOPCORN_HOME";

/// Base path from `USEPOPCORN_HOME`, if set
pub fn home_override() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("usepopcorn");

        Ok(Self::with_base(base_dir))
    }

    /// Config files at the base, data and logs in subdirectories
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Directory holding one JSON file per persisted key
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("usepopcorn.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.store_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = home_override() {
            return Self::with_base(base);
        }

        // Platform config dir (~/.config/usepopcorn on Linux), falling back to
        // a dot-directory in the working directory
        Self::new().unwrap_or_else(|_| Self::with_base(".usepopcorn"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_under_base() {
        let paths = PathManager::with_base("/tmp/popcorn");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/popcorn/config.toml"));
        assert_eq!(paths.credentials_file(), PathBuf::from("/tmp/popcorn/credentials.toml"));
        assert_eq!(paths.store_dir(), PathBuf::from("/tmp/popcorn/data/store"));
        assert_eq!(paths.log_file(), PathBuf::from("/tmp/popcorn/logs/usepopcorn.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path());
        paths.ensure_directories().unwrap();
        assert!(paths.store_dir().is_dir());
        assert!(paths.log_dir().is_dir());
    }
}
