use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use crate::error::CoreError;

/// Durable key/value storage: one JSON document per key under a directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file))
    }

    /// Read the value stored under `key`.
    ///
    /// A missing file is `Ok(None)`. A file that does not decode (bad JSON,
    /// invalid UTF-8) is copied aside to `<key>.json.bak` and is also
    /// `Ok(None)`. A file that exists but cannot be read is an error, so the
    /// caller never overwrites data it could not see.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let path = self.path_for(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored value for '{}' at {:?}", key, path);
                return Ok(None);
            }
            Err(e) => {
                return Err(anyhow::anyhow!("Failed to read stored value for '{}' at {:?}: {}", key, path, e));
            }
        };

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => {
                debug!("Loaded stored value for '{}'", key);
                Ok(Some(value))
            }
            Err(e) => {
                let backup_path = path.with_extension("json.bak");
                std::fs::copy(&path, &backup_path).map_err(|backup_err| {
                    anyhow::anyhow!(
                        "Stored value for '{}' is corrupt ({}) and could not be backed up: {}",
                        key, e, backup_err
                    )
                })?;
                warn!(
                    "Stored value for '{}' is corrupt ({}). Backed up to {:?}, starting from default.",
                    key, e, backup_path
                );
                Ok(None)
            }
        }
    }

    /// Replace the value under `key` (whole-value, last write wins).
    pub fn save<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let content = serde_json::to_string(value)?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &path)?;

        debug!("Saved stored value for '{}' to {:?}", key, path);
        Ok(())
    }

}

/// A value read once from a [`JsonStore`] and written back on every change.
#[derive(Debug)]
pub struct Persisted<T> {
    store: JsonStore,
    key: String,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Fails only when an existing file could not be read or backed up.
    pub fn load(store: JsonStore, key: impl Into<String>, default: T) -> Result<Self, CoreError> {
        let key = key.into();
        let value = store.load(&key)?.unwrap_or(default);
        Ok(Self { store, key, value })
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) -> Result<(), CoreError> {
        self.store.save(&self.key, &value)?;
        self.value = value;
        Ok(())
    }

    /// Apply `f` to a copy and persist it. The in-memory value only changes
    /// once the write succeeded; if `f` fails nothing is written.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> Result<R, CoreError>) -> Result<R, CoreError> {
        let mut next = self.value.clone();
        let result = f(&mut next)?;
        self.store.save(&self.key, &next)?;
        self.value = next;
        info!("Persisted '{}'", self.key);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_default() {
        let dir = TempDir::new().unwrap();
        let persisted = Persisted::load(JsonStore::new(dir.path()), "watched", vec![1u32, 2]).unwrap();
        assert_eq!(persisted.get(), &vec![1, 2]);
    }

    #[test]
    fn test_update_writes_through() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let mut persisted = Persisted::load(store.clone(), "numbers", Vec::<u32>::new()).unwrap();

        persisted.update(|v| {
            v.push(7);
            Ok(())
        })
        .unwrap();

        let raw = std::fs::read_to_string(store.path_for("numbers")).unwrap();
        assert_eq!(raw, "[7]");

        let reloaded = Persisted::load(store, "numbers", Vec::<u32>::new()).unwrap();
        assert_eq!(reloaded.get(), &vec![7]);
    }

    #[test]
    fn test_failed_update_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let mut persisted = Persisted::load(store.clone(), "numbers", vec![1u32]).unwrap();

        let result = persisted.update(|v| {
            v.push(2);
            Err::<(), _>(CoreError::NoRating)
        });

        assert!(result.is_err());
        assert_eq!(persisted.get(), &vec![1]);
        assert!(!store.path_for("numbers").exists());
    }

    #[test]
    fn test_corrupt_file_backed_up() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        std::fs::write(store.path_for("watched"), "{not json").unwrap();

        let persisted = Persisted::load(store.clone(), "watched", Vec::<u32>::new()).unwrap();
        assert!(persisted.get().is_empty());
        assert!(dir.path().join("watched.json.bak").exists());
    }

    #[test]
    fn test_invalid_utf8_backed_up_before_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let original: &[u8] = b"[\"Am\xE9lie\"]";
        std::fs::write(store.path_for("watched"), original).unwrap();

        let mut persisted = Persisted::load(store.clone(), "watched", Vec::<String>::new()).unwrap();
        assert!(persisted.get().is_empty());

        persisted.update(|v| {
            v.push("Heat".to_string());
            Ok(())
        })
        .unwrap();

        let backup = std::fs::read(dir.path().join("watched.json.bak")).unwrap();
        assert_eq!(backup, original);
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        std::fs::create_dir(store.path_for("watched")).unwrap();

        let result = Persisted::load(store, "watched", Vec::<u32>::new());
        assert!(matches!(result, Err(CoreError::Storage(_))));
    }

    #[test]
    fn test_set_replaces_value() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("nested"));
        let mut persisted = Persisted::load(store.clone(), "title", String::from("a")).unwrap();
        persisted.set("b".to_string()).unwrap();
        assert_eq!(store.load::<String>("title").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_key_sanitized_into_filename() {
        let store = JsonStore::new("/tmp/store");
        assert_eq!(store.path_for("watched"), PathBuf::from("/tmp/store/watched.json"));
        assert_eq!(store.path_for("../etc passwd"), PathBuf::from("/tmp/store/___etc_passwd.json"));
    }
}
