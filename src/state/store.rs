//! JSON file persistence for the registry.
//!
//! The whole registry is rewritten on every save. A missing, empty or
//! unreadable file loads as an empty registry.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use super::registry::Registry;

/// Default stats file name.
pub const DEFAULT_STATS_FILE: &str = "stats.json";

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to replace stats file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Registry backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the registry, degrading to empty on any failure.
    pub fn load(&self) -> Registry {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No stats file at {}, starting empty", self.path.display());
                return Registry::new();
            }
            Err(e) => {
                tracing::warn!("Cannot read stats file {}: {}", self.path.display(), e);
                return Registry::new();
            }
        };

        if contents.trim().is_empty() {
            tracing::debug!("Stats file {} is empty", self.path.display());
            return Registry::new();
        }

        match serde_json::from_str::<Registry>(&contents) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!(
                    "Malformed stats file {}, starting empty: {}",
                    self.path.display(),
                    e
                );
                Registry::new()
            }
        }
    }

    /// Rewrite the whole file.
    ///
    /// Writes a sibling temp file and renames it over the target, so readers
    /// see either the old or the new registry.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, registry)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&self.path)?;

        tracing::debug!("Saved {} users to {}", registry.len(), self.path.display());
        Ok(())
    }
}

impl Default for RegistryStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::record::UserRecord;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join("stats.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, "  \n").unwrap();
        assert!(RegistryStore::new(path).load().is_empty());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, "{\"alice\": {\"in_game\": tru").unwrap();
        assert!(RegistryStore::new(path).load().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join("nested").join("stats.json"));

        let mut registry = Registry::new();
        let alice = registry.get_or_create("alice");
        alice.games_played = 4;
        alice.games_won = 2;
        let bob = registry.get_or_create("bob");
        bob.start_round(77, 5);
        bob.consume_attempt();
        registry.insert("legacy", {
            let mut record = UserRecord::new();
            record.registered_at = None;
            record
        });

        store.save(&registry).unwrap();
        assert_eq!(store.load(), registry);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join("stats.json"));

        let mut registry = Registry::new();
        registry.get_or_create("alice");
        registry.get_or_create("bob");
        store.save(&registry).unwrap();

        let mut smaller = Registry::new();
        smaller.get_or_create("carol");
        store.save(&smaller).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains("carol"));
    }

    #[test]
    fn test_loads_legacy_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(
            &path,
            r#"{
                "alice": {
                    "game": false,
                    "number_attempts": 0,
                    "number_wins": 3,
                    "number_games": 7,
                    "random_number": 55
                }
            }"#,
        )
        .unwrap();

        let registry = RegistryStore::new(path).load();
        let alice = registry.get("alice").unwrap();
        assert_eq!(alice.games_won, 3);
        assert_eq!(alice.games_played, 7);
        assert!(!alice.is_in_game());
    }
}
