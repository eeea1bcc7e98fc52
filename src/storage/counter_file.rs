//! JSON storage for counters
//!
//! Counters live in a single pretty-printed JSON file that is rewritten in
//! full on every change. Writes go through a temp file and a rename so a
//! crash never leaves a half-written file behind.
//!
//! Locks taken here only cover a single read or write. Nothing locks the
//! load-modify-save cycle across processes, so concurrent invocations race
//! and the last writer wins.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::CounterState;

/// Result of reading the counter file
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(CounterState),
    Missing,
    /// The file exists but could not be read or parsed
    Unusable(String),
}

/// Store for counter state in JSON format
pub struct CounterStore {
    path: PathBuf,
}

impl CounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "counters.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Creates the directory holding the store file
    pub fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }

    /// Reads the counter file
    pub fn load(&self) -> Result<LoadOutcome> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LoadOutcome::Missing),
            Err(e) => return Ok(LoadOutcome::Unusable(e.to_string())),
        };

        file.lock_shared()
            .context("Failed to acquire read lock on counter file")?;

        let mut content = String::new();
        if let Err(e) = file.read_to_string(&mut content) {
            return Ok(LoadOutcome::Unusable(e.to_string()));
        }

        match serde_json::from_str(&content) {
            Ok(state) => Ok(LoadOutcome::Loaded(state)),
            Err(e) => Ok(LoadOutcome::Unusable(e.to_string())),
        }
    }

    /// Writes the full state (temp file + rename)
    pub fn save(&self, state: &CounterState) -> Result<()> {
        self.ensure_parent()?;

        let temp_path = self.temp_path();

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on counter file")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, state)
                .context("Failed to serialize counters")?;
            writeln!(writer).context("Failed to write counters")?;
            writer.flush().context("Failed to flush counter file")?;
            drop(writer);

            file.sync_all().context("Failed to sync counter file")?;
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| {
                format!(
                    "Failed to rename {} to {}",
                    temp_path.display(),
                    self.path.display()
                )
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state_with(scope: &str, count: u64) -> CounterState {
        let mut state = CounterState::default();
        state.analog.insert(scope.to_string(), count);
        state
    }

    #[test]
    fn load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = CounterStore::new(dir.path().join("counters.json"));

        assert!(matches!(store.load().unwrap(), LoadOutcome::Missing));
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = CounterStore::new(dir.path().join("counters.json"));

        let state = state_with("2025-11-12", 4);
        store.save(&state).unwrap();

        match store.load().unwrap() {
            LoadOutcome::Loaded(loaded) => assert_eq!(loaded, state),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn load_corrupted_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counters.json");
        fs::write(&path, "{ not json").unwrap();

        let store = CounterStore::new(&path);
        assert!(matches!(store.load().unwrap(), LoadOutcome::Unusable(_)));
    }

    #[test]
    fn file_is_human_readable() {
        let dir = TempDir::new().unwrap();
        let store = CounterStore::new(dir.path().join("counters.json"));
        store.save(&state_with("2025-11-12", 2)).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("\"analog\""));
        assert!(content.contains("\"2025-11-12\": 2"));
        assert!(content.contains("\"project\": 0"));
    }

    #[test]
    fn hand_edited_file_without_analog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counters.json");
        fs::write(&path, r#"{"project": 12}"#).unwrap();

        match CounterStore::new(&path).load().unwrap() {
            LoadOutcome::Loaded(state) => {
                assert_eq!(state.project, 12);
                assert!(state.analog.is_empty());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = CounterStore::new(dir.path().join("nested").join("dir").join("counters.json"));

        store.save(&CounterState::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn atomic_write() {
        let dir = TempDir::new().unwrap();
        let store = CounterStore::new(dir.path().join("counters.json"));
        store.save(&state_with("2025-11-12", 1)).unwrap();

        assert!(!store.temp_path().exists());
        assert_eq!(
            store.temp_path(),
            dir.path().join("counters.json.tmp")
        );
    }

    #[test]
    fn save_fails_when_temp_path_is_blocked() {
        let dir = TempDir::new().unwrap();
        let store = CounterStore::new(dir.path().join("counters.json"));
        fs::create_dir(store.temp_path()).unwrap();

        assert!(store.save(&CounterState::default()).is_err());
        assert!(!store.path().exists());
    }
}
