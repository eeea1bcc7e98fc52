//! Directory-derived sequential codes
//!
//! The directory listing is the only source of truth: nothing is stored and
//! nothing is cached, every call lists the directory again. Two invocations
//! racing in the same directory can therefore compute the same next code.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::{CodeSequence, IssuedCode, SequentialSpec};

/// Returns the highest number among entries named `<prefix><digits>...`.
///
/// Files and directories both count, hidden entries included. Returns 0
/// when nothing matches.
pub fn highest(dir: &Path, spec: &SequentialSpec) -> Result<u64> {
    let spec = spec.normalized();

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut max_value = 0;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let name = entry.file_name();

        if let Some(value) = spec.parse_name(&name.to_string_lossy()) {
            max_value = max_value.max(value);
        }
    }

    tracing::debug!(dir = %dir.display(), prefix = %spec.prefix, highest = max_value, "scanned directory");
    Ok(max_value)
}

/// Computes the next code for `dir`.
///
/// The sequence continues after the highest match, but never starts below
/// `spec.start`.
pub fn next(dir: &Path, spec: &SequentialSpec) -> Result<IssuedCode> {
    let spec = spec.normalized();
    let highest = highest(dir, &spec)?;
    let start = spec.start_value();

    let value = if highest >= start {
        highest.checked_add(1).ok_or_else(|| {
            anyhow::anyhow!(
                "Highest {} entry in {} cannot be incremented further",
                spec.prefix,
                dir.display()
            )
        })?
    } else {
        start
    };

    Ok(IssuedCode {
        code: spec.format(value),
        value,
    })
}

/// A directory scan as a [`CodeSequence`]. Peeking and issuing are the same
/// since nothing is recorded until the caller creates the entry.
pub struct DirectorySequence {
    dir: PathBuf,
    spec: SequentialSpec,
}

impl DirectorySequence {
    pub fn new(dir: impl Into<PathBuf>, spec: SequentialSpec) -> Self {
        Self {
            dir: dir.into(),
            spec,
        }
    }

    pub fn highest(&self) -> Result<u64> {
        highest(&self.dir, &self.spec)
    }
}

impl CodeSequence for DirectorySequence {
    fn peek(&self) -> Result<IssuedCode> {
        next(&self.dir, &self.spec)
    }

    fn issue(&self) -> Result<IssuedCode> {
        next(&self.dir, &self.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn dir_with_files(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), "test").unwrap();
        }
        dir
    }

    #[test]
    fn highest_and_next() {
        let dir = dir_with_files(&[
            "P0005 Alpha.md",
            "p0100 Beta.txt",
            "notes.txt",
            "X0010.txt",
            "P0099",
        ]);

        let spec = SequentialSpec::new("P", 4, 1);
        assert_eq!(highest(dir.path(), &spec).unwrap(), 100);

        let issued = next(dir.path(), &spec).unwrap();
        assert_eq!(issued.value, 101);
        assert_eq!(issued.code, "P0101");
    }

    #[test]
    fn highest_ignores_width() {
        let dir = dir_with_files(&["P0005 Alpha.md", "p0100 Beta.txt", "X0010.txt", "P0099"]);

        for width in [1, 2, 4, 8] {
            let spec = SequentialSpec::new("P", width, 1);
            assert_eq!(highest(dir.path(), &spec).unwrap(), 100);
        }
    }

    #[test]
    fn next_defaults_on_empty_directory() {
        let dir = TempDir::new().unwrap();

        let issued = next(dir.path(), &SequentialSpec::new("", 0, 0)).unwrap();
        assert_eq!(issued.value, 1);
        assert_eq!(issued.code, "P0001");
    }

    #[test]
    fn start_is_a_floor() {
        let empty = TempDir::new().unwrap();
        let spec = SequentialSpec::new("P", 4, 100);
        assert_eq!(next(empty.path(), &spec).unwrap().value, 100);

        let low = dir_with_files(&["P0050 Low"]);
        let issued = next(low.path(), &spec).unwrap();
        assert_eq!(issued.value, 100);
        assert_eq!(issued.code, "P0100");

        let at_start = dir_with_files(&["P0100 Start"]);
        assert_eq!(next(at_start.path(), &spec).unwrap().value, 101);
    }

    #[test]
    fn multi_char_prefix_matches_directories() {
        let dir = TempDir::new().unwrap();
        for name in ["Proj0001 One", "proj0003 Two", "PRJ0002"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }

        let spec = SequentialSpec::new("Proj", 4, 1);
        assert_eq!(highest(dir.path(), &spec).unwrap(), 3);
    }

    #[test]
    fn hidden_entries_count() {
        let dir = dir_with_files(&[".P0007-draft"]);
        assert_eq!(highest(dir.path(), &SequentialSpec::new(".P", 4, 1)).unwrap(), 7);
    }

    #[test]
    fn widens_past_width() {
        let dir = dir_with_files(&["P9999 Last"]);
        let issued = next(dir.path(), &SequentialSpec::default()).unwrap();
        assert_eq!(issued.code, "P10000");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        assert!(highest(&missing, &SequentialSpec::default()).is_err());
    }

    #[test]
    fn rescans_on_every_call() {
        let dir = TempDir::new().unwrap();
        let seq = DirectorySequence::new(dir.path(), SequentialSpec::default());

        assert_eq!(seq.issue().unwrap().code, "P0001");
        fs::write(dir.path().join("P0001 First.md"), "").unwrap();
        assert_eq!(seq.peek().unwrap().code, "P0002");
        assert_eq!(seq.highest().unwrap(), 1);
    }

    proptest! {
        #[test]
        fn next_exceeds_every_existing_entry(values in proptest::collection::vec(0u64..5000, 0..8), start in 1i64..200) {
            let dir = TempDir::new().unwrap();
            for (i, value) in values.iter().enumerate() {
                fs::write(dir.path().join(format!("P{:04} note {}", value, i)), "").unwrap();
            }

            let spec = SequentialSpec::new("P", 4, start);
            let issued = next(dir.path(), &spec).unwrap();

            prop_assert!(issued.value >= start as u64);
            prop_assert!(values.iter().all(|v| issued.value > *v || *v < start as u64));
        }
    }
}
