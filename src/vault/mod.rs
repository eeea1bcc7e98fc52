//! # Obsidian Vault Detection
//!
//! When stamp runs inside an Obsidian vault it borrows the vault's own date
//! templates so generated names match the ones Obsidian creates:
//!
//! | Layout | Source |
//! |--------|--------|
//! | daily | Daily Notes core plugin (`daily-notes.json`, then `app.json`) |
//! | default | Unique Note Creator community plugin (`data.json`) |
//!
//! Templates are translated from Moment.js tokens to strftime by
//! [`moment::to_strftime`]. Problems reading plugin files never stop the
//! CLI: they are collected on [`Vault::problems`] and whatever layouts were
//! found are still used.

pub mod moment;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::Layouts;

const DAILY_NOTES: &str = "daily-notes";
const UNIQUE_NOTE_CREATOR: &str = "unique-note-creator";

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A detected vault and the layouts it provides
#[derive(Debug)]
pub struct Vault {
    pub root: PathBuf,
    pub layouts: Layouts,
    pub problems: Vec<VaultError>,
}

/// Looks for a vault at `start` or any of its parents.
pub fn detect(start: &Path) -> Result<Option<Vault>> {
    let start = std::path::absolute(start)
        .with_context(|| format!("Failed to resolve path: {}", start.display()))?;

    let Some(root) = find_root(&start)? else {
        return Ok(None);
    };

    let mut problems = Vec::new();
    let layouts = Layouts {
        daily: record(daily_notes_format(&root), &mut problems),
        default: record(unique_note_format(&root), &mut problems),
    };

    tracing::debug!(root = %root.display(), ?layouts, "detected obsidian vault");

    Ok(Some(Vault {
        root,
        layouts,
        problems,
    }))
}

fn find_root(start: &Path) -> Result<Option<PathBuf>> {
    for dir in start.ancestors() {
        let marker = dir.join(".obsidian");
        match fs::metadata(&marker) {
            Ok(meta) if meta.is_dir() => return Ok(Some(dir.to_path_buf())),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to inspect {}", marker.display()))
            }
        }
    }
    Ok(None)
}

/// Translates a discovered template, keeping the error for later reporting
fn record(
    found: Result<Option<String>, VaultError>,
    problems: &mut Vec<VaultError>,
) -> Option<String> {
    match found {
        Ok(format) => format.as_deref().and_then(moment::to_strftime),
        Err(e) => {
            problems.push(e);
            None
        }
    }
}

fn obsidian_dir(root: &Path) -> PathBuf {
    root.join(".obsidian")
}

/// Reads a JSON file, treating a missing file as `None`
fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, VaultError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(VaultError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| VaultError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// True if `plugin` is listed in a plugin list file. Unreadable lists count
/// as not listed.
fn plugin_listed(list_path: &Path, plugin: &str) -> bool {
    matches!(
        read_json::<Vec<String>>(list_path),
        Ok(Some(ids)) if ids.iter().any(|id| id == plugin)
    )
}

#[derive(Deserialize)]
struct DailyNotesSettings {
    #[serde(default)]
    format: String,
}

#[derive(Deserialize)]
struct AppSettings {
    #[serde(default, rename = "dailyNotes")]
    daily_notes: Option<DailyNotesSettings>,
}

fn daily_notes_format(root: &Path) -> Result<Option<String>, VaultError> {
    let dir = obsidian_dir(root);
    if !plugin_listed(&dir.join("core-plugins.json"), DAILY_NOTES) {
        return Ok(None);
    }

    if let Some(settings) = read_json::<DailyNotesSettings>(&dir.join("daily-notes.json"))? {
        if !settings.format.is_empty() {
            return Ok(Some(settings.format));
        }
    }

    let app = read_json::<AppSettings>(&dir.join("app.json"))?;
    Ok(app
        .and_then(|app| app.daily_notes)
        .map(|daily| daily.format)
        .filter(|format| !format.is_empty()))
}

fn unique_note_format(root: &Path) -> Result<Option<String>, VaultError> {
    let dir = obsidian_dir(root);
    let plugin_dir = dir.join("plugins").join(UNIQUE_NOTE_CREATOR);

    if !plugin_listed(&dir.join("community-plugins.json"), UNIQUE_NOTE_CREATOR)
        && !plugin_dir.is_dir()
    {
        return Ok(None);
    }

    // Plugin settings have no fixed schema; an unparsable file is skipped
    let data = match read_json::<Value>(&plugin_dir.join("data.json")) {
        Ok(data) => data,
        Err(VaultError::Parse { .. }) => None,
        Err(e) => return Err(e),
    };

    Ok(data.as_ref().and_then(find_template))
}

/// Searches plugin settings for something that looks like a date template.
/// Keys mentioning "format" are preferred at each level.
fn find_template(node: &Value) -> Option<String> {
    match node {
        Value::Object(map) => map
            .iter()
            .find_map(|(key, value)| match value {
                Value::String(s)
                    if key.to_lowercase().contains("format") && moment::looks_like_template(s) =>
                {
                    Some(s.clone())
                }
                _ => None,
            })
            .or_else(|| map.values().find_map(find_template)),
        Value::Array(items) => items.iter().find_map(find_template),
        Value::String(s) if moment::looks_like_template(s) => Some(s.clone()),
        _ => None,
    }
}
