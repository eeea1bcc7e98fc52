//! # Storage Layer
//!
//! Everything that touches the filesystem.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Analog counters | JSON | `~/.stamp/counters.json` (configurable) |
//! | Config | TOML | `~/.stamp/config.toml` |
//! | Sequential codes | entry names | the working directory |
//!
//! ## Numbering Strategies
//!
//! - [`CounterManager`] - durable per-date counters; the file is authoritative
//! - [`scanner`] - codes derived from directory entries; nothing is stored
//!
//! The two never consult each other.
//!
//! ## Concurrency
//!
//! [`CounterManager`] serializes all operations in-process behind one mutex.
//! Across processes the counter file is last-writer-wins; individual writes
//! are atomic (temp file + rename) and locked with `fs2`.

mod config;
mod counter_file;
mod counters;
pub mod paths;
pub mod scanner;

pub use config::{Config, ConfigError, DEFAULT_COUNTER_FILE};
pub use counter_file::{CounterStore, LoadOutcome};
pub use counters::{AnalogSequence, CounterError, CounterManager};
pub use scanner::DirectorySequence;
