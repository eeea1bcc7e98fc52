//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Timestamps | Date/time based names | `stamp`, `daily`, `fleeting`, `voice`, `monthly`, `yearly` |
//! | Analog | Per-day counter | `analog`, `analog --check`, `analog --reset` |
//! | Sequential | Directory scan | `project "Title"`, `seq --prefix N --width 3` |
//!
//! ## Output
//!
//! Global flags shape every generated name:
//! - `--ext` appends `.md` (also enabled by `always_extension` in config)
//! - `--copy` copies the name to the clipboard (macOS)
//! - `--format json` prints machine-readable output
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod analog;
mod app;
mod clipboard;
mod output;
mod sequence;

pub use app::{run, Cli, Commands, Runtime};
pub use output::{Output, OutputFormat};
