//! stamp - structured filenames for notes
//!
//! Generates dated names (`2025-11-12`, `2025-11-12-F093015`), per-day
//! analog numbers backed by a counter file (`2025-11-12-A3`), and sequential
//! codes derived from the entries of the working directory (`P0042`).

pub mod cli;
pub mod domain;
pub mod storage;
pub mod vault;

pub use domain::{CodeSequence, IssuedCode, SequentialSpec, TimestampGenerator};
pub use storage::{CounterManager, DirectorySequence};
