//! Domain models for stamp
//!
//! Value types and formatting rules without any I/O concerns.

mod counter;
mod sequence;
mod timestamp;

pub use counter::{analog_code, CounterState};
pub use sequence::{
    CodeSequence, IssuedCode, SequentialSpec, DEFAULT_PREFIX, DEFAULT_START, DEFAULT_WIDTH,
};
pub use timestamp::{date_key, Layouts, StampKind, TimestampError, TimestampGenerator};
