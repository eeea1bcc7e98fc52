//! Sequential codes
//!
//! A sequential code is a prefix followed by a zero-padded number (`P0042`).
//! The padding only sets a minimum width: `P12345` is a valid width-4 code.
//!
//! Two strategies hand out codes: scanning a directory for the highest
//! existing number ([`crate::storage::DirectorySequence`]) and the file-backed
//! analog counter ([`crate::storage::AnalogSequence`]). Both implement
//! [`CodeSequence`] but keep their own source of truth.

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFIX: &str = "P";
pub const DEFAULT_WIDTH: i64 = 4;
pub const DEFAULT_START: i64 = 1;

/// Describes how sequential codes are detected and rendered.
///
/// Fields may be partially filled in by callers; [`SequentialSpec::normalized`]
/// substitutes defaults and is applied on every use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequentialSpec {
    pub prefix: String,
    pub width: i64,
    pub start: i64,
}

impl Default for SequentialSpec {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            width: DEFAULT_WIDTH,
            start: DEFAULT_START,
        }
    }
}

impl SequentialSpec {
    pub fn new(prefix: impl Into<String>, width: i64, start: i64) -> Self {
        Self {
            prefix: prefix.into(),
            width,
            start,
        }
    }

    /// The `P` / width 4 project code used by `stamp project`
    pub fn project() -> Self {
        Self::default()
    }

    /// Returns a copy with empty or non-positive fields replaced by defaults
    pub fn normalized(&self) -> Self {
        let mut spec = self.clone();
        if spec.prefix.is_empty() {
            spec.prefix = DEFAULT_PREFIX.to_string();
        }
        if spec.width <= 0 {
            spec.width = DEFAULT_WIDTH;
        }
        if spec.start <= 0 {
            spec.start = DEFAULT_START;
        }
        spec
    }

    /// First value handed out when nothing at or above it exists yet
    pub fn start_value(&self) -> u64 {
        self.normalized().start.unsigned_abs()
    }

    /// Renders `value` as prefix + zero-padded digits. Never truncates.
    pub fn format(&self, value: u64) -> String {
        let spec = self.normalized();
        let width = usize::try_from(spec.width).unwrap_or(DEFAULT_WIDTH as usize);
        let digits = value.to_string();
        let padding = "0".repeat(width.saturating_sub(digits.len()));
        format!("{}{}{}", spec.prefix, padding, digits)
    }

    /// Extracts the number from an entry name like `p0100 Beta.txt`.
    ///
    /// The prefix matches case-insensitively and must be followed by at least
    /// one ASCII digit. Anything after the digit run is ignored.
    pub fn parse_name(&self, name: &str) -> Option<u64> {
        let spec = self.normalized();
        let prefix_len = spec.prefix.len();

        let head = name.get(..prefix_len)?;
        if !head.eq_ignore_ascii_case(&spec.prefix)
            && head.to_lowercase() != spec.prefix.to_lowercase()
        {
            return None;
        }

        let rest = &name[prefix_len..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }

        rest[..digits].parse().ok()
    }
}

/// A code handed out by a [`CodeSequence`], with its numeric component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedCode {
    pub code: String,
    pub value: u64,
}

impl fmt::Display for IssuedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Source of "next code" answers.
pub trait CodeSequence {
    /// Returns what [`CodeSequence::issue`] would return, without side effects
    fn peek(&self) -> Result<IssuedCode>;

    /// Hands out the next code. Durable sequences record it before returning.
    fn issue(&self) -> Result<IssuedCode>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults() {
        let spec = SequentialSpec::default();
        assert_eq!(spec.prefix, "P");
        assert_eq!(spec.width, 4);
        assert_eq!(spec.start, 1);
    }

    #[test]
    fn normalizes_partial_spec() {
        let spec = SequentialSpec::new("", 0, -5).normalized();
        assert_eq!(spec, SequentialSpec::default());

        let spec = SequentialSpec::new("X", 2, 10).normalized();
        assert_eq!(spec, SequentialSpec::new("X", 2, 10));
    }

    #[test]
    fn format_pads_to_width() {
        assert_eq!(SequentialSpec::new("X", 2, 1).format(7), "X07");
        assert_eq!(SequentialSpec::default().format(101), "P0101");
    }

    #[test]
    fn format_widens_instead_of_truncating() {
        assert_eq!(SequentialSpec::default().format(12345), "P12345");
    }

    #[test]
    fn format_handles_very_wide_padding() {
        let code = SequentialSpec::new("P", 70_000, 1).format(42);

        assert_eq!(code.len(), 1 + 70_000);
        assert!(code.starts_with("P000"));
        assert!(code.ends_with("0042"));
        assert_eq!(SequentialSpec::default().parse_name(&code), Some(42));
    }

    #[test]
    fn format_normalizes_on_every_call() {
        let spec = SequentialSpec::new("", -1, 0);
        assert_eq!(spec.format(3), "P0003");
    }

    #[test]
    fn parse_name_is_case_insensitive() {
        let spec = SequentialSpec::default();
        assert_eq!(spec.parse_name("P0005 Alpha.md"), Some(5));
        assert_eq!(spec.parse_name("p0100 Beta.txt"), Some(100));
        assert_eq!(spec.parse_name("P0099"), Some(99));
    }

    #[test]
    fn parse_name_rejects_non_matching() {
        let spec = SequentialSpec::default();
        assert_eq!(spec.parse_name("X0010.txt"), None);
        assert_eq!(spec.parse_name("notes.txt"), None);
        assert_eq!(spec.parse_name("P"), None);
        assert_eq!(spec.parse_name("Project"), None);
        assert_eq!(spec.parse_name(""), None);
    }

    #[test]
    fn parse_name_ignores_width() {
        let spec = SequentialSpec::new("P", 2, 1);
        assert_eq!(spec.parse_name("P000123-notes"), Some(123));
    }

    #[test]
    fn parse_name_multi_char_prefix() {
        let spec = SequentialSpec::new("Proj", 4, 1);
        assert_eq!(spec.parse_name("proj0003 Two"), Some(3));
        assert_eq!(spec.parse_name("PRJ0002"), None);
    }

    #[test]
    fn parse_name_handles_non_ascii_boundaries() {
        let spec = SequentialSpec::new("P", 4, 1);
        assert_eq!(spec.parse_name("é0001"), None);

        let spec = SequentialSpec::new("É", 4, 1);
        assert_eq!(spec.parse_name("é0042"), Some(42));
    }

    #[test]
    fn parse_name_skips_overflowing_runs() {
        let spec = SequentialSpec::default();
        assert_eq!(spec.parse_name("P99999999999999999999999"), None);
    }

    proptest! {
        #[test]
        fn formatted_codes_parse_back(value in 0u64..10_000_000, width in 1i64..12) {
            let spec = SequentialSpec::new("Q", width, 1);
            let code = spec.format(value);
            prop_assert!(code.len() >= 1 + width as usize);
            prop_assert_eq!(spec.parse_name(&code), Some(value));
        }
    }
}
