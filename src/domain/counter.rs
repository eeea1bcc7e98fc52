//! Persisted counter state
//!
//! Serialized as:
//!
//! ```json
//! {
//!   "project": 0,
//!   "analog": { "2025-11-12": 2 }
//! }
//! ```
//!
//! An absent scope is the same as a count of zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Counters keyed by scope (a `YYYY-MM-DD` date for analog notes)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Legacy global project counter. Project codes now come from directory
    /// scans; the value is only carried through so rewrites keep it.
    #[serde(default)]
    pub project: u64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub analog: BTreeMap<String, u64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, u64>>::deserialize(deserializer)?.unwrap_or_default())
}

impl CounterState {
    /// Stored count for a scope, 0 if never incremented
    pub fn count(&self, scope: &str) -> u64 {
        self.analog.get(scope).copied().unwrap_or(0)
    }
}

/// Renders the analog code for a scope and count, e.g. `2025-11-12-A3`
pub fn analog_code(scope: &str, count: u64) -> String {
    format!("{}-A{}", scope, count)
}
