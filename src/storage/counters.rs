//! Analog counter management
//!
//! [`CounterManager`] owns the in-memory [`CounterState`] and is the only
//! writer of the counter file. Every operation holds one mutex for its whole
//! read-modify-persist sequence, so operations never interleave, even across
//! different scopes.
//!
//! A mutation whose persist step fails is rolled back before the error is
//! returned: callers never observe a counter that moved but was not saved.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use thiserror::Error;

use super::counter_file::{CounterStore, LoadOutcome};
use super::paths;
use crate::domain::{analog_code, CodeSequence, CounterState, IssuedCode};

#[derive(Debug, Error, PartialEq)]
pub enum CounterError {
    #[error("Counter value must not be negative, got {0}")]
    NegativeValue(i64),

    #[error("Counter for {0} cannot be incremented further")]
    Overflow(String),
}

/// File-backed per-scope counters
pub struct CounterManager {
    store: CounterStore,
    state: Mutex<CounterState>,
}

impl CounterManager {
    /// Opens the counter file at `path`, creating it if needed.
    ///
    /// A leading `~` is expanded. An unreadable or corrupted file is
    /// discarded with a warning and replaced by empty counters.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = paths::expand_home(path.as_ref())?;
        let store = CounterStore::new(path);

        store.ensure_parent()?;

        let state = match store.load()? {
            LoadOutcome::Loaded(state) => {
                tracing::debug!(path = %store.path().display(), scopes = state.analog.len(), "loaded counters");
                state
            }
            LoadOutcome::Missing => {
                tracing::debug!(path = %store.path().display(), "creating counter file");
                let state = CounterState::default();
                store.save(&state)?;
                state
            }
            LoadOutcome::Unusable(reason) => {
                tracing::warn!(
                    path = %store.path().display(),
                    "Counter file corrupted, starting fresh: {}",
                    reason
                );
                let state = CounterState::default();
                store.save(&state)?;
                state
            }
        };

        Ok(Self {
            store,
            state: Mutex::new(state),
        })
    }

    /// Returns the path of the backing file
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    fn lock(&self) -> MutexGuard<'_, CounterState> {
        // Mutations restore their snapshot on failure, so a poisoned state is
        // still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `change` and persists. On any failure the state is restored.
    fn mutate<T>(&self, change: impl FnOnce(&mut CounterState) -> Result<T>) -> Result<T> {
        let mut state = self.lock();
        let snapshot = state.clone();

        let outcome = change(&mut *state).and_then(|value| {
            self.store.save(&*state)?;
            Ok(value)
        });

        if outcome.is_err() {
            *state = snapshot;
        }
        outcome
    }

    /// Increments the scope's counter and returns the new code and value
    pub fn issue(&self, scope: &str) -> Result<IssuedCode> {
        let value = self.mutate(|state| {
            let next = state
                .count(scope)
                .checked_add(1)
                .ok_or_else(|| CounterError::Overflow(scope.to_string()))?;
            state.analog.insert(scope.to_string(), next);
            Ok(next)
        })?;

        tracing::debug!(scope, value, "issued analog code");
        Ok(IssuedCode {
            code: analog_code(scope, value),
            value,
        })
    }

    /// Returns what [`CounterManager::issue`] would return, without changes
    pub fn peek(&self, scope: &str) -> Result<IssuedCode> {
        let state = self.lock();
        let value = state
            .count(scope)
            .checked_add(1)
            .ok_or_else(|| CounterError::Overflow(scope.to_string()))?;

        Ok(IssuedCode {
            code: analog_code(scope, value),
            value,
        })
    }

    /// Increments and returns the code, e.g. `2025-11-12-A3`
    pub fn next(&self, scope: &str) -> Result<String> {
        self.issue(scope).map(|issued| issued.code)
    }

    /// Returns the code [`CounterManager::next`] would produce
    pub fn check(&self, scope: &str) -> Result<String> {
        self.peek(scope).map(|issued| issued.code)
    }

    /// Returns the stored count, 0 if the scope was never used
    pub fn get(&self, scope: &str) -> u64 {
        self.lock().count(scope)
    }

    /// Forgets a scope; its next code starts at 1 again
    pub fn reset(&self, scope: &str) -> Result<()> {
        self.mutate(|state| {
            state.analog.remove(scope);
            Ok(())
        })
    }

    /// Sets a scope's stored count. Zero removes the scope.
    pub fn set(&self, scope: &str, value: i64) -> Result<()> {
        let value = u64::try_from(value).map_err(|_| CounterError::NegativeValue(value))?;

        self.mutate(|state| {
            if value == 0 {
                state.analog.remove(scope);
            } else {
                state.analog.insert(scope.to_string(), value);
            }
            Ok(())
        })
    }

    /// Forgets every analog scope
    pub fn reset_all(&self) -> Result<()> {
        self.mutate(|state| {
            state.analog.clear();
            Ok(())
        })
    }

    /// Returns a copy of the current state
    pub fn snapshot(&self) -> CounterState {
        self.lock().clone()
    }
}

/// The analog counter for one scope, as a [`CodeSequence`]
pub struct AnalogSequence<'a> {
    manager: &'a CounterManager,
    scope: String,
}

impl<'a> AnalogSequence<'a> {
    pub fn new(manager: &'a CounterManager, scope: impl Into<String>) -> Self {
        Self {
            manager,
            scope: scope.into(),
        }
    }
}

impl CodeSequence for AnalogSequence<'_> {
    fn peek(&self) -> Result<IssuedCode> {
        self.manager.peek(&self.scope)
    }

    fn issue(&self) -> Result<IssuedCode> {
        self.manager.issue(&self.scope)
    }
}
