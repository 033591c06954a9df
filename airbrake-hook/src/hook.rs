use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;

use crate::{Entry, Level};

/// Returned by a hook that could not handle an entry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HookError {
    /// The hook failed.
    #[error("{0}")]
    Failed(#[source] Box<dyn StdError + Send + Sync>),
}

impl HookError {
    /// Wraps the error that made a hook fail.
    pub fn new<E: Into<Box<dyn StdError + Send + Sync>>>(err: E) -> HookError {
        HookError::Failed(err.into())
    }
}

/// A callback invoked for log entries of selected levels.
pub trait Hook: Send + Sync {
    /// The levels this hook wants to see.
    fn levels(&self) -> &[Level];

    /// Handles an entry.
    ///
    /// The entry may be modified. Returning an error stops the remaining
    /// hooks for the entry from running.
    fn fire(&self, entry: &mut Entry) -> Result<(), HookError>;
}

/// Hooks registered per level.
///
/// This is what logging front ends dispatch entries through.
#[derive(Clone, Default)]
pub struct Hooks {
    by_level: BTreeMap<Level, Vec<Arc<dyn Hook>>>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.by_level.iter().map(|(level, hooks)| (level, hooks.len())))
            .finish()
    }
}

impl Hooks {
    /// Creates an empty registry.
    pub fn new() -> Hooks {
        Hooks::default()
    }

    /// Registers `hook` for each of its levels.
    pub fn add(&mut self, hook: Arc<dyn Hook>) {
        for level in hook.levels() {
            self.by_level.entry(*level).or_default().push(hook.clone());
        }
    }

    /// Returns the hooks registered for `level`, in registration order.
    pub fn hooks_for(&self, level: Level) -> &[Arc<dyn Hook>] {
        self.by_level
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Checks whether any hook listens on `level`.
    pub fn is_enabled(&self, level: Level) -> bool {
        !self.hooks_for(level).is_empty()
    }

    /// The least severe level any hook listens on.
    pub fn max_level(&self) -> Option<Level> {
        self.by_level.keys().next_back().copied()
    }

    /// Fires every hook registered for `level`, stopping at the first error.
    pub fn fire(&self, level: Level, entry: &mut Entry) -> Result<(), HookError> {
        for hook in self.hooks_for(level) {
            hook.fire(entry)?;
        }
        Ok(())
    }
}

/// Reports an error of a hook the way a logging pipeline does: on stderr,
/// without interrupting the caller.
pub(crate) fn report_hook_error(err: &HookError) {
    let _ = writeln!(io::stderr(), "Failed to fire hook: {}", err);
}
