//! Process-wide path recorder.
//!
//! A single mutex serializes every insert and the one finalize. The trie is
//! created on the first insert and handed out, by value, exactly once.
//!
//! `finalize` may run during process teardown, after thread-locals are gone,
//! so only the fatal insert path emits a `tracing` event.

use crate::trie::Trie;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Active,
    Finalized,
}

enum State {
    Uninitialized,
    Active(Trie),
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderStats {
    pub phase: Phase,
    /// Component nodes currently held.
    pub nodes: usize,
    /// Accepted inserts, duplicates included.
    pub inserts: u64,
}

pub struct Recorder {
    state: Mutex<State>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(State::Uninitialized),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `path`. Returns `false` if the recorder was already finalized,
    /// in which case the path is dropped.
    ///
    /// Running out of memory or node indices aborts the process; the trie is
    /// left intact up to that point.
    pub fn insert(&self, path: &[u8]) -> bool {
        let mut state = self.lock();
        if let State::Uninitialized = *state {
            *state = State::Active(Trie::new());
        }
        let State::Active(trie) = &mut *state else {
            return false;
        };
        if let Err(e) = trie.insert(path) {
            error!(error = %e, "path trie insert failed");
            std::process::abort();
        }
        true
    }

    /// Close the recorder and take the trie. `None` if nothing was ever
    /// recorded or finalize already ran.
    pub fn finalize(&self) -> Option<Trie> {
        let mut state = self.lock();
        match std::mem::replace(&mut *state, State::Finalized) {
            State::Active(trie) => Some(trie),
            State::Uninitialized | State::Finalized => None,
        }
    }

    pub fn stats(&self) -> RecorderStats {
        match &*self.lock() {
            State::Uninitialized => RecorderStats {
                phase: Phase::Uninitialized,
                nodes: 0,
                inserts: 0,
            },
            State::Active(trie) => RecorderStats {
                phase: Phase::Active,
                nodes: trie.len(),
                inserts: trie.inserts(),
            },
            State::Finalized => RecorderStats {
                phase: Phase::Finalized,
                nodes: 0,
                inserts: 0,
            },
        }
    }
}
