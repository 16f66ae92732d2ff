//! Per-engine mutual exclusion that tells waiting apart from re-entry.
//!
//! A plain mutex would deadlock when a ledger callback re-enters the engine
//! on the same thread. [`ReentrancyGuard`] records which thread is inside:
//! other threads block until it leaves, the owning thread gets
//! `ReentrantCall` immediately.

use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};
use stakematch_types::{Result, StakematchError};

#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    owner: Mutex<Option<ThreadId>>,
    released: Condvar,
}

/// Proof of being inside the guard. Leaves on drop.
#[derive(Debug)]
#[must_use = "the guard is released as soon as this is dropped"]
pub struct Entered<'a> {
    guard: &'a ReentrancyGuard,
}

impl ReentrancyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter, waiting for any other thread to leave first.
    ///
    /// # Errors
    /// Returns `ReentrantCall` if the calling thread is already inside.
    pub fn enter(&self) -> Result<Entered<'_>> {
        let me = thread::current().id();
        let mut owner = self.owner.lock();
        loop {
            let current = *owner;
            match current {
                None => {
                    *owner = Some(me);
                    return Ok(Entered { guard: self });
                }
                Some(id) if id == me => return Err(StakematchError::ReentrantCall),
                Some(_) => self.released.wait(&mut owner),
            }
        }
    }

    /// Whether any thread is currently inside.
    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.owner.lock().is_some()
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        *self.guard.owner.lock() = None;
        self.guard.released.notify_one();
    }
}
