//! Shared runtime ownership and the global pause.
//!
//! Mutator threads run their steps through [`World::mutate`]; each step
//! holds the world lock for its duration. [`World::stop_the_world`] takes
//! the lock exclusively, waiting for in-flight steps to finish, and hands
//! back a [`StoppedWorld`]. Until that guard is dropped no mutator step can
//! start, so the heap it exposes is a frozen snapshot.
//!
//! The guard releases on drop, which includes unwinding out of a panicking
//! scan. `parking_lot` locks do not poison, so the world stays usable after
//! such a panic.

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::{RwLock, RwLockWriteGuard};

use crate::{Addr, ChanBuffer, RtError, Runtime};

/// A runtime shared between mutator threads and inspectors.
#[derive(Debug)]
pub struct World {
    rt: RwLock<Runtime>,
    stopped: AtomicBool,
    pauses: AtomicU64,
}

impl World {
    pub fn new(rt: Runtime) -> Self {
        Self {
            rt: RwLock::new(rt),
            stopped: AtomicBool::new(false),
            pauses: AtomicU64::new(0),
        }
    }

    /// Run one mutator step with exclusive access to the runtime.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Runtime) -> R) -> R {
        f(&mut self.rt.write())
    }

    /// Run a read-only step. Concurrent with other inspectors, excluded by
    /// mutator steps and by a stopped world.
    pub fn inspect<R>(&self, f: impl FnOnce(&Runtime) -> R) -> R {
        f(&self.rt.read())
    }

    /// Suspend all mutator activity until the returned guard is dropped.
    pub fn stop_the_world(&self, reason: &'static str) -> StoppedWorld<'_> {
        let guard = self.rt.write();
        self.stopped.store(true, Ordering::Release);
        self.pauses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(reason, "world stopped");
        StoppedWorld {
            world: self,
            rt: guard,
            reason,
            since: Instant::now(),
        }
    }

    /// Whether a [`StoppedWorld`] guard is currently alive.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Number of times the world has been stopped.
    pub fn pause_count(&self) -> u64 {
        self.pauses.load(Ordering::Relaxed)
    }

    pub fn into_inner(self) -> Runtime {
        self.rt.into_inner()
    }
}

/// Proof that the world is stopped, and read access to the frozen runtime.
///
/// Only shared access is offered; the frozen runtime cannot be changed
/// through the guard.
pub struct StoppedWorld<'w> {
    world: &'w World,
    rt: RwLockWriteGuard<'w, Runtime>,
    reason: &'static str,
    since: Instant,
}

impl StoppedWorld<'_> {
    /// Raw view of the ring buffer of the channel whose header is at `chan`.
    pub fn chan_buffer(&self, chan: Addr) -> Result<ChanBuffer<'_>, RtError> {
        if chan.is_null() {
            return Err(RtError::NullReference);
        }
        if !self.rt.chans.contains_key(&chan) {
            return Err(RtError::NotAChannel(chan));
        }
        ChanBuffer::new(self.rt.heap(), chan)
    }
}

impl Deref for StoppedWorld<'_> {
    type Target = Runtime;

    fn deref(&self) -> &Runtime {
        &self.rt
    }
}

impl Drop for StoppedWorld<'_> {
    fn drop(&mut self) {
        self.world.stopped.store(false, Ordering::Release);
        #[allow(clippy::cast_possible_truncation, reason = "pause durations fit in u64 micros")]
        let paused_us = self.since.elapsed().as_micros() as u64;
        tracing::debug!(reason = self.reason, paused_us, "world resumed");
    }
}

#[cfg(test)]
mod tests;
