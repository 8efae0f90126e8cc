//! Single-slot debounce timer with generation counting.
//!
//! [`Debouncer`] holds at most one pending tokio sleep task.  Every
//! [`reschedule`](Debouncer::reschedule) or [`cancel`](Debouncer::cancel)
//! bumps the generation and aborts the previous task.  Aborting is only
//! best-effort (a task that already woke up may be waiting on the session
//! lock), so the fire callback receives its generation and the owner checks
//! it with [`take_if_current`](Debouncer::take_if_current) before acting.
//!
//! The debouncer itself is not synchronised; it lives inside the session
//! mutex together with the buffer it protects.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Cancel-and-restart timer for the flush entry point.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// `true` while a scheduled task has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel any pending task and start a new one on `runtime` that calls
    /// `on_fire(generation)` after the delay.  Returns that generation.
    pub fn reschedule<F>(&mut self, runtime: &Handle, on_fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;
        let delay = self.delay;
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(generation);
        }));
        generation
    }

    /// Invalidate the current generation.  Idempotent.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// Called by a fired task: returns `true` exactly once for the current
    /// generation and marks the slot empty.  Stale generations get `false`.
    pub fn take_if_current(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
