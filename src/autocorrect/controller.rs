//! [`AutoCorrect`] — the handle the rest of the application talks to.
//!
//! It owns the [`Session`] behind a single mutex and exposes:
//!
//! * [`toggle`](AutoCorrect::toggle) / [`set_enabled`](AutoCorrect::set_enabled)
//!   — mode control, always resetting buffer and timer.
//! * [`on_key`](AutoCorrect::on_key) — called from the keyboard listener
//!   thread for every key press.
//! * [`flush`](AutoCorrect::flush) — drain the buffer and hand it to the
//!   correction worker; also what the debounce timer and commit key call.
//!
//! Nothing slow happens under the lock: a flush only drains the buffer and
//! pushes a [`FlushJob`] onto an unbounded channel.  The proofreading call
//! and the synthetic output run in the worker (see `runner.rs`).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::input::KeyInput;
use super::state::{FlushJob, Phase, Session};
use super::{AutocorrectEvent, AutocorrectOptions};

// ---------------------------------------------------------------------------
// StatusSnapshot
// ---------------------------------------------------------------------------

/// Point-in-time copy of the session for the host UI and for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub enabled: bool,
    pub phase: Phase,
    pub buffered: String,
    pub timer_pending: bool,
    pub replacements: u64,
}

// ---------------------------------------------------------------------------
// AutoCorrect
// ---------------------------------------------------------------------------

struct Shared {
    session: Mutex<Session>,
    runtime: Handle,
    min_buffer_len: usize,
    jobs: mpsc::UnboundedSender<FlushJob>,
    events: mpsc::UnboundedSender<AutocorrectEvent>,
}

/// Cheap-to-clone handle to the auto-correct state machine.
#[derive(Clone)]
pub struct AutoCorrect {
    shared: Arc<Shared>,
}

impl AutoCorrect {
    /// Build a disabled controller.  Flush jobs go to `jobs`; host
    /// notifications go to `events`.  Debounce timers run on `runtime`.
    pub fn new(
        options: &AutocorrectOptions,
        runtime: Handle,
        jobs: mpsc::UnboundedSender<FlushJob>,
        events: mpsc::UnboundedSender<AutocorrectEvent>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(Session::new(options.pause_delay)),
                runtime,
                min_buffer_len: options.min_buffer_len,
                jobs,
                events,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.shared
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn emit(&self, event: AutocorrectEvent) {
        // Receiver may be gone when the host does not listen.
        let _ = self.shared.events.send(event);
    }

    // -----------------------------------------------------------------------
    // Mode control
    // -----------------------------------------------------------------------

    /// Flip the mode, clear the buffer, cancel any pending flush and notify
    /// the host.  Returns the new state.
    pub fn toggle(&self) -> bool {
        let mut s = self.lock();
        let enabled = s.toggle();
        self.announce(enabled);
        enabled
    }

    /// Switch to `enabled`, toggling only if the state differs.  The check
    /// and the flip happen under one lock.
    pub fn set_enabled(&self, enabled: bool) {
        let mut s = self.lock();
        if let Some(enabled) = s.set_enabled(enabled) {
            self.announce(enabled);
        }
    }

    /// Called with the session lock held so `Toggled` events leave in the
    /// same order as the flips.
    fn announce(&self, enabled: bool) {
        log::info!("Auto-correct mode {}", if enabled { "ON" } else { "OFF" });
        self.emit(AutocorrectEvent::Toggled { enabled });
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    pub fn status(&self) -> StatusSnapshot {
        let s = self.lock();
        StatusSnapshot {
            enabled: s.enabled,
            phase: s.phase,
            buffered: s.buffer.text(),
            timer_pending: s.debounce.is_pending(),
            replacements: s.replacements,
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Feed one key press.  No-op while disabled or replacing.
    pub fn on_key(&self, key: KeyInput) {
        let mut s = self.lock();
        if !s.accepts_input() {
            return;
        }

        // Flush must fire a full pause after the *last* key.
        s.debounce.cancel();

        match key {
            KeyInput::Char(c) => s.buffer.push(c),
            KeyInput::Space => s.buffer.push(' '),
            KeyInput::Backspace => {
                s.buffer.pop();
            }
            KeyInput::Commit => {
                if s.buffer.len() >= self.shared.min_buffer_len {
                    self.dispatch(&mut s);
                }
                s.reset();
                return;
            }
            KeyInput::Other => {
                s.reset();
                return;
            }
        }

        s.sync_phase();
        if s.buffer.len() >= self.shared.min_buffer_len {
            self.schedule(&mut s);
        }
    }

    // -----------------------------------------------------------------------
    // Flush
    // -----------------------------------------------------------------------

    /// Drain the buffer and queue it for correction.  No-op when the buffer
    /// is empty or the mode is off.  Returns `true` if a job was queued.
    pub fn flush(&self) -> bool {
        let mut s = self.lock();
        s.debounce.cancel();
        self.dispatch(&mut s)
    }

    fn fire(&self, generation: u64) {
        let mut s = self.lock();
        if !s.debounce.take_if_current(generation) {
            log::debug!("autocorrect: stale timer generation {generation} ignored");
            return;
        }
        self.dispatch(&mut s);
    }

    /// Drain and send while still holding the lock, so jobs reach the
    /// worker in snapshot order.
    fn dispatch(&self, s: &mut Session) -> bool {
        let Some(job) = s.drain_for_flush() else {
            return false;
        };
        log::debug!(
            "autocorrect: flushing {} chars (session {})",
            job.snapshot.len,
            job.session_id
        );
        self.emit(AutocorrectEvent::Flushed {
            text: job.snapshot.text.clone(),
        });
        if self.shared.jobs.send(job).is_err() {
            log::warn!("autocorrect: correction worker is gone, dropping flush");
            return false;
        }
        true
    }

    fn schedule(&self, s: &mut Session) {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        s.debounce.reschedule(&self.shared.runtime, move |generation| {
            if let Some(shared) = weak.upgrade() {
                AutoCorrect { shared }.fire(generation);
            }
        });
    }

    /// Handle that does not keep the controller (and its job channel) alive.
    pub fn downgrade(&self) -> WeakAutoCorrect {
        WeakAutoCorrect {
            shared: Arc::downgrade(&self.shared),
        }
    }

    // -----------------------------------------------------------------------
    // Replacement guard
    // -----------------------------------------------------------------------

    /// Enter `Replacing` if the capture session is still live.
    ///
    /// The returned guard leaves `Replacing` when dropped, including during
    /// unwinding.
    pub fn begin_replacement(&self, session_id: u64) -> Option<ReplacementGuard> {
        if self.lock().begin_replacement(session_id) {
            Some(ReplacementGuard {
                owner: self.clone(),
            })
        } else {
            None
        }
    }
}

/// Non-owning [`AutoCorrect`] handle, held by the correction worker.
#[derive(Clone)]
pub struct WeakAutoCorrect {
    shared: Weak<Shared>,
}

impl WeakAutoCorrect {
    pub fn upgrade(&self) -> Option<AutoCorrect> {
        self.shared.upgrade().map(|shared| AutoCorrect { shared })
    }
}

/// Keeps input capture suspended while synthetic output is sent.
pub struct ReplacementGuard {
    owner: AutoCorrect,
}

impl Drop for ReplacementGuard {
    fn drop(&mut self) {
        self.owner.lock().end_replacement();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
