//! Capture state machine and the mutex-guarded session.
//!
//! [`Phase`] replaces a bare "is correcting" flag:
//!
//! ```text
//! Idle ──char/space──▶ Buffering ──flush / other key / toggle──▶ Idle
//!   ▲                                                            │
//!   └──────────── guard released ◀── Replacing ◀── correction ready
//! ```
//!
//! While `Replacing`, every key event is ignored so the synthetic backspaces
//! and typed correction are never captured as user input.  Toggling the mode
//! does not leave `Replacing`; only the replacement guard does.
//!
//! [`Session`] is everything the keyboard thread and the timer tasks share.
//! It lives behind one `Mutex` in the controller, which makes append,
//! remove, drain-and-clear and timer cancel/restart mutually exclusive.

use std::time::Duration;

use super::buffer::{BufferSnapshot, CorrectionBuffer};
use super::debounce::Debouncer;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing buffered.
    #[default]
    Idle,
    /// At least one unit buffered.
    Buffering,
    /// Synthetic output in progress; input is ignored.
    Replacing,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Buffering => "Buffering",
            Phase::Replacing => "Replacing",
        }
    }
}

// ---------------------------------------------------------------------------
// FlushJob
// ---------------------------------------------------------------------------

/// A drained buffer on its way to the correction worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushJob {
    pub snapshot: BufferSnapshot,
    /// Session the text was captured in; replacement is refused once the
    /// mode has been toggled since.
    pub session_id: u64,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Session {
    pub enabled: bool,
    /// Bumped on every toggle.
    pub session_id: u64,
    pub phase: Phase,
    pub buffer: CorrectionBuffer,
    pub debounce: Debouncer,
    /// Replacements started since construction.
    pub replacements: u64,
}

impl Session {
    pub fn new(pause_delay: Duration) -> Self {
        Self {
            enabled: false,
            session_id: 0,
            phase: Phase::Idle,
            buffer: CorrectionBuffer::new(),
            debounce: Debouncer::new(pause_delay),
            replacements: 0,
        }
    }

    /// Key events are processed only when enabled and not replacing.
    pub fn accepts_input(&self) -> bool {
        self.enabled && self.phase != Phase::Replacing
    }

    fn set_phase(&mut self, next: Phase) {
        if self.phase != next {
            log::debug!("autocorrect: {} -> {}", self.phase.label(), next.label());
            self.phase = next;
        }
    }

    /// Recompute `Idle`/`Buffering` from the buffer.  `Replacing` is sticky.
    pub fn sync_phase(&mut self) {
        if self.phase == Phase::Replacing {
            return;
        }
        let next = if self.buffer.is_empty() {
            Phase::Idle
        } else {
            Phase::Buffering
        };
        self.set_phase(next);
    }

    /// Drop buffered text and any pending flush.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.debounce.cancel();
        self.sync_phase();
    }

    /// Flip the mode and start a new session.  Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.session_id = self.session_id.wrapping_add(1);
        self.reset();
        self.enabled
    }

    /// Switch to `enabled` if the mode differs.  Returns the new state only
    /// when a toggle happened.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<bool> {
        (self.enabled != enabled).then(|| self.toggle())
    }

    /// Drain the buffer if a flush is allowed (non-empty and enabled).
    ///
    /// The drain and the precondition check happen under the same lock, so
    /// a late key event can only land in the next buffer lifetime.
    pub fn drain_for_flush(&mut self) -> Option<FlushJob> {
        if self.buffer.is_empty() || !self.enabled {
            return None;
        }
        let snapshot = self.buffer.take();
        self.sync_phase();
        Some(FlushJob {
            snapshot,
            session_id: self.session_id,
        })
    }

    /// Enter `Replacing` for a correction captured in `session_id`.
    ///
    /// Refused when the mode is off, the session changed, or another
    /// replacement is running.  Anything typed since the flush is discarded:
    /// the erase step is about to move the cursor under it.
    pub fn begin_replacement(&mut self, session_id: u64) -> bool {
        if !self.enabled || self.session_id != session_id || self.phase == Phase::Replacing {
            return false;
        }
        self.buffer.clear();
        self.debounce.cancel();
        self.set_phase(Phase::Replacing);
        self.replacements += 1;
        true
    }

    pub fn end_replacement(&mut self) {
        if self.phase == Phase::Replacing {
            self.set_phase(Phase::Idle);
        }
        self.sync_phase();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
