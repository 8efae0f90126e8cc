//! Text injection module — erases the typed text and writes the correction.
//!
//! # Overview
//!
//! Replacement is always two ordered steps against the focused window:
//!
//! 1. **Erase** — one synthetic backspace per captured character.
//! 2. **Write** — the corrected text, either typed as key events
//!    ([`KeyboardSink`]) or pasted through the clipboard ([`ClipboardSink`]).
//!
//! Both steps are synchronous; the backspaces are fully delivered before any
//! corrected text is written.
//!
//! # Usage
//!
//! ```no_run
//! use live_proofread::inject::{KeyboardSink, TextSink};
//!
//! let sink = KeyboardSink;
//! sink.erase(5).expect("erase failed");
//! sink.type_text("Hello").expect("typing failed");
//! ```

pub mod clipboard;
pub mod keyboard;

use std::sync::Arc;
use std::time::Duration;

pub use clipboard::{restore_clipboard, save_clipboard, set_clipboard};
pub use keyboard::{press_backspaces, simulate_paste, type_text};

use thiserror::Error;

use crate::config::{InjectConfig, InjectMethod};

// ---------------------------------------------------------------------------
// InjectError
// ---------------------------------------------------------------------------

/// All errors that can surface during text injection.
#[derive(Debug, Error)]
pub enum InjectError {
    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    ClipboardSet(String),

    /// Could not simulate a key press/release event.
    #[error("cannot simulate key press: {0}")]
    KeySimulation(String),
}

// ---------------------------------------------------------------------------
// TextSink
// ---------------------------------------------------------------------------

/// Destination for synthetic keyboard output.
///
/// Calls are blocking and are made from the blocking thread pool, never from
/// the keyboard listener thread.
pub trait TextSink: Send + Sync {
    /// Send `count` backspace key-down/key-up pairs.
    fn erase(&self, count: usize) -> Result<(), InjectError>;

    /// Write `text` at the cursor.
    fn type_text(&self, text: &str) -> Result<(), InjectError>;
}

// ---------------------------------------------------------------------------
// KeyboardSink
// ---------------------------------------------------------------------------

/// Types the correction as synthetic key events via `enigo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardSink;

impl TextSink for KeyboardSink {
    fn erase(&self, count: usize) -> Result<(), InjectError> {
        press_backspaces(count)
    }

    fn type_text(&self, text: &str) -> Result<(), InjectError> {
        type_text(text)
    }
}

// ---------------------------------------------------------------------------
// ClipboardSink
// ---------------------------------------------------------------------------

/// Pastes the correction through the clipboard, restoring the previous
/// clipboard content afterwards (best-effort).
///
/// Useful for scripts with combining characters that do not survive being
/// typed key by key.
#[derive(Debug, Clone)]
pub struct ClipboardSink {
    /// Milliseconds to wait after setting the clipboard before pasting.
    pub delay_ms: u64,
    /// Milliseconds to wait after pasting before restoring the clipboard.
    pub restore_delay_ms: u64,
}

impl Default for ClipboardSink {
    fn default() -> Self {
        Self {
            delay_ms: 50,
            restore_delay_ms: 100,
        }
    }
}

impl TextSink for ClipboardSink {
    fn erase(&self, count: usize) -> Result<(), InjectError> {
        press_backspaces(count)
    }

    fn type_text(&self, text: &str) -> Result<(), InjectError> {
        if text.is_empty() {
            return Ok(());
        }
        let saved = save_clipboard()?;
        set_clipboard(text)?;
        std::thread::sleep(Duration::from_millis(self.delay_ms));
        simulate_paste()?;
        std::thread::sleep(Duration::from_millis(self.restore_delay_ms));
        if let Err(e) = restore_clipboard(saved) {
            log::warn!("inject: could not restore clipboard: {e}");
        }
        Ok(())
    }
}

/// Build the sink selected by `config.method`.
pub fn sink_from_config(config: &InjectConfig) -> Arc<dyn TextSink> {
    match config.method {
        InjectMethod::Type => Arc::new(KeyboardSink),
        InjectMethod::Clipboard => Arc::new(ClipboardSink {
            delay_ms: config.clipboard_delay_ms,
            restore_delay_ms: config.restore_delay_ms,
        }),
    }
}

// ---------------------------------------------------------------------------
// RecordingSink (tests)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use mock::{RecordingSink, SinkEvent};


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
