//! Auto-correct mode — keystroke capture, debounce, proofread, replace.
//!
//! # Architecture
//!
//! ```text
//! keyboard listener thread                tokio runtime
//! ────────────────────────                ─────────────
//! rdev key press
//!   └─▶ KeyInput::from_rdev
//!         └─▶ AutoCorrect::on_key ──┐
//!                                   │  Mutex<Session>
//!                                   ├─ buffer push / pop / clear
//!                                   ├─ Debouncer cancel + reschedule ──▶ sleep(pause)
//!                                   │                                      └─▶ fire(gen)
//!                                   └─ commit: drain ─┐                          │
//!                                                     ▼                          ▼
//!                                          mpsc<FlushJob> ◀──── drain ◀── gen current?
//!                                                     │
//!                                                     ▼
//!                                          CorrectionWorker::run
//!                                            ├─ Proofreader::proofread
//!                                            └─ spawn_blocking(TextSink)
//!                                                 under ReplacementGuard
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use live_proofread::autocorrect::{start, AutocorrectOptions, KeyInput};
//! use live_proofread::config::{new_shared_config, AppConfig};
//! use live_proofread::inject::KeyboardSink;
//! use live_proofread::llm::ApiProofreader;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let options = AutocorrectOptions::from_config(&config);
//!     let proofreader = Arc::new(ApiProofreader::from_config(&config.llm));
//!     let shared = new_shared_config(config);
//!
//!     let (autocorrect, mut events) = start(
//!         &options,
//!         shared,
//!         proofreader,
//!         Arc::new(KeyboardSink),
//!         &tokio::runtime::Handle::current(),
//!     );
//!
//!     autocorrect.toggle();
//!     autocorrect.on_key(KeyInput::Char('h'));
//!     autocorrect.on_key(KeyInput::Char('i'));
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//! }
//! ```

pub mod buffer;
pub mod controller;
pub mod debounce;
pub mod input;
pub mod runner;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::config::{AppConfig, SharedConfig};
use crate::inject::TextSink;
use crate::llm::{Proofreader, SkipReason};

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use buffer::{BufferSnapshot, CorrectionBuffer};
pub use controller::{AutoCorrect, ReplacementGuard, StatusSnapshot, WeakAutoCorrect};
pub use debounce::Debouncer;
pub use input::KeyInput;
pub use runner::CorrectionWorker;
pub use state::{FlushJob, Phase, Session};

// ---------------------------------------------------------------------------
// AutocorrectEvent
// ---------------------------------------------------------------------------

/// Notifications delivered to the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocorrectEvent {
    /// The mode was switched on or off.
    Toggled { enabled: bool },
    /// A buffer was drained and queued for proofreading.
    Flushed { text: String },
    /// The typed text was replaced.
    Corrected { original: String, corrected: String },
    /// The service answered but no replacement was needed.
    Skipped { original: String, reason: SkipReason },
    /// A correction arrived after the mode was toggled and was dropped.
    Discarded { original: String },
    /// The service call or the synthetic output failed.
    Failed { original: String, message: String },
}

// ---------------------------------------------------------------------------
// AutocorrectOptions
// ---------------------------------------------------------------------------

/// Fixed parameters of one controller instance.
#[derive(Debug, Clone)]
pub struct AutocorrectOptions {
    /// Quiet period before a scheduled flush fires.
    pub pause_delay: Duration,
    /// Buffer length at which a flush is scheduled / commit flushes.
    pub min_buffer_len: usize,
    /// Input stays suspended this long after a replacement finishes.
    pub settle_delay: Duration,
}

impl Default for AutocorrectOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl AutocorrectOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            pause_delay: Duration::from_millis(config.autocorrect.pause_delay_ms),
            min_buffer_len: config.autocorrect.min_buffer_len.max(1),
            settle_delay: Duration::from_millis(config.inject.settle_delay_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// start
// ---------------------------------------------------------------------------

/// Build a disabled [`AutoCorrect`] and spawn its [`CorrectionWorker`] on
/// `runtime`.
///
/// Returns the controller handle and the host event stream.  The worker
/// stops once every clone of the handle has been dropped.
pub fn start(
    options: &AutocorrectOptions,
    config: SharedConfig,
    proofreader: Arc<dyn Proofreader>,
    sink: Arc<dyn TextSink>,
    runtime: &Handle,
) -> (AutoCorrect, mpsc::UnboundedReceiver<AutocorrectEvent>) {
    let (job_tx, job_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let controller = AutoCorrect::new(options, runtime.clone(), job_tx, event_tx);
    let worker = CorrectionWorker::new(
        &controller,
        proofreader,
        sink,
        config,
        options.settle_delay,
    );
    runtime.spawn(worker.run(job_rx));

    (controller, event_rx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
