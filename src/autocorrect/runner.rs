//! Correction worker — proofread each flushed buffer and replace the text.
//!
//! [`CorrectionWorker`] drains [`FlushJob`]s from an unbounded channel one
//! at a time, so corrections are applied strictly in flush order and two
//! replacements never interleave their synthetic keystrokes.
//!
//! # Per-job flow
//!
//! ```text
//! FlushJob
//!   └─▶ read [proofread] options, build CorrectionRequest
//!         └─▶ proofreader.proofread (async, no caller-side timeout)
//!               ├─ Err           → Failed       (logged at error)
//!               ├─ empty         → Skipped
//!               ├─ sentinel      → Skipped
//!               ├─ unchanged     → Skipped
//!               └─ changed       → begin_replacement(session)
//!                     ├─ refused → Discarded    (mode toggled meanwhile)
//!                     └─ spawn_blocking: erase N, type correction, settle
//!                           ├─ Ok  → Corrected
//!                           └─ Err → Failed     (guard still released)
//! ```
//!
//! The keyboard thread never waits on any of this: by the time a job is
//! queued its text is already out of the buffer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::{proofread_snapshot, SharedConfig};
use crate::inject::TextSink;
use crate::llm::{classify_response, CorrectionRequest, Proofreader, ResponseVerdict};

use super::controller::{AutoCorrect, WeakAutoCorrect};
use super::state::FlushJob;
use super::AutocorrectEvent;

pub struct CorrectionWorker {
    controller: WeakAutoCorrect,
    proofreader: Arc<dyn Proofreader>,
    sink: Arc<dyn TextSink>,
    config: SharedConfig,
    settle_delay: Duration,
}

impl CorrectionWorker {
    /// * `controller`   — the state machine whose flushes this worker serves.
    /// * `proofreader`  — external proofreading service.
    /// * `sink`         — where backspaces and corrected text are sent.
    /// * `config`       — live config; `[proofread]` is re-read per job.
    /// * `settle_delay` — input stays suspended this long after the last
    ///   synthetic event.
    pub fn new(
        controller: &AutoCorrect,
        proofreader: Arc<dyn Proofreader>,
        sink: Arc<dyn TextSink>,
        config: SharedConfig,
        settle_delay: Duration,
    ) -> Self {
        Self {
            controller: controller.downgrade(),
            proofreader,
            sink,
            config,
            settle_delay,
        }
    }

    /// Process jobs until the controller is dropped.
    pub async fn run(self, mut jobs: mpsc::UnboundedReceiver<FlushJob>) {
        while let Some(job) = jobs.recv().await {
            let Some(controller) = self.controller.upgrade() else {
                break;
            };
            self.process(&controller, job).await;
        }
        log::info!("autocorrect: job channel closed, correction worker shutting down");
    }

    async fn process(&self, controller: &AutoCorrect, job: FlushJob) {
        let options = proofread_snapshot(&self.config);
        let request = CorrectionRequest::new(&job.snapshot.text, job.snapshot.len, &options);

        let reply = match self
            .proofreader
            .proofread(&request.instruction, &request.prompt)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("autocorrect: proofreading failed: {e}");
                controller.emit(AutocorrectEvent::Failed {
                    original: request.original,
                    message: e.to_string(),
                });
                return;
            }
        };

        match classify_response(&request.original, &reply) {
            ResponseVerdict::Skip(reason) => {
                log::debug!("autocorrect: no replacement ({})", reason.label());
                controller.emit(AutocorrectEvent::Skipped {
                    original: request.original,
                    reason,
                });
            }
            ResponseVerdict::Replace(corrected) => {
                self.replace(controller, job.session_id, request, corrected).await;
            }
        }
    }

    async fn replace(
        &self,
        controller: &AutoCorrect,
        session_id: u64,
        request: CorrectionRequest,
        corrected: String,
    ) {
        // Re-check the mode right before touching the user's window.
        let Some(guard) = controller.begin_replacement(session_id) else {
            log::debug!("autocorrect: mode changed during proofreading, dropping correction");
            controller.emit(AutocorrectEvent::Discarded {
                original: request.original,
            });
            return;
        };

        log::debug!("autocorrect: {:?} -> {:?}", request.original, corrected);

        let sink = Arc::clone(&self.sink);
        let settle = self.settle_delay;
        let erase_len = request.erase_len;
        let text = corrected.clone();

        let result = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let sent = sink.erase(erase_len).and_then(|()| sink.type_text(&text));
            if !settle.is_zero() {
                std::thread::sleep(settle);
            }
            sent
        })
        .await;

        let failure = match result {
            Ok(Ok(())) => {
                controller.emit(AutocorrectEvent::Corrected {
                    original: request.original,
                    corrected,
                });
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(e) => format!("replacement task panicked: {e}"),
        };

        log::error!("autocorrect: replacement failed: {failure}");
        controller.emit(AutocorrectEvent::Failed {
            original: request.original,
            message: failure,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Mutex, OnceLock};

    use async_trait::async_trait;
    use tokio::runtime::Handle;
    use tokio::sync::Notify;

    use super::*;
    use crate::autocorrect::{start, AutocorrectOptions, KeyInput, Phase};
    use crate::config::{new_shared_config, AppConfig};
    use crate::inject::{RecordingSink, SinkEvent};
    use crate::llm::{LlmError, SkipReason};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Replies from a queue; optionally waits on a gate before answering.
    #[derive(Default)]
    struct ScriptedProofreader {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedProofreader {
        fn replying(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Self::default()
            }
        }

        fn gated(reply: &str, gate: Arc<Notify>) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from([Ok(reply.to_string())])),
                gate: Some(gate),
                ..Self::default()
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Proofreader for ScriptedProofreader {
        async fn proofread(&self, _instruction: &str, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyResponse))
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    struct Rig {
        ac: AutoCorrect,
        events: mpsc::UnboundedReceiver<AutocorrectEvent>,
        sink: Arc<RecordingSink>,
        proofreader: Arc<ScriptedProofreader>,
        config: SharedConfig,
    }

    fn rig_with(proofreader: ScriptedProofreader, sink: RecordingSink) -> Rig {
        let options = AutocorrectOptions {
            pause_delay: Duration::from_secs(60),
            min_buffer_len: 2,
            settle_delay: Duration::ZERO,
        };
        let config = new_shared_config(AppConfig::default());
        let proofreader = Arc::new(proofreader);
        let sink = Arc::new(sink);
        let (ac, mut events) = start(
            &options,
            config.clone(),
            proofreader.clone(),
            sink.clone(),
            &Handle::current(),
        );
        ac.toggle();
        let _ = events.try_recv();
        Rig {
            ac,
            events,
            sink,
            proofreader,
            config,
        }
    }

    fn rig(replies: Vec<Result<String, LlmError>>) -> Rig {
        rig_with(ScriptedProofreader::replying(replies), RecordingSink::new())
    }

    fn type_str(ac: &AutoCorrect, text: &str) {
        for c in text.chars() {
            ac.on_key(if c == ' ' {
                KeyInput::Space
            } else {
                KeyInput::Char(c)
            });
        }
    }

    /// Next event that is not a `Flushed` notification.
    async fn outcome(events: &mut mpsc::UnboundedReceiver<AutocorrectEvent>) -> AutocorrectEvent {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
                .await
                .expect("timed out waiting for an event")
                .expect("event channel closed");
            if !matches!(event, AutocorrectEvent::Flushed { .. }) {
                return event;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn hello_is_erased_and_retyped() {
        let mut r = rig(vec![Ok("Hello".into())]);
        type_str(&r.ac, "hello");
        assert!(r.ac.flush());

        let event = outcome(&mut r.events).await;
        assert_eq!(
            event,
            AutocorrectEvent::Corrected {
                original: "hello".into(),
                corrected: "Hello".into(),
            }
        );
        assert_eq!(
            r.sink.events(),
            vec![SinkEvent::Erase(5), SinkEvent::Type("Hello".into())]
        );
        let st = r.ac.status();
        assert_eq!(st.phase, Phase::Idle);
        assert_eq!(st.replacements, 1);
    }

    #[tokio::test]
    async fn identical_correction_emits_nothing() {
        let mut r = rig(vec![Ok("  Fine text.\n".into())]);
        type_str(&r.ac, "Fine text.");
        r.ac.flush();

        assert_eq!(
            outcome(&mut r.events).await,
            AutocorrectEvent::Skipped {
                original: "Fine text.".into(),
                reason: SkipReason::Unchanged,
            }
        );
        assert!(r.sink.events().is_empty());
        assert_eq!(r.ac.status().replacements, 0);
    }

    #[tokio::test]
    async fn sentinel_never_sets_guard() {
        let mut r = rig(vec![Ok("ERROR_TEXT_INCOMPATIBLE".into())]);
        type_str(&r.ac, "x=1;y");
        r.ac.flush();

        assert!(matches!(
            outcome(&mut r.events).await,
            AutocorrectEvent::Skipped {
                reason: SkipReason::Incompatible,
                ..
            }
        ));
        assert!(r.sink.events().is_empty());
        let st = r.ac.status();
        assert_eq!(st.buffered, "");
        assert_eq!(st.replacements, 0);
        assert_eq!(st.phase, Phase::Idle);
    }

    #[tokio::test]
    async fn transport_failure_keeps_mode_running() {
        let mut r = rig(vec![
            Err(LlmError::Request("connection refused".into())),
            Ok("Second try".into()),
        ]);
        type_str(&r.ac, "first try");
        r.ac.flush();
        assert!(matches!(
            outcome(&mut r.events).await,
            AutocorrectEvent::Failed { .. }
        ));
        assert!(r.sink.events().is_empty());
        assert!(r.ac.is_enabled());

        type_str(&r.ac, "second try");
        r.ac.flush();
        assert!(matches!(
            outcome(&mut r.events).await,
            AutocorrectEvent::Corrected { .. }
        ));
    }

    #[tokio::test]
    async fn emission_failure_releases_guard() {
        let mut r = rig_with(
            ScriptedProofreader::replying(vec![Ok("Typo".into())]),
            RecordingSink::failing(),
        );
        type_str(&r.ac, "tpyo");
        r.ac.flush();

        assert!(matches!(
            outcome(&mut r.events).await,
            AutocorrectEvent::Failed { .. }
        ));
        let st = r.ac.status();
        assert_eq!(st.phase, Phase::Idle);
        assert!(st.enabled);

        type_str(&r.ac, "ok");
        assert_eq!(r.ac.status().buffered, "ok");
    }

    #[tokio::test]
    async fn toggle_off_during_proofreading_discards_result() {
        let gate = Arc::new(Notify::new());
        let mut r = rig_with(
            ScriptedProofreader::gated("Late", gate.clone()),
            RecordingSink::new(),
        );
        type_str(&r.ac, "late");
        r.ac.flush();
        r.ac.toggle();
        gate.notify_one();

        assert!(matches!(
            outcome(&mut r.events).await,
            AutocorrectEvent::Toggled { enabled: false }
        ));
        assert_eq!(
            outcome(&mut r.events).await,
            AutocorrectEvent::Discarded {
                original: "late".into()
            }
        );
        assert!(r.sink.events().is_empty());
    }

    #[tokio::test]
    async fn typing_during_proofreading_starts_next_buffer() {
        let gate = Arc::new(Notify::new());
        let mut r = rig_with(
            ScriptedProofreader::gated("Helo.", gate.clone()),
            RecordingSink::new(),
        );
        type_str(&r.ac, "helo");
        r.ac.flush();
        type_str(&r.ac, " wor");

        // Let the worker reach the gate before checking what it was sent.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(r.proofreader.prompts(), vec!["Proofread this:\n\nhelo"]);
        assert_eq!(r.ac.status().buffered, " wor");

        gate.notify_one();
        assert!(matches!(
            outcome(&mut r.events).await,
            AutocorrectEvent::Corrected { .. }
        ));
        assert_eq!(r.sink.events()[0], SinkEvent::Erase(4));
    }

    #[tokio::test]
    async fn echoed_keys_are_ignored_while_replacing() {
        let slot: Arc<OnceLock<AutoCorrect>> = Arc::new(OnceLock::new());
        let echo = slot.clone();
        let sink = RecordingSink::with_hook(move || {
            if let Some(ac) = echo.get() {
                ac.on_key(KeyInput::Char('z'));
            }
        });
        let mut r = rig_with(ScriptedProofreader::replying(vec![Ok("Good".into())]), sink);
        let _ = slot.set(r.ac.clone());

        type_str(&r.ac, "god");
        r.ac.flush();
        assert!(matches!(
            outcome(&mut r.events).await,
            AutocorrectEvent::Corrected { .. }
        ));
        assert_eq!(r.ac.status().buffered, "");
    }

    #[tokio::test]
    async fn prompt_uses_current_config() {
        let mut r = rig(vec![Ok("A b".into()), Ok("C d".into())]);
        type_str(&r.ac, "a b");
        r.ac.flush();
        outcome(&mut r.events).await;

        r.config.write().unwrap().proofread.prefix = "Fix: ".into();
        type_str(&r.ac, "c d");
        r.ac.flush();
        outcome(&mut r.events).await;

        assert_eq!(
            r.proofreader.prompts(),
            vec!["Proofread this:\n\na b".to_string(), "Fix: c d".to_string()]
        );
    }

    #[tokio::test]
    async fn commit_key_runs_full_correction() {
        let mut r = rig(vec![Ok("Hi there.".into())]);
        type_str(&r.ac, "hi there");
        r.ac.on_key(KeyInput::Commit);

        assert!(matches!(
            outcome(&mut r.events).await,
            AutocorrectEvent::Corrected { .. }
        ));
        assert_eq!(
            r.sink.events(),
            vec![SinkEvent::Erase(8), SinkEvent::Type("Hi there.".into())]
        );
    }
}
