//! live-proofread — system-wide auto-correct while you type.
//!
//! Keystrokes are captured into a provisional buffer; after a pause in
//! typing (or on Enter) the buffer is sent to an OpenAI-compatible
//! proofreading service and the typed text is replaced with the correction.
//!
//! * [`autocorrect`] — capture state machine, debounce, correction worker.
//! * [`hotkey`] — global keyboard listener and toggle hotkey.
//! * [`llm`] — proofreading service client and response classification.
//! * [`inject`] — synthetic backspaces and text output.
//! * [`config`] — TOML settings.

pub mod autocorrect;
pub mod config;
pub mod hotkey;
pub mod inject;
pub mod llm;
