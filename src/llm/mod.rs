//! Proofreading service client for live-proofread.
//!
//! This module provides:
//! * [`Proofreader`] — async trait implemented by all proofreading backends.
//! * [`ApiProofreader`] — OpenAI-compatible REST API backend.
//! * [`CorrectionRequest`] — prefix + captured text, built once per flush.
//! * [`classify_response`] — empty / sentinel / unchanged / replace verdict.
//! * [`LlmError`] — error variants for service calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use live_proofread::config::AppConfig;
//! use live_proofread::llm::{
//!     classify_response, ApiProofreader, CorrectionRequest, Proofreader, ResponseVerdict,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let proofreader = ApiProofreader::from_config(&config.llm);
//!
//!     let req = CorrectionRequest::new("teh cat", 7, &config.proofread);
//!     let reply = proofreader.proofread(&req.instruction, &req.prompt).await.unwrap();
//!
//!     if let ResponseVerdict::Replace(text) = classify_response(&req.original, &reply) {
//!         println!("{text}");
//!     }
//! }
//! ```

pub mod prompt;
pub mod proofreader;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use prompt::{
    classify_response, CorrectionRequest, ResponseVerdict, SkipReason, INCOMPATIBLE_SENTINEL,
};
pub use proofreader::{ApiProofreader, LlmError, Proofreader};
