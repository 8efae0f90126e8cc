//! Configuration module for live-proofread.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for the cross-platform config directory, and TOML persistence
//! via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    new_shared_config, proofread_snapshot, AppConfig, AutocorrectConfig, HotkeyConfig,
    InjectConfig, InjectMethod, LlmConfig, LlmProvider, ProofreadConfig, SharedConfig,
    DEFAULT_PROOFREAD_INSTRUCTION, DEFAULT_PROOFREAD_PREFIX,
};
