//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// AutocorrectConfig
// ---------------------------------------------------------------------------

/// Timing and threshold settings for keystroke capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocorrectConfig {
    /// Quiet period in milliseconds after the last keystroke before the
    /// buffer is flushed for proofreading.
    pub pause_delay_ms: u64,
    /// Minimum number of buffered characters before a flush is scheduled.
    pub min_buffer_len: usize,
    /// Whether auto-correct mode is switched on at startup.
    pub start_enabled: bool,
}

impl Default for AutocorrectConfig {
    fn default() -> Self {
        Self {
            pause_delay_ms: 2_000,
            min_buffer_len: 2,
            start_enabled: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ProofreadConfig
// ---------------------------------------------------------------------------

/// Default text placed before the captured text in every request.
pub const DEFAULT_PROOFREAD_PREFIX: &str = "Proofread this:\n\n";

/// Default instruction sent as the system message.
pub const DEFAULT_PROOFREAD_INSTRUCTION: &str = "\
You are a grammar proofreading assistant.
Correct spelling, grammar, capitalisation and punctuation in the text.
Keep the original meaning, tone and language.
Reply with ONLY the corrected text. No quotes, no explanation.
If the text is not natural language that can be proofread, reply with exactly ERROR_TEXT_INCOMPATIBLE.";

/// The "Proofread" option group: how each correction request is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofreadConfig {
    /// Placed directly before the captured text in the user message.
    pub prefix: String,
    /// System instruction for the proofreading model.
    pub instruction: String,
}

impl Default for ProofreadConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PROOFREAD_PREFIX.into(),
            instruction: DEFAULT_PROOFREAD_INSTRUCTION.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// LlmProvider
// ---------------------------------------------------------------------------

/// Selects which LLM backend handles proofreading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LlmProvider {
    /// Ollama running locally (OpenAI mode); no authentication required.
    Ollama,
    /// Any OpenAI-compatible REST API (OpenAI, Groq, Together.ai, LM Studio …).
    OpenAiCompatible,
    /// Proofreading disabled: every request fails with `LlmError::Disabled`.
    Disabled,
}

impl Default for LlmProvider {
    fn default() -> Self {
        Self::Ollama
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Connection settings for the proofreading service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Whether proofreading requests are sent at all.
    pub enabled: bool,
    /// Which backend to use.
    pub provider: LlmProvider,
    /// Base URL of the API endpoint.
    ///
    /// - Ollama default: `http://localhost:11434`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key; `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"qwen2.5:3b"`, `"gpt-4o-mini"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).  Lower = more deterministic.
    pub temperature: f32,
    /// Transport timeout in seconds for a single request.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: LlmProvider::default(),
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "qwen2.5:3b".into(),
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Key that switches auto-correct mode on and off (e.g. `"F8"`).
    pub toggle_key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle_key: "F8".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// InjectConfig
// ---------------------------------------------------------------------------

/// How corrected text is written back into the focused window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InjectMethod {
    /// Type the corrected text as synthetic key events.
    Type,
    /// Paste the corrected text through the clipboard.
    Clipboard,
}

impl Default for InjectMethod {
    fn default() -> Self {
        Self::Type
    }
}

/// Text injection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectConfig {
    /// Typing or clipboard paste for the corrected text.  Erasing always
    /// uses synthetic backspaces.
    pub method: InjectMethod,
    /// Milliseconds to keep ignoring keyboard input after the last synthetic
    /// key event, so echoed events are not captured as user input.
    pub settle_delay_ms: u64,
    /// Milliseconds to wait after setting the clipboard before pasting.
    pub clipboard_delay_ms: u64,
    /// Milliseconds to wait after pasting before restoring the clipboard.
    pub restore_delay_ms: u64,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            method: InjectMethod::default(),
            settle_delay_ms: 50,
            clipboard_delay_ms: 50,
            restore_delay_ms: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use live_proofread::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Keystroke capture and debounce settings.
    pub autocorrect: AutocorrectConfig,
    /// Request template for each correction.
    pub proofread: ProofreadConfig,
    /// Proofreading service connection.
    pub llm: LlmConfig,
    /// Global hotkey bindings.
    pub hotkey: HotkeyConfig,
    /// Text injection settings.
    pub inject: InjectConfig,
}

impl AppConfig {
    /// Read `<config>/live-proofread/settings.toml`, or defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Read settings from `path`.  A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", path.display()))
            }
        };
        toml::from_str(&content).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Write `<config>/live-proofread/settings.toml`.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Write settings to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(self).context("cannot serialize settings")?;
        std::fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// SharedConfig
// ---------------------------------------------------------------------------

/// Live configuration shared between the host and the correction worker.
///
/// The worker takes a fresh [`ProofreadConfig`] snapshot for every flush, so
/// edits made by the host apply to the next correction.
pub type SharedConfig = Arc<RwLock<AppConfig>>;

/// Wrap `config` in a [`SharedConfig`].
pub fn new_shared_config(config: AppConfig) -> SharedConfig {
    Arc::new(RwLock::new(config))
}

/// Clone the current `[proofread]` group out of `config`.
pub fn proofread_snapshot(config: &SharedConfig) -> ProofreadConfig {
    config
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .proofread
        .clone()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(
            config.autocorrect.pause_delay_ms,
            default.autocorrect.pause_delay_ms
        );
        assert_eq!(config.proofread.prefix, default.proofread.prefix);
        assert_eq!(config.llm.model, default.llm.model);
        assert_eq!(config.hotkey.toggle_key, default.hotkey.toggle_key);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.autocorrect.pause_delay_ms, 2_000);
        assert_eq!(cfg.autocorrect.min_buffer_len, 2);
        assert!(!cfg.autocorrect.start_enabled);
        assert_eq!(cfg.proofread.prefix, "Proofread this:\n\n");
        assert!(cfg.proofread.instruction.contains("ERROR_TEXT_INCOMPATIBLE"));
        assert_eq!(cfg.llm.base_url, "http://localhost:11434");
        assert!(cfg.llm.api_key.is_none());
        assert_eq!(cfg.hotkey.toggle_key, "F8");
        assert_eq!(cfg.inject.method, InjectMethod::Type);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.autocorrect.pause_delay_ms = 1_500;
        cfg.autocorrect.start_enabled = true;
        cfg.proofread.prefix = "Fix: ".into();
        cfg.llm.api_key = Some("sk-test".into());
        cfg.llm.provider = LlmProvider::OpenAiCompatible;
        cfg.hotkey.toggle_key = "F10".into();
        cfg.inject.method = InjectMethod::Clipboard;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.autocorrect.pause_delay_ms, 1_500);
        assert!(loaded.autocorrect.start_enabled);
        assert_eq!(loaded.proofread.prefix, "Fix: ");
        assert_eq!(loaded.llm.api_key, Some("sk-test".into()));
        assert_eq!(loaded.llm.provider, LlmProvider::OpenAiCompatible);
        assert_eq!(loaded.hotkey.toggle_key, "F10");
        assert_eq!(loaded.inject.method, InjectMethod::Clipboard);
    }

    /// A file that only sets one group keeps defaults everywhere else.
    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[proofread]\nprefix = \"Check: \"\n").unwrap();

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(loaded.proofread.prefix, "Check: ");
        assert_eq!(loaded.proofread.instruction, DEFAULT_PROOFREAD_INSTRUCTION);
        assert_eq!(loaded.autocorrect.min_buffer_len, 2);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[autocorrect]\npause_delay_ms = \"soon\"\n").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn proofread_snapshot_sees_live_edits() {
        let shared = new_shared_config(AppConfig::default());
        shared.write().unwrap().proofread.prefix = "Edited: ".into();
        assert_eq!(proofread_snapshot(&shared).prefix, "Edited: ");
    }
}
