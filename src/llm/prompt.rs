//! Correction request construction and response classification.
//!
//! A [`CorrectionRequest`] is built once per flush from the snapshot text and
//! the `[proofread]` option group read at that moment.  The raw service
//! output is then classified by [`classify_response`].

use crate::config::ProofreadConfig;

/// Reserved reply meaning "this text is not something I can proofread".
pub const INCOMPATIBLE_SENTINEL: &str = "ERROR_TEXT_INCOMPATIBLE";

// ---------------------------------------------------------------------------
// CorrectionRequest
// ---------------------------------------------------------------------------

/// Everything the orchestrator needs to call the service and, later, to
/// replace the typed text.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionRequest {
    /// Text exactly as captured.
    pub original: String,
    /// Number of captured units, i.e. backspaces needed to erase `original`.
    pub erase_len: usize,
    /// System instruction.
    pub instruction: String,
    /// Prefix template followed by `original`.
    pub prompt: String,
}

impl CorrectionRequest {
    /// Build a request for `original` (`erase_len` captured units long).
    ///
    /// ```
    /// use live_proofread::config::ProofreadConfig;
    /// use live_proofread::llm::CorrectionRequest;
    ///
    /// let req = CorrectionRequest::new("helo", 4, &ProofreadConfig::default());
    /// assert_eq!(req.prompt, "Proofread this:\n\nhelo");
    /// ```
    pub fn new(original: &str, erase_len: usize, options: &ProofreadConfig) -> Self {
        let mut prompt = String::with_capacity(options.prefix.len() + original.len());
        prompt.push_str(&options.prefix);
        prompt.push_str(original);

        Self {
            original: original.to_string(),
            erase_len,
            instruction: options.instruction.clone(),
            prompt,
        }
    }
}

// ---------------------------------------------------------------------------
// ResponseVerdict
// ---------------------------------------------------------------------------

/// Why a successful response did not lead to a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The service returned nothing.
    Empty,
    /// The service replied with [`INCOMPATIBLE_SENTINEL`].
    Incompatible,
    /// The trimmed correction equals the original text.
    Unchanged,
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::Empty => "empty response",
            SkipReason::Incompatible => "text incompatible",
            SkipReason::Unchanged => "no changes",
        }
    }
}

/// Outcome of evaluating a service reply against the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseVerdict {
    /// Replace the typed text with this (already trimmed) correction.
    Replace(String),
    /// Leave the typed text alone.
    Skip(SkipReason),
}

/// Classify a successful reply, checking in order: empty, sentinel,
/// unchanged after trimming.
///
/// A whitespace-only reply counts as empty; replacing with it would only
/// erase what the user typed.
pub fn classify_response(original: &str, response: &str) -> ResponseVerdict {
    if response.trim().is_empty() {
        return ResponseVerdict::Skip(SkipReason::Empty);
    }
    if response.contains(INCOMPATIBLE_SENTINEL) {
        return ResponseVerdict::Skip(SkipReason::Incompatible);
    }

    let corrected = response.trim();
    if corrected == original {
        return ResponseVerdict::Skip(SkipReason::Unchanged);
    }

    ResponseVerdict::Replace(corrected.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_prepends_prefix() {
        let options = ProofreadConfig {
            prefix: "Fix: ".into(),
            instruction: "Be brief.".into(),
        };
        let req = CorrectionRequest::new("teh cat", 7, &options);
        assert_eq!(req.prompt, "Fix: teh cat");
        assert_eq!(req.instruction, "Be brief.");
        assert_eq!(req.original, "teh cat");
        assert_eq!(req.erase_len, 7);
    }

    #[test]
    fn empty_response_is_skipped() {
        assert_eq!(
            classify_response("helo", ""),
            ResponseVerdict::Skip(SkipReason::Empty)
        );
    }

    #[test]
    fn sentinel_anywhere_in_response_is_skipped() {
        assert_eq!(
            classify_response("fn main()", "ERROR_TEXT_INCOMPATIBLE"),
            ResponseVerdict::Skip(SkipReason::Incompatible)
        );
        assert_eq!(
            classify_response("x = 1", "Sorry: ERROR_TEXT_INCOMPATIBLE\n"),
            ResponseVerdict::Skip(SkipReason::Incompatible)
        );
    }

    #[test]
    fn identical_after_trim_is_unchanged() {
        assert_eq!(
            classify_response("Hello there", "  Hello there\n"),
            ResponseVerdict::Skip(SkipReason::Unchanged)
        );
    }

    #[test]
    fn original_is_not_trimmed_for_comparison() {
        // Trailing space typed by the user is part of what gets erased.
        assert_eq!(
            classify_response("Hello ", "Hello"),
            ResponseVerdict::Replace("Hello".into())
        );
    }

    #[test]
    fn changed_text_is_replaced_trimmed() {
        assert_eq!(
            classify_response("hello", "Hello\n"),
            ResponseVerdict::Replace("Hello".into())
        );
    }

    #[test]
    fn whitespace_only_response_is_empty() {
        assert_eq!(
            classify_response("hello", " \n "),
            ResponseVerdict::Skip(SkipReason::Empty)
        );
    }
}
