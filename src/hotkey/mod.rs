//! Global keyboard capture, backed by `rdev`.
//!
//! # Design
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive.  It must run on a **dedicated OS thread**; it cannot be
//! used inside a tokio task.
//!
//! [`KeyboardListener::start`] spawns that thread and feeds every key press
//! into an [`AutoCorrect`](crate::autocorrect::AutoCorrect) controller.  The
//! configured toggle key switches the mode on and off.
//!
//! # Usage
//!
//! ```no_run
//! use live_proofread::autocorrect::AutoCorrect;
//! use live_proofread::hotkey::{parse_key, KeyboardListener};
//!
//! # fn controller() -> AutoCorrect { unimplemented!() }
//! let key = parse_key("F8").expect("unknown key");
//! let _listener = KeyboardListener::start(controller(), key).expect("listener thread");
//! ```

pub mod listener;

pub use listener::KeyboardListener;

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

/// Keys that can serve as the toggle hotkey, with their config names.
///
/// Only keys that never produce text or move the cursor are listed, so the
/// toggle key cannot collide with what the user types.
const TOGGLE_KEYS: &[(&str, rdev::Key)] = &[
    ("F1", rdev::Key::F1),
    ("F2", rdev::Key::F2),
    ("F3", rdev::Key::F3),
    ("F4", rdev::Key::F4),
    ("F5", rdev::Key::F5),
    ("F6", rdev::Key::F6),
    ("F7", rdev::Key::F7),
    ("F8", rdev::Key::F8),
    ("F9", rdev::Key::F9),
    ("F10", rdev::Key::F10),
    ("F11", rdev::Key::F11),
    ("F12", rdev::Key::F12),
    ("ScrollLock", rdev::Key::ScrollLock),
    ("Pause", rdev::Key::Pause),
    ("PrintScreen", rdev::Key::PrintScreen),
    ("Insert", rdev::Key::Insert),
];

/// Parse a toggle-key name from a config string into an [`rdev::Key`].
///
/// Matching ignores ASCII case.  Returns `None` for unknown names and for
/// keys that type text (letters, space, enter …).
///
/// ```
/// use live_proofread::hotkey::parse_key;
///
/// assert_eq!(parse_key("F8"), Some(rdev::Key::F8));
/// assert_eq!(parse_key("scrolllock"), Some(rdev::Key::ScrollLock));
/// assert_eq!(parse_key("a"), None);
/// ```
pub fn parse_key(key_str: &str) -> Option<rdev::Key> {
    let wanted = key_str.trim();
    TOGGLE_KEYS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|&(_, key)| key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_function_keys() {
        assert_eq!(parse_key("F1"), Some(rdev::Key::F1));
        assert_eq!(parse_key("f8"), Some(rdev::Key::F8));
        assert_eq!(parse_key(" F12 "), Some(rdev::Key::F12));
    }

    #[test]
    fn parse_special_keys() {
        assert_eq!(parse_key("Pause"), Some(rdev::Key::Pause));
        assert_eq!(parse_key("INSERT"), Some(rdev::Key::Insert));
    }

    #[test]
    fn typing_keys_are_rejected() {
        for name in ["a", "Z", "Space", "Enter", "Backspace", "Tab"] {
            assert_eq!(parse_key(name), None, "{name}");
        }
    }

    #[test]
    fn parse_unknown_key_returns_none() {
        assert_eq!(parse_key("xyz"), None);
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("Ctrl+F8"), None);
    }
}
