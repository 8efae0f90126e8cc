//! Key event classification.
//!
//! Maps a raw `rdev` key press to one of the five buffer operations the
//! controller understands.  Character keys are recognised by the text the OS
//! reports for the press (`rdev::Event::name`), so layout and shift state are
//! already applied.

/// Buffer operation derived from a single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character, appended.
    Char(char),
    /// Space bar, appends `' '`.
    Space,
    /// Removes the last captured unit.
    Backspace,
    /// Enter: flushes immediately when enough text is buffered.
    Commit,
    /// Anything else (navigation, tab, modifiers, function keys …) —
    /// the cursor may have moved, so the buffer is discarded.
    Other,
}

impl KeyInput {
    /// Classify a key press.
    ///
    /// `name` is the text produced by the press, if any.
    ///
    /// ```
    /// use live_proofread::autocorrect::KeyInput;
    ///
    /// assert_eq!(KeyInput::from_rdev(rdev::Key::KeyA, Some("A")), KeyInput::Char('A'));
    /// assert_eq!(KeyInput::from_rdev(rdev::Key::Return, Some("\r")), KeyInput::Commit);
    /// assert_eq!(KeyInput::from_rdev(rdev::Key::LeftArrow, None), KeyInput::Other);
    /// ```
    pub fn from_rdev(key: rdev::Key, name: Option<&str>) -> Self {
        match key {
            rdev::Key::Space => return KeyInput::Space,
            rdev::Key::Backspace => return KeyInput::Backspace,
            rdev::Key::Return | rdev::Key::KpReturn => return KeyInput::Commit,
            _ => {}
        }

        name.and_then(single_printable)
            .map(KeyInput::Char)
            .unwrap_or(KeyInput::Other)
    }
}

/// The only character of `s`, if `s` is exactly one non-control character.
fn single_printable(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rdev::Key;

    #[test]
    fn letters_digits_and_punctuation_are_chars() {
        assert_eq!(KeyInput::from_rdev(Key::KeyH, Some("h")), KeyInput::Char('h'));
        assert_eq!(KeyInput::from_rdev(Key::Num1, Some("!")), KeyInput::Char('!'));
        assert_eq!(KeyInput::from_rdev(Key::Dot, Some(".")), KeyInput::Char('.'));
        assert_eq!(KeyInput::from_rdev(Key::KeyE, Some("é")), KeyInput::Char('é'));
    }

    #[test]
    fn named_control_keys() {
        assert_eq!(KeyInput::from_rdev(Key::Space, Some(" ")), KeyInput::Space);
        assert_eq!(KeyInput::from_rdev(Key::Backspace, None), KeyInput::Backspace);
        assert_eq!(KeyInput::from_rdev(Key::Return, None), KeyInput::Commit);
        assert_eq!(KeyInput::from_rdev(Key::KpReturn, None), KeyInput::Commit);
    }

    #[test]
    fn navigation_and_modifiers_are_other() {
        for key in [
            Key::UpArrow,
            Key::Home,
            Key::ShiftLeft,
            Key::ControlLeft,
            Key::F5,
            Key::Escape,
        ] {
            assert_eq!(KeyInput::from_rdev(key, None), KeyInput::Other, "{key:?}");
        }
    }

    #[test]
    fn control_text_and_multi_char_names_are_other() {
        assert_eq!(KeyInput::from_rdev(Key::Tab, Some("\t")), KeyInput::Other);
        assert_eq!(KeyInput::from_rdev(Key::KeyC, Some("\u{3}")), KeyInput::Other);
        assert_eq!(KeyInput::from_rdev(Key::KeyA, Some("ab")), KeyInput::Other);
        assert_eq!(KeyInput::from_rdev(Key::KeyA, Some("")), KeyInput::Other);
    }
}
