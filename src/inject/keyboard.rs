//! Keyboard simulation helpers backed by the `enigo` crate.
//!
//! A new [`Enigo`] instance is created for each call because `Enigo` is not
//! `Send` and the handle is cheap to construct.
//!
//! | Platform | Paste shortcut |
//! |----------|----------------|
//! | macOS    | ⌘V (Meta + V)  |
//! | Windows  | Ctrl+V         |
//! | Linux    | Ctrl+V         |

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::InjectError;

fn key_err(e: impl std::fmt::Display) -> InjectError {
    InjectError::KeySimulation(e.to_string())
}

fn new_enigo() -> Result<Enigo, InjectError> {
    Enigo::new(&Settings::default()).map_err(key_err)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Send `count` backspace press/release pairs to the focused window.
///
/// # Errors
///
/// Returns [`InjectError::KeySimulation`] on the first event that fails; the
/// preceding backspaces have already been delivered.
pub fn press_backspaces(count: usize) -> Result<(), InjectError> {
    if count == 0 {
        return Ok(());
    }
    let mut enigo = new_enigo()?;
    for _ in 0..count {
        enigo.key(Key::Backspace, Direction::Click).map_err(key_err)?;
    }
    Ok(())
}

/// Type `text` into the focused window as synthetic key events.
///
/// # Errors
///
/// Returns [`InjectError::KeySimulation`] if the backend cannot be
/// initialised or the text cannot be entered.
pub fn type_text(text: &str) -> Result<(), InjectError> {
    if text.is_empty() {
        return Ok(());
    }
    let mut enigo = new_enigo()?;
    enigo.text(text).map_err(key_err)
}

/// Simulate the system paste shortcut in the currently focused window.
///
/// * **macOS** → Meta (⌘) + V
/// * **Windows / Linux** → Ctrl + V
pub fn simulate_paste() -> Result<(), InjectError> {
    let mut enigo = new_enigo()?;

    #[cfg(target_os = "macos")]
    let modifier = Key::Meta;
    #[cfg(not(target_os = "macos"))]
    let modifier = Key::Control;

    enigo.key(modifier, Direction::Press).map_err(key_err)?;
    let clicked = enigo.key(Key::Unicode('v'), Direction::Click).map_err(key_err);
    // Always let go of the modifier, even when the click failed.
    enigo.key(modifier, Direction::Release).map_err(key_err)?;
    clicked
}
