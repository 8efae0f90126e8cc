//! Clipboard save / restore helpers backed by the `arboard` crate.
//!
//! Each function opens a short-lived [`arboard::Clipboard`] handle rather
//! than sharing one, because `arboard::Clipboard` is not `Send` on all
//! platforms.

use arboard::Clipboard;

use super::InjectError;

/// Capture the current clipboard plain-text content.
///
/// Returns `Ok(None)` when the clipboard is empty or holds non-text data.
pub fn save_clipboard() -> Result<Option<String>, InjectError> {
    let mut clipboard = open_clipboard()?;
    Ok(clipboard.get_text().ok())
}

/// Write `text` into the system clipboard.
pub fn set_clipboard(text: &str) -> Result<(), InjectError> {
    let mut clipboard = open_clipboard()?;
    clipboard
        .set_text(text)
        .map_err(|e| InjectError::ClipboardSet(e.to_string()))
}

/// Put a previously saved value back; `None` leaves the clipboard alone.
pub fn restore_clipboard(saved: Option<String>) -> Result<(), InjectError> {
    match saved {
        Some(text) => set_clipboard(&text),
        None => Ok(()),
    }
}

fn open_clipboard() -> Result<Clipboard, InjectError> {
    Clipboard::new().map_err(|e| InjectError::ClipboardAccess(e.to_string()))
}
