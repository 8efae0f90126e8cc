//! Provisional text captured since the last flush.
//!
//! One unit per accepted key press: a printable character or a space.
//! Backspace pops the last unit; a flush takes everything at once.
//!
//! # Example
//!
//! ```rust
//! use live_proofread::autocorrect::CorrectionBuffer;
//!
//! let mut buf = CorrectionBuffer::new();
//! buf.push('h');
//! buf.push('i');
//! buf.pop();
//! buf.push('e');
//! let snap = buf.take();
//! assert_eq!(snap.text, "he");
//! assert_eq!(snap.len, 2);
//! assert!(buf.is_empty());
//! ```

/// Text and unit count taken out of a [`CorrectionBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSnapshot {
    /// Concatenation of the captured units in order.
    pub text: String,
    /// Number of units, i.e. the backspaces needed to erase `text`.
    pub len: usize,
}

/// Ordered sequence of captured characters.
#[derive(Debug, Clone, Default)]
pub struct CorrectionBuffer {
    units: Vec<char>,
}

impl CorrectionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one unit.
    pub fn push(&mut self, unit: char) {
        self.units.push(unit);
    }

    /// Remove the last unit.  Returns `None` (and does nothing) when empty.
    pub fn pop(&mut self) -> Option<char> {
        self.units.pop()
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Current contents as a string, leaving the buffer untouched.
    pub fn text(&self) -> String {
        self.units.iter().collect()
    }

    /// Move the contents out and reset the buffer.
    ///
    /// After this call `len() == 0`; whatever is pushed next starts a new
    /// buffer lifetime.
    pub fn take(&mut self) -> BufferSnapshot {
        let units = std::mem::take(&mut self.units);
        BufferSnapshot {
            len: units.len(),
            text: units.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
