//! Edit events and the results produced for them.

use std::fmt;

/// A single edit applied to a field.
///
/// The caret position is supplied alongside the event. Paste content is
/// merged into the field value by the caller before the event is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditEvent {
    /// One character typed at the caret.
    Keystroke(char),
    /// The character before the caret was deleted.
    Backspace,
    /// Content was pasted; the full value is re-checked.
    Paste,
    /// The field lost focus; the full value is re-checked.
    Blur,
}

impl EditEvent {
    /// Returns true for events that finalize the value (paste and blur).
    ///
    /// Terminal events trim trailing partial input and enforce minimum bounds.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EditEvent::Paste | EditEvent::Blur)
    }

    /// The inserted character, for keystrokes.
    pub fn inserted_char(&self) -> Option<char> {
        match self {
            EditEvent::Keystroke(ch) => Some(*ch),
            _ => None,
        }
    }
}

impl fmt::Display for EditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditEvent::Keystroke(ch) => write!(f, "keystroke({ch:?})"),
            EditEvent::Backspace => write!(f, "backspace"),
            EditEvent::Paste => write!(f, "paste"),
            EditEvent::Blur => write!(f, "blur"),
        }
    }
}

/// The outcome of running the mask engine over one edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    /// The field value after the edit.
    pub value: String,
    /// The caret position after the edit, in characters.
    pub caret: usize,
    /// Length of the prefix of `value` that satisfies the mask so far.
    pub valid_length: usize,
    /// Whether the edit produced a positional error.
    ///
    /// For keystrokes this means the edit was rejected and `value` is the
    /// prior value. For terminal events it also covers unfilled required
    /// positions.
    pub had_error: bool,
}

/// The combined verdict a field session returns to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdict {
    /// The field value to write back.
    pub value: String,
    /// The caret position to write back, in characters.
    pub caret: usize,
    /// Error text for this edit; empty when valid.
    pub error: String,
    /// Whether the edit was refused and the prior value kept.
    pub rejected: bool,
}

impl Verdict {
    /// Returns true if the verdict carries no error text.
    pub fn is_valid(&self) -> bool {
        self.error.is_empty()
    }
}
