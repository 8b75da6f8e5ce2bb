//! Per-field editing state.
//!
//! A [`FieldSession`] owns one field's value, caret and current error text,
//! and combines the mask engine with the constraint validator into a single
//! [`Verdict`] per edit.
//!
//! # Example
//!
//! ```
//! use maskform_core::{EditEvent, FieldConstraints, FieldSession, Mask};
//!
//! let mut session = FieldSession::new(Mask::new("(999) 999-9999"), FieldConstraints::new());
//! for ch in "5551234567".chars() {
//!     session.handle(EditEvent::Keystroke(ch));
//! }
//! assert_eq!(session.value(), "(555) 123-4567");
//!
//! let verdict = session.handle(EditEvent::Keystroke('x'));
//! assert!(verdict.rejected);
//! assert_eq!(verdict.error, "Please use the format: (999) 999-9999.");
//! ```

use crate::constraints::{FieldConstraints, validate};
use crate::error::FieldError;
use crate::event::{EditEvent, Verdict};
use crate::logging::targets;
use crate::mask::Mask;

/// The rules a field is edited against. Fixed for the session's lifetime.
#[derive(Debug, Clone, PartialEq)]
struct FieldRules {
    mask: Mask,
    constraints: FieldConstraints,
    format_error: Option<String>,
}

/// The mutable part of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FieldState {
    value: String,
    caret: usize,
    error: String,
}

impl FieldState {
    fn verdict(&self, rejected: bool) -> Verdict {
        Verdict {
            value: self.value.clone(),
            caret: self.caret,
            error: self.error.clone(),
            rejected,
        }
    }
}

/// Sets a session's processing flag and clears it when dropped.
struct ProcessingGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> ProcessingGuard<'a> {
    fn enter(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// A single masked or constrained text field.
///
/// With a non-empty mask, edits are resolved positionally and the whole-field
/// constraints are consulted on terminal events. With an empty mask, every
/// edit is checked against the constraints instead, and keystrokes that would
/// break them are refused.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSession {
    rules: FieldRules,
    state: FieldState,
    processing: bool,
}

static_assertions::assert_impl_all!(FieldSession: Send);

impl FieldSession {
    /// Create an empty session.
    pub fn new(mask: Mask, constraints: FieldConstraints) -> Self {
        Self {
            rules: FieldRules {
                mask,
                constraints,
                format_error: None,
            },
            state: FieldState::default(),
            processing: false,
        }
    }

    /// Start with an initial value. The caret is placed at its end.
    ///
    /// The value is taken as-is; it is checked on the next terminal event.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.state.value = value.into();
        self.state.caret = self.state.value.chars().count();
        self
    }

    /// Replace the default positional-mismatch message.
    pub fn with_format_error(mut self, message: impl Into<String>) -> Self {
        self.rules.format_error = Some(message.into());
        self
    }

    /// The field's mask.
    pub fn mask(&self) -> &Mask {
        &self.rules.mask
    }

    /// The field's whole-field constraints.
    pub fn constraints(&self) -> &FieldConstraints {
        &self.rules.constraints
    }

    /// The custom positional-mismatch message, if one was set.
    pub fn format_error(&self) -> Option<&str> {
        self.rules.format_error.as_deref()
    }

    /// The current value.
    pub fn value(&self) -> &str {
        &self.state.value
    }

    /// The current caret position, in characters.
    pub fn caret(&self) -> usize {
        self.state.caret
    }

    /// The current error text; empty when valid.
    pub fn error(&self) -> &str {
        &self.state.error
    }

    /// Returns true if the field currently carries no error.
    pub fn is_valid(&self) -> bool {
        self.state.error.is_empty()
    }

    /// Returns true while an edit is being resolved.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// The session state as a verdict, without applying an edit.
    pub fn verdict(&self) -> Verdict {
        self.state.verdict(false)
    }

    /// Apply one edit and return the resulting verdict.
    ///
    /// A call that arrives while another edit is still being resolved is
    /// ignored and returns the current state.
    pub fn handle(&mut self, event: EditEvent) -> Verdict {
        if self.processing {
            tracing::trace!(target: targets::SESSION, %event, "ignored reentrant edit");
            return self.state.verdict(false);
        }

        let _guard = ProcessingGuard::enter(&mut self.processing);
        let verdict = if self.rules.mask.is_empty() {
            self.rules.resolve_constrained(&mut self.state, event)
        } else {
            self.rules.resolve_masked(&mut self.state, event)
        };

        tracing::trace!(
            target: targets::SESSION,
            %event,
            value = %verdict.value,
            caret = verdict.caret,
            error = %verdict.error,
            rejected = verdict.rejected,
            "handled edit"
        );
        verdict
    }
}

impl FieldRules {
    fn positional_message(&self) -> String {
        match &self.format_error {
            Some(message) => message.clone(),
            None => FieldError::positional(self.mask.pattern()).to_string(),
        }
    }

    fn terminal_message(&self, value: &str) -> String {
        match validate(value, &self.constraints, true) {
            Ok(()) => String::new(),
            Err(error) => error.to_string(),
        }
    }

    fn resolve_masked(&self, state: &mut FieldState, event: EditEvent) -> Verdict {
        let resolution = self.mask.apply(&state.value, state.caret, &event);

        match event {
            EditEvent::Keystroke(_) if resolution.had_error => {
                tracing::debug!(
                    target: targets::SESSION,
                    %event,
                    value = %state.value,
                    "rejected keystroke"
                );
                return Verdict {
                    value: state.value.clone(),
                    caret: state.caret,
                    error: self.positional_message(),
                    rejected: true,
                };
            }
            EditEvent::Keystroke(_) => {
                state.value = resolution.value;
                state.caret = resolution.caret;
                state.error.clear();
            }
            EditEvent::Backspace => {
                state.value = resolution.value;
                state.caret = resolution.caret;
            }
            EditEvent::Paste | EditEvent::Blur => {
                state.error = if resolution.had_error {
                    self.positional_message()
                } else {
                    self.terminal_message(&resolution.value)
                };
                state.value = resolution.value;
                state.caret = resolution.caret;
            }
        }

        state.verdict(false)
    }

    fn resolve_constrained(&self, state: &mut FieldState, event: EditEvent) -> Verdict {
        let resolution = self.mask.apply(&state.value, state.caret, &event);

        match event {
            EditEvent::Keystroke(_) => match validate(&resolution.value, &self.constraints, false) {
                Ok(()) => {
                    state.value = resolution.value;
                    state.caret = resolution.caret;
                    state.error.clear();
                }
                Err(error) => {
                    tracing::debug!(target: targets::SESSION, %event, %error, "rejected keystroke");
                    return Verdict {
                        value: state.value.clone(),
                        caret: state.caret,
                        error: error.to_string(),
                        rejected: true,
                    };
                }
            },
            EditEvent::Backspace => {
                state.value = resolution.value;
                state.caret = resolution.caret;
            }
            EditEvent::Paste | EditEvent::Blur => {
                state.error = self.terminal_message(&state.value);
                state.caret = resolution.caret;
            }
        }

        state.verdict(false)
    }
}
