//! Core engine for maskform.
//!
//! This crate provides the pieces that decide, edit by edit, what a masked
//! text field should contain:
//!
//! - **Masks**: Compile a pattern such as `99/99/9999` into positional tokens
//! - **Engine**: Resolve a keystroke, backspace, paste or blur against a mask
//! - **Constraints**: Whole-field rules (numeric ranges, character sets, lengths, dates)
//! - **Sessions**: Per-field state that combines both into a single verdict
//!
//! # Example
//!
//! ```
//! use maskform_core::{EditEvent, FieldConstraints, FieldSession, Mask};
//!
//! let mut session = FieldSession::new(Mask::new("99/99/9999"), FieldConstraints::new());
//!
//! for (ch, expected) in [('1', "1"), ('2', "12"), ('3', "12/3"), ('4', "12/34")] {
//!     let verdict = session.handle(EditEvent::Keystroke(ch));
//!     assert_eq!(verdict.value, expected);
//! }
//!
//! // Leaving the field with required positions unfilled is a format error.
//! let verdict = session.handle(EditEvent::Blur);
//! assert_eq!(verdict.error, "Please use the format: 99/99/9999.");
//! ```

pub mod constraints;
pub mod engine;
pub mod error;
pub mod event;
pub mod logging;
pub mod mask;
pub mod session;

pub use constraints::{
    ConstraintClass, DateFormat, FieldConstraints, LengthBounds, NumericRange, UnknownDateFormat,
    validate,
};
pub use engine::{apply, apply_with};
pub use error::{FieldError, LengthUnit, Violation};
pub use event::{EditEvent, Resolution, Verdict};
pub use mask::{CharClass, LiteralCompletion, Mask, MaskToken, compile};
pub use session::FieldSession;
