//! Error types for field validation.
//!
//! These are verdict values rather than failures: every edit still yields a
//! usable value and caret, and the `Display` output of an error is the text
//! shown next to the field.

use std::fmt;

use crate::constraints::DateFormat;

/// Why a field's value is not acceptable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// A character could not satisfy a required mask position, or required
    /// positions were left unfilled at a terminal event.
    #[error("Please use the format: {format}.")]
    PositionalMismatch { format: String },

    /// A whole-field constraint failed.
    #[error(transparent)]
    ConstraintViolation(#[from] Violation),

    /// The field is required but empty at a terminal event.
    #[error("is required.")]
    RequiredButEmpty,
}

impl FieldError {
    /// Create a positional mismatch error for a mask pattern.
    pub fn positional(format: impl Into<String>) -> Self {
        Self::PositionalMismatch {
            format: format.into(),
        }
    }
}

/// Unit used in length-bound messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Alphabetic fields count letters.
    Letters,
    /// Every other class counts characters.
    Characters,
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnit::Letters => write!(f, "letters"),
            LengthUnit::Characters => write!(f, "characters"),
        }
    }
}

/// A whole-field constraint failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Violation {
    #[error("must be numeric.")]
    NotNumeric,

    #[error("must be greater than or equal to {min}.")]
    BelowMinimum { min: f64 },

    #[error("must be less than or equal to {max}.")]
    AboveMaximum { max: f64 },

    #[error("must contain only letters (a-z).")]
    NotAlphabetic,

    #[error("must contain only numbers or letters (a-z 0-9).")]
    NotAlphanumeric,

    #[error("must contain only numbers, letters, spaces and hyphens (a-z 0-9 -).")]
    NotWord,

    #[error("must have at least {min} {unit}.")]
    TooShort { min: usize, unit: LengthUnit },

    #[error("must have no more than {max} {unit}.")]
    TooLong { max: usize, unit: LengthUnit },

    #[error("must be a valid formatted date: {format}.")]
    InvalidDate { format: DateFormat },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            FieldError::positional("99/99/9999").to_string(),
            "Please use the format: 99/99/9999."
        );
        assert_eq!(FieldError::RequiredButEmpty.to_string(), "is required.");
        assert_eq!(
            FieldError::from(Violation::BelowMinimum { min: 10.0 }).to_string(),
            "must be greater than or equal to 10."
        );
        assert_eq!(
            Violation::TooShort {
                min: 3,
                unit: LengthUnit::Letters
            }
            .to_string(),
            "must have at least 3 letters."
        );
        assert_eq!(
            Violation::TooLong {
                max: 8,
                unit: LengthUnit::Characters
            }
            .to_string(),
            "must have no more than 8 characters."
        );
        assert_eq!(
            Violation::InvalidDate {
                format: DateFormat::YearMonthDayDash
            }
            .to_string(),
            "must be a valid formatted date: yyyy-mm-dd."
        );
    }
}
