//! Whole-field constraints.
//!
//! Constraints check the entire value rather than individual positions. A
//! field is driven by a positional [`Mask`](crate::mask::Mask) or by a
//! constraint class; the `required` flag applies to both.
//!
//! Checks that only make sense on a finished value (minimum length, minimum
//! number, date validity, emptiness of a required field) run on terminal
//! events only. Character-set checks and upper bounds run on every event, so
//! a user can never type past a maximum but is not penalized for being
//! halfway to a minimum.
//!
//! # Example
//!
//! ```
//! use maskform_core::constraints::{validate, ConstraintClass, FieldConstraints, NumericRange};
//!
//! let constraints = FieldConstraints::new()
//!     .with_class(ConstraintClass::Numeric(NumericRange::new(Some(10.0), Some(100.0))));
//!
//! assert!(validate("5", &constraints, false).is_ok());
//! assert!(validate("5", &constraints, true).is_err());
//! assert!(validate("500", &constraints, false).is_err());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{FieldError, LengthUnit, Violation};
use crate::logging::targets;

static NOT_ALPHABETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z]").expect("valid charset pattern"));
static NOT_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("valid charset pattern"));
static NOT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s\-]").expect("valid charset pattern"));

static YEAR_FIRST_DASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(19|20)\d\d-(0[1-9]|1[012])-(0[1-9]|[12][0-9]|3[01])$")
        .expect("valid date pattern")
});
static YEAR_FIRST_SLASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(19|20)\d\d/(0[1-9]|1[012])/(0[1-9]|[12][0-9]|3[01])$")
        .expect("valid date pattern")
});
static MONTH_FIRST_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("valid date pattern"));
static DAY_FIRST_DASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|[12][0-9]|3[01])-(0[1-9]|1[012])-(19|20)\d\d$")
        .expect("valid date pattern")
});
static DAY_FIRST_SLASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[012])/(19|20)\d\d$")
        .expect("valid date pattern")
});

/// Supported date layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `yyyy-mm-dd`
    YearMonthDayDash,
    /// `yyyy/mm/dd`
    YearMonthDaySlash,
    /// `mm/dd/yyyy`
    MonthDayYearSlash,
    /// `dd-mm-yyyy`
    DayMonthYearDash,
    /// `dd/mm/yyyy`
    DayMonthYearSlash,
}

impl DateFormat {
    /// All supported formats.
    pub const ALL: [DateFormat; 5] = [
        DateFormat::YearMonthDayDash,
        DateFormat::YearMonthDaySlash,
        DateFormat::MonthDayYearSlash,
        DateFormat::DayMonthYearDash,
        DateFormat::DayMonthYearSlash,
    ];

    /// The format as written in directives and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::YearMonthDayDash => "yyyy-mm-dd",
            DateFormat::YearMonthDaySlash => "yyyy/mm/dd",
            DateFormat::MonthDayYearSlash => "mm/dd/yyyy",
            DateFormat::DayMonthYearDash => "dd-mm-yyyy",
            DateFormat::DayMonthYearSlash => "dd/mm/yyyy",
        }
    }

    /// The equivalent `chrono` parse format.
    pub fn chrono_format(&self) -> &'static str {
        match self {
            DateFormat::YearMonthDayDash => "%Y-%m-%d",
            DateFormat::YearMonthDaySlash => "%Y/%m/%d",
            DateFormat::MonthDayYearSlash => "%m/%d/%Y",
            DateFormat::DayMonthYearDash => "%d-%m-%Y",
            DateFormat::DayMonthYearSlash => "%d/%m/%Y",
        }
    }

    /// The positional mask that guides typing for this format.
    ///
    /// Month and day take one required and one optional digit; the year takes
    /// four required digits.
    pub fn mask_pattern(&self) -> String {
        self.as_str()
            .replace("mm", "90")
            .replace("dd", "90")
            .replace("yyyy", "9999")
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            DateFormat::YearMonthDayDash => &YEAR_FIRST_DASH,
            DateFormat::YearMonthDaySlash => &YEAR_FIRST_SLASH,
            DateFormat::MonthDayYearSlash => &MONTH_FIRST_SLASH,
            DateFormat::DayMonthYearDash => &DAY_FIRST_DASH,
            DateFormat::DayMonthYearSlash => &DAY_FIRST_SLASH,
        }
    }

    /// Parse a value as a calendar date in this format.
    ///
    /// Returns `None` if the value does not match the format's layout or does
    /// not name a real day.
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        if !self.pattern().is_match(value) {
            return None;
        }
        NaiveDate::parse_from_str(value, self.chrono_format()).ok()
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a date format string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown date format '{0}'")]
pub struct UnknownDateFormat(pub String);

impl FromStr for DateFormat {
    type Err = UnknownDateFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DateFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownDateFormat(wanted.to_string()))
    }
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumericRange {
    /// Smallest acceptable value, checked on terminal events.
    pub min: Option<f64>,
    /// Largest acceptable value, checked on every event.
    pub max: Option<f64>,
}

impl NumericRange {
    /// Create a range with optional bounds.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// A range with no bounds.
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// Inclusive length bounds, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthBounds {
    /// Shortest acceptable length, checked on terminal events.
    pub min_len: Option<usize>,
    /// Longest acceptable length, checked on every event.
    pub max_len: Option<usize>,
}

impl LengthBounds {
    /// Create bounds with optional limits.
    pub fn new(min_len: Option<usize>, max_len: Option<usize>) -> Self {
        Self { min_len, max_len }
    }

    /// Bounds that accept any length.
    pub fn any() -> Self {
        Self::default()
    }
}

/// The class of whole-field rule applied to a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintClass {
    /// A number, optionally preceded by a sign.
    Numeric(NumericRange),
    /// Letters only (A-Z, a-z).
    Alphabetic(LengthBounds),
    /// Letters and digits only.
    Alphanumeric(LengthBounds),
    /// Letters, digits, whitespace and hyphens.
    Word(LengthBounds),
    /// Any characters; only the length is checked.
    Character(LengthBounds),
    /// A calendar date in the given layout.
    Date(DateFormat),
}

/// The whole-field rule set of a field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldConstraints {
    /// Whether the field must be non-empty once editing finishes.
    pub required: bool,
    /// The class constraint, if any.
    pub class: Option<ConstraintClass>,
}

impl FieldConstraints {
    /// Create an empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the class constraint.
    pub fn with_class(mut self, class: ConstraintClass) -> Self {
        self.class = Some(class);
        self
    }

    /// Returns true if the field must be non-empty.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns true if no rule is configured.
    pub fn is_empty(&self) -> bool {
        !self.required && self.class.is_none()
    }

    /// Check a value against these constraints.
    pub fn validate(&self, value: &str, terminal: bool) -> Result<(), FieldError> {
        validate(value, self, terminal)
    }
}

/// Check a value against a constraint set.
///
/// `terminal` marks a finished value (blur or paste). The first failing rule
/// wins, in this order: required, then the class constraint.
pub fn validate(
    value: &str,
    constraints: &FieldConstraints,
    terminal: bool,
) -> Result<(), FieldError> {
    if terminal && constraints.required && value.trim().is_empty() {
        return Err(FieldError::RequiredButEmpty);
    }

    let Some(class) = constraints.class else {
        return Ok(());
    };
    if value.is_empty() {
        return Ok(());
    }

    let result = match class {
        ConstraintClass::Numeric(range) => check_numeric(value, range, terminal),
        ConstraintClass::Alphabetic(bounds) => {
            check_charset(value, &NOT_ALPHABETIC, Violation::NotAlphabetic)?;
            check_length(value, bounds, LengthUnit::Letters, terminal)
        }
        ConstraintClass::Alphanumeric(bounds) => {
            check_charset(value, &NOT_ALPHANUMERIC, Violation::NotAlphanumeric)?;
            check_length(value, bounds, LengthUnit::Characters, terminal)
        }
        ConstraintClass::Word(bounds) => {
            check_charset(value, &NOT_WORD, Violation::NotWord)?;
            check_length(value, bounds, LengthUnit::Characters, terminal)
        }
        ConstraintClass::Character(bounds) => {
            check_length(value, bounds, LengthUnit::Characters, terminal)
        }
        ConstraintClass::Date(format) => check_date(value, format, terminal),
    };

    if let Err(violation) = &result {
        tracing::trace!(target: targets::CONSTRAINTS, terminal, %violation, "constraint failed");
    }
    result.map_err(FieldError::from)
}

fn check_numeric(value: &str, range: NumericRange, terminal: bool) -> Result<(), Violation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    let number = match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        // A sign on its own is a number still being typed.
        _ if trimmed == "-" && !terminal => return Ok(()),
        _ => return Err(Violation::NotNumeric),
    };

    if let Some(min) = range.min
        && terminal
        && number < min
    {
        return Err(Violation::BelowMinimum { min });
    }
    if let Some(max) = range.max
        && number > max
    {
        return Err(Violation::AboveMaximum { max });
    }
    Ok(())
}

fn check_charset(value: &str, disallowed: &Regex, violation: Violation) -> Result<(), Violation> {
    if disallowed.is_match(value) {
        Err(violation)
    } else {
        Ok(())
    }
}

fn check_length(
    value: &str,
    bounds: LengthBounds,
    unit: LengthUnit,
    terminal: bool,
) -> Result<(), Violation> {
    let len = value.chars().count();
    if let Some(min) = bounds.min_len
        && terminal
        && len < min
    {
        return Err(Violation::TooShort { min, unit });
    }
    if let Some(max) = bounds.max_len
        && len > max
    {
        return Err(Violation::TooLong { max, unit });
    }
    Ok(())
}

fn check_date(value: &str, format: DateFormat, terminal: bool) -> Result<(), Violation> {
    if !terminal || format.parse(value).is_some() {
        Ok(())
    } else {
        Err(Violation::InvalidDate { format })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(min: Option<f64>, max: Option<f64>) -> FieldConstraints {
        FieldConstraints::new().with_class(ConstraintClass::Numeric(NumericRange::new(min, max)))
    }

    fn message(result: Result<(), FieldError>) -> String {
        result.err().map(|e| e.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_required_only_on_terminal_events() {
        let constraints = FieldConstraints::new().required();
        assert_eq!(message(validate("", &constraints, true)), "is required.");
        assert_eq!(message(validate("   ", &constraints, true)), "is required.");
        assert!(validate("", &constraints, false).is_ok());
        assert!(validate("x", &constraints, true).is_ok());
    }

    #[test]
    fn test_numeric_range() {
        let constraints = numeric(Some(10.0), Some(100.0));
        assert_eq!(
            message(validate("5", &constraints, true)),
            "must be greater than or equal to 10."
        );
        assert!(validate("5", &constraints, false).is_ok());
        assert!(validate("50", &constraints, true).is_ok());
        assert!(validate("50", &constraints, false).is_ok());
        assert_eq!(
            message(validate("500", &constraints, false)),
            "must be less than or equal to 100."
        );
        assert!(validate("500", &constraints, true).is_err());
    }

    #[test]
    fn test_numeric_format() {
        let constraints = numeric(None, None);
        assert!(validate("-12.5", &constraints, true).is_ok());
        assert!(validate("1e3", &constraints, true).is_ok());
        assert_eq!(message(validate("12a", &constraints, false)), "must be numeric.");
        assert_eq!(message(validate("inf", &constraints, true)), "must be numeric.");
    }

    #[test]
    fn test_lone_minus_is_only_valid_mid_edit() {
        let constraints = numeric(None, None);
        assert!(validate("-", &constraints, false).is_ok());
        assert_eq!(message(validate("-", &constraints, true)), "must be numeric.");
    }

    #[test]
    fn test_alphabetic() {
        let constraints = FieldConstraints::new()
            .with_class(ConstraintClass::Alphabetic(LengthBounds::new(Some(3), Some(5))));
        assert_eq!(
            message(validate("ab1", &constraints, false)),
            "must contain only letters (a-z)."
        );
        assert!(validate("ab", &constraints, false).is_ok());
        assert_eq!(
            message(validate("ab", &constraints, true)),
            "must have at least 3 letters."
        );
        assert_eq!(
            message(validate("abcdef", &constraints, false)),
            "must have no more than 5 letters."
        );
        assert!(validate("abcd", &constraints, true).is_ok());
    }

    #[test]
    fn test_alphanumeric_and_word() {
        let alnum =
            FieldConstraints::new().with_class(ConstraintClass::Alphanumeric(LengthBounds::any()));
        assert!(validate("abc123", &alnum, true).is_ok());
        assert_eq!(
            message(validate("abc 123", &alnum, true)),
            "must contain only numbers or letters (a-z 0-9)."
        );

        let word = FieldConstraints::new()
            .with_class(ConstraintClass::Word(LengthBounds::new(None, Some(12))));
        assert!(validate("well-known 42", &word, true).is_ok());
        assert_eq!(
            message(validate("hello!", &word, false)),
            "must contain only numbers, letters, spaces and hyphens (a-z 0-9 -)."
        );
        assert_eq!(
            message(validate("a much longer phrase", &word, false)),
            "must have no more than 12 characters."
        );
    }

    #[test]
    fn test_character_lengths() {
        let constraints = FieldConstraints::new()
            .with_class(ConstraintClass::Character(LengthBounds::new(Some(2), Some(4))));
        assert!(validate("é!", &constraints, true).is_ok());
        assert_eq!(
            message(validate("x", &constraints, true)),
            "must have at least 2 characters."
        );
        assert!(validate("x", &constraints, false).is_ok());
        assert!(validate("12345", &constraints, false).is_err());
    }

    #[test]
    fn test_empty_value_skips_class_checks() {
        let constraints = numeric(Some(10.0), None);
        assert!(validate("", &constraints, true).is_ok());
    }

    #[test]
    fn test_required_wins_over_class() {
        let constraints = numeric(Some(10.0), None).required();
        assert_eq!(message(validate("", &constraints, true)), "is required.");
    }

    #[test]
    fn test_date_validity() {
        let constraints = FieldConstraints::new()
            .with_class(ConstraintClass::Date(DateFormat::YearMonthDayDash));
        assert_eq!(
            message(validate("2023-02-30", &constraints, true)),
            "must be a valid formatted date: yyyy-mm-dd."
        );
        assert!(validate("2023-02-28", &constraints, true).is_ok());
        assert!(validate("2023/02/28", &constraints, true).is_err());
        assert!(validate("2023-02", &constraints, false).is_ok());
    }

    #[test]
    fn test_date_formats() {
        assert!(DateFormat::YearMonthDaySlash.parse("1999/12/31").is_some());
        assert!(DateFormat::MonthDayYearSlash.parse("2/29/2024").is_some());
        assert!(DateFormat::MonthDayYearSlash.parse("2/29/2023").is_none());
        assert!(DateFormat::DayMonthYearDash.parse("31-12-1999").is_some());
        assert!(DateFormat::DayMonthYearDash.parse("31-04-1999").is_none());
        assert!(DateFormat::DayMonthYearSlash.parse("01/01/2000").is_some());
        assert!(DateFormat::DayMonthYearSlash.parse("1/1/2000").is_none());
        assert!(DateFormat::YearMonthDayDash.parse("1899-01-01").is_none());
    }

    #[test]
    fn test_date_format_strings() {
        for format in DateFormat::ALL {
            assert_eq!(format.as_str().parse::<DateFormat>(), Ok(format));
        }
        assert_eq!("YYYY-MM-DD".parse::<DateFormat>(), Ok(DateFormat::YearMonthDayDash));
        assert!("dd.mm.yyyy".parse::<DateFormat>().is_err());
        assert_eq!(DateFormat::MonthDayYearSlash.mask_pattern(), "90/90/9999");
        assert_eq!(DateFormat::YearMonthDayDash.mask_pattern(), "9999-90-90");
    }
}
