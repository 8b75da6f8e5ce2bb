//! Mask directives.
//!
//! A raw mask attribute may carry bracketed directives alongside its
//! positional pattern:
//!
//! | Directive                      | Effect                                          |
//! |--------------------------------|-------------------------------------------------|
//! | `[required]`                   | The field must not be empty when editing ends   |
//! | `[default value]`              | Initial value of the field                      |
//! | `[numeric]`, `[numeric 10 100]`| Numeric value, optionally bounded               |
//! | `[alphabetic min max]`         | Letters only, optional length bounds            |
//! | `[alphanumeric min max]`       | Letters and digits, optional length bounds      |
//! | `[word min max]`               | Letters, digits, spaces and hyphens             |
//! | `[character min max]`          | Any characters, optional length bounds          |
//! | `[date mm/dd/yyyy]`            | Calendar date; expands into a positional mask   |
//!
//! Directive names are case-insensitive and each is honored once. Bounds are
//! read in order; one that is not a whole number stays unset, and extra
//! parameters are ignored. Bracketed text that is not a directive stays in
//! the mask as literal characters.
//!
//! # Example
//!
//! ```
//! use maskform::directive::expand;
//!
//! let spec = expand("[required][date mm/dd/yyyy]").unwrap();
//! assert_eq!(spec.mask, "90/90/9999");
//! assert!(spec.constraints.required);
//! ```

use std::sync::LazyLock;

use maskform_core::{
    ConstraintClass, DateFormat, FieldConstraints, FieldError, FieldSession, LengthBounds,
    LiteralCompletion, Mask, NumericRange,
};
use regex::{Captures, Regex};

use crate::error::{Error, Result};
use crate::logging::targets;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \[\s*
        (?:
            (?P<required>required)
          | default \s+ (?P<default>[^\]]*?)
          | (?P<calc>calc) (?:\s+[^\]]*)?
          | (?P<numeric>numeric) (?:\s+(?P<nparams>[^\]]*?))?
          | (?P<length>alphabetic|alphanumeric|word|character) (?:\s+(?P<lparams>[^\]]*?))?
          | (?P<date>date) (?:\s+(?P<format>[^\]]*?))?
        )
        \s*\]",
    )
    .expect("valid directive pattern")
});

/// A field description produced from a raw mask attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldSpec {
    /// The positional mask left after directives are removed.
    pub mask: String,
    /// Whole-field constraints collected from the directives.
    pub constraints: FieldConstraints,
    /// The `[default ...]` value, if any.
    pub default_value: Option<String>,
}

impl FieldSpec {
    /// The date format this field is constrained to, if any.
    pub fn date_format(&self) -> Option<DateFormat> {
        match self.constraints.class {
            Some(ConstraintClass::Date(format)) => Some(format),
            _ => None,
        }
    }

    /// Start a session for this field with lazy literal completion.
    pub fn session(&self) -> FieldSession {
        self.session_with(LiteralCompletion::default())
    }

    /// Start a session for this field with the given literal completion mode.
    ///
    /// The session starts with the default value, if one was given. Date
    /// fields report positional mismatches against the date layout rather
    /// than the generated mask.
    pub fn session_with(&self, completion: LiteralCompletion) -> FieldSession {
        let mask = Mask::new(&self.mask).with_completion(completion);
        let mut session = FieldSession::new(mask, self.constraints)
            .with_value(self.default_value.clone().unwrap_or_default());
        if let Some(format) = self.date_format() {
            session =
                session.with_format_error(FieldError::positional(format.as_str()).to_string());
        }
        session
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    Required,
    Default,
    Class,
}

/// Expand a raw mask attribute into a [`FieldSpec`].
///
/// # Errors
///
/// Fails on a `[date]` directive with a missing or unknown format, on a
/// lower bound greater than the upper bound, and on `{...}` expressions
/// (in `[default]` values or `[calc]`), which cannot be evaluated.
pub fn expand(raw: &str) -> Result<FieldSpec> {
    let mut spec = FieldSpec::default();
    let mut seen = Vec::new();
    let mut mask = String::with_capacity(raw.len());
    let mut last = 0;

    for caps in DIRECTIVE.captures_iter(raw) {
        let Some(whole) = caps.get(0) else { continue };
        // An escaped bracket is literal text.
        if raw[..whole.start()].ends_with(maskform_core::mask::ESCAPE) {
            continue;
        }

        let kind = directive_kind(&caps);
        if seen.contains(&kind) {
            tracing::warn!(
                target: targets::DIRECTIVE,
                directive = whole.as_str(),
                "repeated directive left in mask"
            );
            continue;
        }
        seen.push(kind);

        mask.push_str(&raw[last..whole.start()]);
        last = whole.end();

        if let Some(generated) = apply_directive(&caps, whole.as_str(), &mut spec)? {
            mask.push_str(&generated);
        }
    }
    mask.push_str(&raw[last..]);

    tracing::debug!(
        target: targets::DIRECTIVE,
        raw,
        mask = %mask,
        required = spec.constraints.required,
        class = ?spec.constraints.class,
        "expanded directives"
    );

    spec.mask = mask;
    Ok(spec)
}

fn directive_kind(caps: &Captures<'_>) -> DirectiveKind {
    if caps.name("required").is_some() {
        DirectiveKind::Required
    } else if caps.name("default").is_some() {
        DirectiveKind::Default
    } else {
        DirectiveKind::Class
    }
}

/// Record one directive in `spec`. Returns mask text to put in its place.
fn apply_directive(
    caps: &Captures<'_>,
    directive: &str,
    spec: &mut FieldSpec,
) -> Result<Option<String>> {
    if caps.name("required").is_some() {
        spec.constraints.required = true;
        return Ok(None);
    }

    if let Some(value) = caps.name("default") {
        let value = value.as_str();
        if value.starts_with('{') {
            return Err(Error::unsupported_expression(directive));
        }
        spec.default_value = Some(value.to_string());
        return Ok(None);
    }

    if caps.name("calc").is_some() {
        return Err(Error::unsupported_expression(directive));
    }

    if caps.name("numeric").is_some() {
        let (min, max) = bounds(caps, "nparams");
        check_order(directive, min, max)?;
        let range = NumericRange::new(min.map(|n| n as f64), max.map(|n| n as f64));
        spec.constraints.class = Some(ConstraintClass::Numeric(range));
        return Ok(None);
    }

    if let Some(name) = caps.name("length") {
        let (min, max) = bounds(caps, "lparams");
        check_order(directive, min, max)?;
        let bounds = LengthBounds::new(min.map(to_len), max.map(to_len));
        let class = match name.as_str().to_ascii_lowercase().as_str() {
            "alphabetic" => ConstraintClass::Alphabetic(bounds),
            "alphanumeric" => ConstraintClass::Alphanumeric(bounds),
            "word" => ConstraintClass::Word(bounds),
            _ => ConstraintClass::Character(bounds),
        };
        spec.constraints.class = Some(class);
        return Ok(None);
    }

    let format = caps
        .name("format")
        .map(|m| m.as_str().trim())
        .filter(|f| !f.is_empty())
        .ok_or(Error::MissingDateFormat)?;
    let format: DateFormat = format.parse()?;
    spec.constraints.class = Some(ConstraintClass::Date(format));
    Ok(Some(format.mask_pattern()))
}

/// Lower and upper bound from a directive's parameters, in that order.
///
/// A parameter that is not a whole number leaves its bound unset, and
/// anything after the second parameter is ignored.
fn bounds(caps: &Captures<'_>, name: &str) -> (Option<u64>, Option<u64>) {
    let mut params = caps
        .name(name)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .split_whitespace()
        .map(|param| param.parse::<u64>().ok());
    let min = params.next().flatten();
    let max = params.next().flatten();
    (min, max)
}

fn to_len(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

fn check_order(directive: &str, min: Option<u64>, max: Option<u64>) -> Result<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(Error::inverted_range(directive, min, max)),
        _ => Ok(()),
    }
}
