//! Mask compilation.
//!
//! A mask is a string of positional rules and literal separators that
//! constrains what may be typed into a field, one character at a time.
//!
//! # Mask Characters
//!
//! | Char | Meaning |
//! |------|---------|
//! | `9`  | Digit required (0-9) |
//! | `0`  | Digit permitted but not required |
//! | `A`  | Non-digit required |
//! | `a`  | Non-digit permitted but not required |
//! | `C`  | Any character required |
//! | `c`  | Any character permitted but not required |
//! | `\`  | Escape the following character to use it as a literal separator |
//!
//! Every other character is a literal that the engine inserts on its own
//! as the user types.
//!
//! # Example
//!
//! ```
//! use maskform_core::mask::{CharClass, Mask, MaskToken};
//!
//! let mask = Mask::new("99/99/9999");
//! assert_eq!(mask.len(), 10);
//! assert_eq!(mask.tokens()[2], MaskToken::Literal('/'));
//! assert_eq!(mask.tokens()[0], MaskToken::Required(CharClass::Digit));
//! ```

use std::fmt;

/// The escape character of the mask language.
pub const ESCAPE: char = '\\';

/// Character class for value-bearing mask tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Digit (0-9) - mask char: 9/0
    Digit,
    /// Anything that is not a digit - mask char: A/a
    ///
    /// Symbols and spaces pass as well; only ASCII digits are refused.
    Alpha,
    /// Any character - mask char: C/c
    Any,
}

impl CharClass {
    /// Check if a character belongs to this character class.
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            CharClass::Digit => ch.is_ascii_digit(),
            CharClass::Alpha => !ch.is_ascii_digit(),
            CharClass::Any => true,
        }
    }
}

/// A single compiled unit of a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskToken {
    /// A literal character that must appear verbatim; auto-inserted when missing.
    Literal(char),
    /// A position that must be filled with a character of the given class.
    Required(CharClass),
    /// A position that may be filled with a character of the given class.
    Optional(CharClass),
}

impl MaskToken {
    /// Map a control letter to its token, if it is one.
    pub fn from_control(ch: char) -> Option<Self> {
        let token = match ch {
            '9' => MaskToken::Required(CharClass::Digit),
            '0' => MaskToken::Optional(CharClass::Digit),
            'A' => MaskToken::Required(CharClass::Alpha),
            'a' => MaskToken::Optional(CharClass::Alpha),
            'C' => MaskToken::Required(CharClass::Any),
            'c' => MaskToken::Optional(CharClass::Any),
            _ => return None,
        };
        Some(token)
    }

    /// Returns true if this token is a literal (separator).
    pub fn is_literal(&self) -> bool {
        matches!(self, MaskToken::Literal(_))
    }

    /// Returns true if this token must be filled.
    pub fn is_required(&self) -> bool {
        matches!(self, MaskToken::Required(_))
    }

    /// Returns true if this token may be left empty.
    pub fn is_optional(&self) -> bool {
        matches!(self, MaskToken::Optional(_))
    }

    /// Returns true if this token holds user input rather than a separator.
    pub fn is_value_bearing(&self) -> bool {
        !self.is_literal()
    }

    /// Check if a character can occupy this token's position.
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            MaskToken::Literal(lit) => ch == *lit,
            MaskToken::Required(class) | MaskToken::Optional(class) => class.accepts(ch),
        }
    }
}

/// Compile a raw mask string into its token sequence.
///
/// Compilation is total: every string compiles. An empty mask yields an
/// empty sequence, and a trailing lone escape compiles to a literal `\`.
pub fn compile(raw: &str) -> Vec<MaskToken> {
    let mut tokens = Vec::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            tokens.push(MaskToken::Literal(chars.next().unwrap_or(ESCAPE)));
            continue;
        }
        tokens.push(MaskToken::from_control(ch).unwrap_or(MaskToken::Literal(ch)));
    }

    tokens
}

/// How the engine surfaces separators that follow the last typed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LiteralCompletion {
    /// Insert a literal only once the character after it arrives.
    #[default]
    Lazy,
    /// Append the run of literals that follows the typed character right away.
    Eager,
}

/// A compiled mask together with its source pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    /// The original mask string.
    pattern: String,
    /// Compiled tokens.
    tokens: Vec<MaskToken>,
    /// Literal completion mode used when applying edits.
    completion: LiteralCompletion,
}

impl Mask {
    /// Compile a mask from a pattern string.
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            tokens: compile(pattern),
            completion: LiteralCompletion::default(),
        }
    }

    /// Set the literal completion mode.
    pub fn with_completion(mut self, completion: LiteralCompletion) -> Self {
        self.completion = completion;
        self
    }

    /// Get the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Get the compiled tokens.
    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    /// Get the literal completion mode.
    pub fn completion(&self) -> LiteralCompletion {
        self.completion
    }

    /// Get the number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the mask has no tokens (no positional masking).
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get the number of value-bearing positions.
    pub fn editable_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_value_bearing()).count()
    }

    /// Get the number of required positions.
    pub fn required_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_required()).count()
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}
