//! Error types for directive expansion and form configuration.

use std::path::PathBuf;

/// Result type alias for maskform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building forms.
///
/// Per-edit outcomes are never errors; see [`FieldError`](crate::FieldError)
/// for the verdicts a field reports while it is being edited.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `[date ...]` directive named a layout that is not supported.
    ///
    /// Supported layouts are yyyy-mm-dd, yyyy/mm/dd, mm/dd/yyyy, dd-mm-yyyy
    /// and dd/mm/yyyy.
    #[error("Unknown date format '{0}'")]
    UnknownDateFormat(String),

    /// A `[date]` directive had no format.
    #[error("Date directive requires a format")]
    MissingDateFormat,

    /// A directive's lower bound exceeds its upper bound.
    #[error("Invalid range in '{directive}': {min} is greater than {max}")]
    InvertedRange {
        directive: String,
        min: u64,
        max: u64,
    },

    /// A directive value is a braced expression, which cannot be evaluated.
    #[error("Unsupported expression in '{directive}'")]
    UnsupportedExpression { directive: String },

    /// Form configuration could not be parsed.
    #[error("Form config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Form configuration file could not be read.
    #[error("Failed to read form config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two fields share a name.
    #[error("Duplicate field '{0}'")]
    DuplicateField(String),

    /// No field has the given name.
    #[error("Unknown field '{0}'")]
    UnknownField(String),
}

impl Error {
    /// Create an inverted range error.
    pub fn inverted_range(directive: impl Into<String>, min: u64, max: u64) -> Self {
        Self::InvertedRange {
            directive: directive.into(),
            min,
            max,
        }
    }

    /// Create an unsupported expression error.
    pub fn unsupported_expression(directive: impl Into<String>) -> Self {
        Self::UnsupportedExpression {
            directive: directive.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<maskform_core::UnknownDateFormat> for Error {
    fn from(err: maskform_core::UnknownDateFormat) -> Self {
        Self::UnknownDateFormat(err.0)
    }
}
