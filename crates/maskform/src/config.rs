//! Declarative form configuration.
//!
//! Forms can be described in TOML, one `[[field]]` table per field:
//!
//! ```toml
//! [[field]]
//! name = "birthday"
//! label = "Birthday"
//! mask = "[required][date mm/dd/yyyy]"
//! error = "Use mm/dd/yyyy."
//! completion = "eager"
//! ```
//!
//! `label` defaults to the name, `error` replaces the positional-mismatch
//! message, and `completion` is `"lazy"` (the default) or `"eager"`.

use std::path::Path;

use maskform_core::{FieldSession, LiteralCompletion};
use serde::Deserialize;

use crate::directive::expand;
use crate::error::{Error, Result};
use crate::form::{FieldId, Form};
use crate::logging::targets;

/// How literals after the last typed character are inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Completion {
    /// Insert separators once the next character arrives.
    #[default]
    Lazy,
    /// Insert separators as soon as the preceding position is filled.
    Eager,
}

impl From<Completion> for LiteralCompletion {
    fn from(completion: Completion) -> Self {
        match completion {
            Completion::Lazy => LiteralCompletion::Lazy,
            Completion::Eager => LiteralCompletion::Eager,
        }
    }
}

/// One field of a form configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Field name, unique within the form.
    pub name: String,
    /// Label used in form-level messages.
    #[serde(default)]
    pub label: Option<String>,
    /// Raw mask attribute, directives included.
    #[serde(default)]
    pub mask: String,
    /// Replacement positional-mismatch message.
    #[serde(default)]
    pub error: Option<String>,
    /// Literal completion mode.
    #[serde(default)]
    pub completion: Completion,
}

impl FieldConfig {
    /// Create a field configuration with a name and raw mask.
    pub fn new(name: impl Into<String>, mask: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            mask: mask.into(),
            error: None,
            completion: Completion::default(),
        }
    }

    /// The label, falling back to the field name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Build a session for this field.
    ///
    /// # Errors
    ///
    /// Returns an error if the mask's directives cannot be expanded.
    pub fn session(&self) -> Result<FieldSession> {
        let session = expand(&self.mask)?.session_with(self.completion.into());
        Ok(match &self.error {
            Some(message) => session.with_format_error(message.clone()),
            None => session,
        })
    }
}

/// A whole form configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormConfig {
    /// The fields, in display order.
    #[serde(rename = "field", default)]
    pub fields: Vec<FieldConfig>,
}

impl FormConfig {
    /// Parse a form configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FormConfig = toml::from_str(content)?;
        tracing::debug!(
            target: targets::CONFIG,
            fields = config.fields.len(),
            "parsed form config"
        );
        Ok(config)
    }

    /// Read a form configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content)
    }
}

impl Form {
    /// Build a form from a configuration.
    ///
    /// # Errors
    ///
    /// Fails on the first field whose directives cannot be expanded or whose
    /// name is already taken.
    pub fn from_config(config: &FormConfig) -> Result<Self> {
        let mut form = Form::new();
        for field in &config.fields {
            form.register_spec(field)?;
        }
        Ok(form)
    }

    /// Add a field from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the directives cannot be expanded or a field with
    /// the same name is already registered.
    pub fn register_spec(&mut self, field: &FieldConfig) -> Result<FieldId> {
        if self.find(&field.name).is_some() {
            return Err(Error::DuplicateField(field.name.clone()));
        }
        let session = field.session()?;
        Ok(self.register(field.name.clone(), field.label(), session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskform_core::{ConstraintClass, DateFormat, EditEvent};

    const CONFIG: &str = r#"
        [[field]]
        name = "birthday"
        label = "Birthday"
        mask = "[required][date mm/dd/yyyy]"
        completion = "eager"

        [[field]]
        name = "phone"
        mask = "(999) 999-9999"
        error = "Enter a ten digit phone number."

        [[field]]
        name = "quantity"
        mask = "[default 1][numeric 1 99]"
    "#;

    #[test]
    fn test_parse_config() {
        let config = FormConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.fields.len(), 3);

        let birthday = &config.fields[0];
        assert_eq!(birthday.label(), "Birthday");
        assert_eq!(birthday.completion, Completion::Eager);

        let phone = &config.fields[1];
        assert_eq!(phone.label(), "phone");
        assert_eq!(phone.completion, Completion::Lazy);
        assert_eq!(phone.error.as_deref(), Some("Enter a ten digit phone number."));
    }

    #[test]
    fn test_empty_config() {
        let config = FormConfig::from_toml_str("").unwrap();
        assert!(config.fields.is_empty());
        assert!(Form::from_config(&config).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            FormConfig::from_toml_str("[[field]]\nmask = \"999\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            FormConfig::from_toml_str("[[field]]\nname = \"a\"\ncompletion = \"sometimes\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            FormConfig::from_toml_str("[[field]]\nname = \"a\"\nmaks = \"999\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            FormConfig::from_file("does/not/exist.toml"),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_form_from_config() {
        let config = FormConfig::from_toml_str(CONFIG).unwrap();
        let form = Form::from_config(&config).unwrap();
        assert_eq!(form.len(), 3);

        let birthday = form.find("birthday").and_then(|id| form.field(id)).unwrap();
        assert_eq!(birthday.mask().pattern(), "90/90/9999");
        assert_eq!(birthday.mask().completion(), LiteralCompletion::Eager);
        assert_eq!(
            birthday.constraints().class,
            Some(ConstraintClass::Date(DateFormat::MonthDayYearSlash))
        );

        assert_eq!(form.value("quantity"), Some("1"));
        assert_eq!(form.value("phone"), Some(""));
    }

    #[test]
    fn test_custom_error_overrides_default() {
        let config = FormConfig::from_toml_str(CONFIG).unwrap();
        let mut form = Form::from_config(&config).unwrap();
        let verdict = form.handle_named("phone", EditEvent::Keystroke('x')).unwrap();
        assert_eq!(verdict.error, "Enter a ten digit phone number.");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let config = FormConfig {
            fields: vec![FieldConfig::new("a", "999"), FieldConfig::new("a", "")],
        };
        assert!(matches!(
            Form::from_config(&config),
            Err(Error::DuplicateField(name)) if name == "a"
        ));
    }

    #[test]
    fn test_bad_directive_in_config() {
        let config = FormConfig {
            fields: vec![FieldConfig::new("when", "[date someday]")],
        };
        assert!(matches!(
            Form::from_config(&config),
            Err(Error::UnknownDateFormat(_))
        ));
    }
}
