//! Forms: named collections of field sessions.
//!
//! A [`Form`] owns its fields in registration order and routes edits to them
//! by [`FieldId`]. Before a form is submitted, [`Form::check`] gathers every
//! field that is still in error or that is required but empty.
//!
//! # Example
//!
//! ```
//! use maskform::{EditEvent, Form};
//!
//! let mut form = Form::new();
//! let zip = form.register_directives("zip", "ZIP code", "[required]99999").unwrap();
//!
//! let errors = form.check().unwrap_err();
//! assert_eq!(
//!     errors.to_string(),
//!     "Please correct the following fields:\n    ZIP code is required."
//! );
//!
//! for ch in "90210".chars() {
//!     form.handle(zip, EditEvent::Keystroke(ch));
//! }
//! assert!(form.check().is_ok());
//! ```

use std::fmt;

use maskform_core::{EditEvent, FieldSession, Verdict};
use slotmap::{SlotMap, new_key_type};

use crate::directive::expand;
use crate::error::{Error, Result};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a field within a form.
    pub struct FieldId;
}

/// A registered field.
#[derive(Debug, Clone)]
struct FormField {
    name: String,
    label: String,
    session: FieldSession,
}

/// An ordered collection of field sessions.
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: SlotMap<FieldId, FormField>,
    order: Vec<FieldId>,
}

static_assertions::assert_impl_all!(Form: Send);

impl Form {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field and return its id.
    ///
    /// Names are not required to be unique; [`find`](Self::find) returns the
    /// first field registered under a name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        session: FieldSession,
    ) -> FieldId {
        let name = name.into();
        let label = label.into();
        tracing::trace!(target: targets::FORM, name = %name, label = %label, "registered field");

        let id = self.fields.insert(FormField {
            name,
            label,
            session,
        });
        self.order.push(id);
        id
    }

    /// Add a field described by a raw mask attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the directives cannot be expanded or a field with
    /// the same name is already registered.
    pub fn register_directives(
        &mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        raw_mask: &str,
    ) -> Result<FieldId> {
        let name = name.into();
        if self.find(&name).is_some() {
            return Err(Error::DuplicateField(name));
        }
        let session = expand(raw_mask)?.session();
        Ok(self.register(name, label, session))
    }

    /// Remove a field, returning its session.
    pub fn unregister(&mut self, id: FieldId) -> Option<FieldSession> {
        let field = self.fields.remove(id)?;
        self.order.retain(|&other| other != id);
        tracing::trace!(target: targets::FORM, name = %field.name, "unregistered field");
        Some(field.session)
    }

    /// Get a field's session.
    pub fn field(&self, id: FieldId) -> Option<&FieldSession> {
        self.fields.get(id).map(|f| &f.session)
    }

    /// Get a field's session mutably.
    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut FieldSession> {
        self.fields.get_mut(id).map(|f| &mut f.session)
    }

    /// Get a field's name.
    pub fn name(&self, id: FieldId) -> Option<&str> {
        self.fields.get(id).map(|f| f.name.as_str())
    }

    /// Get a field's label.
    pub fn label(&self, id: FieldId) -> Option<&str> {
        self.fields.get(id).map(|f| f.label.as_str())
    }

    /// Find the first field with the given name.
    pub fn find(&self, name: &str) -> Option<FieldId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.fields[id].name == name)
    }

    /// Field ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.order.iter().copied()
    }

    /// The current value of the named field.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(|id| self.field(id)).map(FieldSession::value)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Deliver an edit to a field. Returns `None` if the field does not exist.
    pub fn handle(&mut self, id: FieldId, event: EditEvent) -> Option<Verdict> {
        self.field_mut(id).map(|session| session.handle(event))
    }

    /// Deliver an edit to the named field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if no field has that name.
    pub fn handle_named(&mut self, name: &str, event: EditEvent) -> Result<Verdict> {
        let id = self
            .find(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        self.handle(id, event)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }

    /// Check whether the form may be submitted.
    ///
    /// Every field carrying error text is reported with that text. A required
    /// field that is empty (ignoring whitespace) but has no error text is
    /// reported as missing.
    pub fn check(&self) -> std::result::Result<(), FormErrors> {
        let issues: Vec<FieldIssue> = self
            .order
            .iter()
            .filter_map(|&id| {
                let field = &self.fields[id];
                let session = &field.session;
                if !session.error().is_empty() {
                    Some(FieldIssue::Invalid {
                        field: id,
                        label: field.label.clone(),
                        error: session.error().to_string(),
                    })
                } else if session.constraints().is_required() && session.value().trim().is_empty() {
                    Some(FieldIssue::Missing {
                        field: id,
                        label: field.label.clone(),
                    })
                } else {
                    None
                }
            })
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            tracing::debug!(target: targets::FORM, count = issues.len(), "form check failed");
            Err(FormErrors { issues })
        }
    }
}

/// One field that blocks submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    /// The field carries error text.
    Invalid {
        field: FieldId,
        label: String,
        error: String,
    },
    /// The field is required but empty.
    Missing { field: FieldId, label: String },
}

impl FieldIssue {
    /// The offending field.
    pub fn field(&self) -> FieldId {
        match self {
            FieldIssue::Invalid { field, .. } | FieldIssue::Missing { field, .. } => *field,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Invalid { label, error, .. } => write!(f, "{label}: {error}"),
            FieldIssue::Missing { label, .. } => write!(f, "{label} is required."),
        }
    }
}

/// The fields that block a form from being submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors {
    issues: Vec<FieldIssue>,
}

impl FormErrors {
    /// The individual issues, in field order.
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Please correct the following fields:")?;
        for issue in &self.issues {
            write!(f, "\n    {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

#[cfg(test)]
mod tests {
    use super::*;
    use maskform_core::{ConstraintClass, FieldConstraints, Mask, NumericRange};

    fn type_into(form: &mut Form, id: FieldId, text: &str) {
        for ch in text.chars() {
            form.handle(id, EditEvent::Keystroke(ch));
        }
    }

    #[test]
    fn test_register_and_find() {
        let mut form = Form::new();
        assert!(form.is_empty());
        let phone = form.register(
            "phone",
            "Phone",
            FieldSession::new(Mask::new("999-9999"), FieldConstraints::new()),
        );
        assert_eq!(form.len(), 1);
        assert_eq!(form.find("phone"), Some(phone));
        assert_eq!(form.find("fax"), None);
        assert_eq!(form.label(phone), Some("Phone"));
        assert_eq!(form.name(phone), Some("phone"));
    }

    #[test]
    fn test_unregister() {
        let mut form = Form::new();
        let id = form.register("a", "A", FieldSession::new(Mask::new(""), FieldConstraints::new()));
        let session = form.unregister(id);
        assert!(session.is_some());
        assert!(form.is_empty());
        assert!(form.field(id).is_none());
        assert!(form.unregister(id).is_none());
        assert!(form.handle(id, EditEvent::Blur).is_none());
    }

    #[test]
    fn test_handle_routes_edits() {
        let mut form = Form::new();
        let id = form.register(
            "phone",
            "Phone",
            FieldSession::new(Mask::new("999-9999"), FieldConstraints::new()),
        );
        type_into(&mut form, id, "5551234");
        assert_eq!(form.value("phone"), Some("555-1234"));

        let verdict = form.handle_named("phone", EditEvent::Blur).unwrap();
        assert!(verdict.is_valid());
        assert!(matches!(
            form.handle_named("fax", EditEvent::Blur),
            Err(Error::UnknownField(name)) if name == "fax"
        ));
    }

    #[test]
    fn test_check_collects_issues_in_order() {
        let mut form = Form::new();
        let age = form.register(
            "age",
            "Age",
            FieldSession::new(
                Mask::new(""),
                FieldConstraints::new()
                    .with_class(ConstraintClass::Numeric(NumericRange::new(Some(18.0), None))),
            ),
        );
        form.register(
            "name",
            "Name",
            FieldSession::new(Mask::new(""), FieldConstraints::new().required()),
        );
        form.register(
            "notes",
            "Notes",
            FieldSession::new(Mask::new(""), FieldConstraints::new()),
        );

        type_into(&mut form, age, "12");
        form.handle(age, EditEvent::Blur);

        let errors = form.check().unwrap_err();
        assert_eq!(errors.issues().len(), 2);
        assert_eq!(errors.issues()[0].field(), age);
        assert_eq!(
            errors.to_string(),
            "Please correct the following fields:\n    \
             Age: must be greater than or equal to 18.\n    \
             Name is required."
        );
    }

    #[test]
    fn test_whitespace_only_required_field_is_missing() {
        let mut form = Form::new();
        let id = form.register(
            "name",
            "Name",
            FieldSession::new(Mask::new(""), FieldConstraints::new().required()),
        );
        type_into(&mut form, id, "  ");
        let errors = form.check().unwrap_err();
        assert_eq!(errors.issues()[0].to_string(), "Name is required.");
    }

    #[test]
    fn test_duplicate_directive_field() {
        let mut form = Form::new();
        form.register_directives("zip", "ZIP", "99999").unwrap();
        assert!(matches!(
            form.register_directives("zip", "ZIP", "99999"),
            Err(Error::DuplicateField(name)) if name == "zip"
        ));
    }
}
