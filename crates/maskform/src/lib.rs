//! Declarative input masks and form validation.
//!
//! `maskform` builds on [`maskform_core`] with the pieces a host application
//! needs to drive whole forms:
//!
//! - **Directives**: Expand `[required]`, `[numeric 10 100]`, `[date mm/dd/yyyy]`
//!   and friends into a positional mask plus whole-field constraints
//! - **Forms**: Own many field sessions and decide whether a form may be submitted
//! - **Configuration**: Describe a form's fields in TOML
//!
//! # Example
//!
//! ```
//! use maskform::{EditEvent, Form, FormConfig};
//!
//! let config = FormConfig::from_toml_str(r#"
//!     [[field]]
//!     name = "age"
//!     label = "Age"
//!     mask = "[required][numeric 18 120]"
//! "#).unwrap();
//!
//! let mut form = Form::from_config(&config).unwrap();
//! let age = form.find("age").unwrap();
//!
//! form.handle(age, EditEvent::Keystroke('9'));
//! form.handle(age, EditEvent::Blur);
//!
//! let errors = form.check().unwrap_err();
//! assert_eq!(
//!     errors.to_string(),
//!     "Please correct the following fields:\n    Age: must be greater than or equal to 18."
//! );
//! ```

pub mod config;
pub mod directive;
pub mod form;
pub mod logging;

mod error;

pub use error::{Error, Result};

pub use config::{Completion, FieldConfig, FormConfig};
pub use directive::{FieldSpec, expand};
pub use form::{FieldId, FieldIssue, Form, FormErrors};

pub use maskform_core::{
    ConstraintClass, DateFormat, EditEvent, FieldConstraints, FieldError, FieldSession,
    LengthBounds, LiteralCompletion, Mask, NumericRange, Verdict, Violation,
};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::config::{FieldConfig, FormConfig};
    pub use crate::directive::{FieldSpec, expand};
    pub use crate::form::{FieldId, Form, FormErrors};
    pub use crate::{Error, Result};
    pub use maskform_core::{EditEvent, FieldConstraints, FieldSession, Mask, Verdict};
}
