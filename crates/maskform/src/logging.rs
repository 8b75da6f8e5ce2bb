//! Tracing targets for the form layer.
//!
//! Engine-level targets live in [`maskform_core::logging::targets`].

/// Target names for log filtering.
pub mod targets {
    /// Directive expansion target.
    pub const DIRECTIVE: &str = "maskform::directive";
    /// Form aggregation target.
    pub const FORM: &str = "maskform::form";
    /// Form configuration target.
    pub const CONFIG: &str = "maskform::config";
}
