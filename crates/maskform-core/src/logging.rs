//! Logging facilities for maskform.
//!
//! maskform uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("maskform_core::engine=trace")
//!         .init();
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "maskform_core";
    /// Mask engine target.
    pub const ENGINE: &str = "maskform_core::engine";
    /// Constraint validator target.
    pub const CONSTRAINTS: &str = "maskform_core::constraints";
    /// Field session target.
    pub const SESSION: &str = "maskform_core::session";
}

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
