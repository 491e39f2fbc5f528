//! Self-checks for the read-only index tables.
//!
//! Tables are built once and never mutated, so a single check right after
//! construction is enough. The check runs in debug builds, or in release
//! builds when the `check-invariants` feature is enabled.

use crate::mesh_error::MeshError;

/// Trait for structures whose derived tables can be re-validated from their inputs.
pub trait DebugInvariants {
    /// Panic with the first violated invariant when checking is enabled.
    fn debug_assert_invariants(&self);
    /// Recompute the derived tables and report the first mismatch.
    fn validate_invariants(&self) -> Result<(), MeshError>;
}

/// Run a fallible invariant check and panic on error when checking is enabled.
///
/// Expands to nothing in release builds without `check-invariants`.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[cartesian-mesh invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
