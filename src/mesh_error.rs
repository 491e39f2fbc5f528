//! MeshError: Unified error type for cartesian-mesh public APIs
//!
//! Every failure here is a deterministic caller error (bad parameters, bad
//! indices, bad geometry). Nothing is retried and nothing is silently
//! replaced by a default value.

use thiserror::Error;

/// Unified error type for cartesian-mesh operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Parameters that cannot describe a valid request, e.g. `k > D`,
    /// a zero-dimensional mesh, or a zero cell count.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    /// An orientation rank outside `[0, C(D,k))`.
    #[error("Rank {rank} out of range (expected < {count})")]
    RankOutOfRange { rank: usize, count: usize },
    /// A tuple, combination or batch has the wrong number of entries.
    #[error("Arity mismatch: expected {expected} entries, found {found}")]
    ArityMismatch { expected: usize, found: usize },
    /// An axis index outside `[0, D)`.
    #[error("Axis {axis} out of range for a {num_dims}-dimensional mesh")]
    AxisOutOfRange { axis: usize, num_dims: usize },
    /// A flat or per-axis local index outside its extent.
    #[error("Index {index} out of range (expected < {bound})")]
    IndexOutOfRange { index: usize, bound: usize },
    /// Domain bounds that do not describe a non-empty box.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Two sequences that must have equal length do not.
    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

impl MeshError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        MeshError::InvalidParameters(message.into())
    }
}
