//! Data module: storage buffers and point fields

pub mod field;
pub mod storage;

pub use field::PointField;
pub use storage::{Storage, VecStorage};

/// Alias for the common Vec-backed `f64` field.
pub type CpuField = field::PointField<f64, VecStorage<f64>>;
