//! Combinatorial side of the mesh: entity classes, their orientations and
//! the flat/local index tables built from them.
//!
//! - [`entity`]: the four entity classes (cell, face, edge, corner)
//! - [`combination`]: enumeration and ranking of special-axis combinations
//! - [`index_space`]: per-orientation extents and index conversion

pub mod combination;
pub mod entity;
pub mod index_space;

pub use combination::{CombinationTable, binomial, checked_binomial, combination_table};
pub use entity::EntityClass;
pub use index_space::{AxisOrder, MeshIndexSpace, OrientationShape};
