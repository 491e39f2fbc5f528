#![cfg_attr(docsrs, feature(doc_cfg))]
//! # cartesian-mesh
//!
//! cartesian-mesh is the indexing substrate for finite-volume and
//! finite-difference solvers on regular N-dimensional Cartesian meshes. It
//! enumerates every class of mesh point (cells, faces, edges, corners), the
//! orientations each class can take, and converts between flat storage
//! offsets and per-axis local tuples for any of them.
//!
//! ## Features
//! - Orientation enumeration: ranked combinations of boundary-aligned axes,
//!   cached per `(dimension, class)`
//! - Index space: per-orientation extents, totals and a strict flat/local
//!   bijection under an explicit [`AxisOrder`](topology::AxisOrder)
//! - Geometry: spacing, measures and coordinate arrays for every point class
//! - A thin, shape-checked [`PointField`](data::PointField) over pluggable storage
//! - Optional `rayon` feature for parallel batch conversion
//!
//! ## Usage
//!
//! ```rust
//! use cartesian_mesh::prelude::*;
//!
//! let mesh = CartesianMesh::new(&[[0.0, 1.0], [0.0, 1.0]], &[4, 4])?;
//! let space = mesh.index_space();
//! assert_eq!(space.num_orientations(EntityClass::Face)?, 2);
//! assert_eq!(space.total_points(EntityClass::Face, 0)?, 20);
//!
//! let local = space.to_local(13, EntityClass::Face, 0)?;
//! assert_eq!(space.to_flat(&local, EntityClass::Face, 0)?, 13);
//! # Ok::<(), cartesian_mesh::mesh_error::MeshError>(())
//! ```
//!
//! ## Determinism
//!
//! Every table is a pure function of the mesh parameters. Orientation ranks
//! follow lexicographic order of the special-axis tuples, and the flat
//! numbering follows the [`AxisOrder`](topology::AxisOrder) fixed at
//! construction, so identical inputs always give identical layouts.

pub mod data;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::field::PointField;
    pub use crate::data::storage::{Storage, VecStorage};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::cartesian::{CartesianMesh, CoordinateArrays};
    pub use crate::geometry::config::{MeshConfig, Side};
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::combination::{
        CombinationTable, binomial, checked_binomial, combination_table, combination_to_rank,
        combinations, enumerate, rank_to_combination,
    };
    pub use crate::topology::entity::EntityClass;
    pub use crate::topology::index_space::{AxisOrder, MeshIndexSpace, OrientationShape};
}
