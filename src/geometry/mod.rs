//! Physical geometry of regular Cartesian meshes.

pub mod cartesian;
pub mod config;

pub use cartesian::{CartesianMesh, CoordinateArrays};
pub use config::{MeshConfig, Side};
