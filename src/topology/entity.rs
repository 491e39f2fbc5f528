//! Entity classes of a Cartesian mesh.
//!
//! A class is identified by how many of its axes are boundary-aligned
//! ("special"): cells have none, faces one, edges two, corners three.

use core::fmt;

use crate::mesh_error::MeshError;

/// The four classes of mesh points.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord, serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    /// Cell centres, no special axis.
    #[default]
    Cell,
    /// Face centres, one special axis (the face normal).
    Face,
    /// Edge midpoints, two special axes.
    Edge,
    /// Cell corners (vertices), three special axes.
    Corner,
}

impl EntityClass {
    /// All classes in increasing number of special axes.
    pub const ALL: [EntityClass; 4] = [
        EntityClass::Cell,
        EntityClass::Face,
        EntityClass::Edge,
        EntityClass::Corner,
    ];

    /// Number of boundary-aligned axes `k` for this class.
    #[inline]
    pub const fn special_axes(self) -> usize {
        match self {
            EntityClass::Cell => 0,
            EntityClass::Face => 1,
            EntityClass::Edge => 2,
            EntityClass::Corner => 3,
        }
    }

    /// Short lowercase name, used in log and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            EntityClass::Cell => "cell",
            EntityClass::Face => "face",
            EntityClass::Edge => "edge",
            EntityClass::Corner => "corner",
        }
    }
}

impl TryFrom<usize> for EntityClass {
    type Error = MeshError;

    fn try_from(special_axes: usize) -> Result<Self, Self::Error> {
        EntityClass::ALL
            .get(special_axes)
            .copied()
            .ok_or_else(|| {
                MeshError::invalid(format!(
                    "no entity class with {special_axes} special axes (expected 0..=3)"
                ))
            })
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
