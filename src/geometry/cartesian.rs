//! Regular Cartesian mesh geometry.
//!
//! [`CartesianMesh`] pairs a [`MeshIndexSpace`] with uniform per-axis
//! spacing. Positions follow one rule for every entity class: along a special
//! axis a point sits on a cell boundary, along any other axis it sits at the
//! cell centre.
//!
//! ```text
//! x = domain_min + h * i            (special axis)
//! x = domain_min + h * (i + 0.5)    (non-special axis)
//! ```

use crate::geometry::config::{MeshConfig, Side};
use crate::mesh_error::MeshError;
use crate::topology::entity::EntityClass;
use crate::topology::index_space::{MeshIndexSpace, OrientationShape};

/// Per-axis coordinate arrays for one `(class, orientation)`.
///
/// `axis(i)[flat]` is the coordinate along axis `i` of the point with flat
/// index `flat`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoordinateArrays {
    axes: Vec<Vec<f64>>,
}

impl CoordinateArrays {
    #[inline]
    pub fn num_dims(&self) -> usize {
        self.axes.len()
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.axes.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinate array of one axis.
    pub fn axis(&self, axis: usize) -> Result<&[f64], MeshError> {
        self.axes
            .get(axis)
            .map(Vec::as_slice)
            .ok_or(MeshError::AxisOutOfRange {
                axis,
                num_dims: self.num_dims(),
            })
    }

    /// Position of the point with flat index `flat`.
    pub fn point(&self, flat: usize) -> Result<Vec<f64>, MeshError> {
        if flat >= self.len() {
            return Err(MeshError::IndexOutOfRange {
                index: flat,
                bound: self.len(),
            });
        }
        Ok(self.axes.iter().map(|a| a[flat]).collect())
    }

    pub fn into_axes(self) -> Vec<Vec<f64>> {
        self.axes
    }
}

/// A regular rectilinear mesh over an axis-aligned box.
#[derive(Clone, Debug, PartialEq)]
pub struct CartesianMesh {
    index_space: MeshIndexSpace,
    domain: Vec<[f64; 2]>,
    periodic: Vec<[bool; 2]>,
    cell_size: Vec<f64>,
}

impl CartesianMesh {
    /// Build a mesh with default traversal order and no periodic boundaries.
    pub fn new(domain: &[[f64; 2]], num_cells: &[usize]) -> Result<Self, MeshError> {
        Self::from_config(&MeshConfig::new(domain.to_vec(), num_cells.to_vec()))
    }

    /// Build a mesh from a validated configuration.
    pub fn from_config(config: &MeshConfig) -> Result<Self, MeshError> {
        config.validate()?;
        let index_space = MeshIndexSpace::with_axis_order(&config.num_cells, config.axis_order)?;
        let cell_size = config
            .domain
            .iter()
            .zip(&config.num_cells)
            .map(|(&[lo, hi], &n)| (hi - lo) / n as f64)
            .collect::<Vec<_>>();
        log::debug!(
            "cartesian mesh: domain={:?} cell_size={cell_size:?}",
            config.domain
        );
        Ok(Self {
            index_space,
            domain: config.domain.clone(),
            periodic: config.periodic_flags(),
            cell_size,
        })
    }

    #[inline]
    pub fn index_space(&self) -> &MeshIndexSpace {
        &self.index_space
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.index_space.num_dims()
    }

    #[inline]
    pub fn num_cells(&self) -> &[usize] {
        self.index_space.num_cells()
    }

    /// `[min, max]` per axis.
    #[inline]
    pub fn domain(&self) -> &[[f64; 2]] {
        &self.domain
    }

    /// Uniform spacing per axis.
    #[inline]
    pub fn cell_size(&self) -> &[f64] {
        &self.cell_size
    }

    fn check_axis(&self, axis: usize) -> Result<(), MeshError> {
        if axis >= self.num_dims() {
            return Err(MeshError::AxisOutOfRange {
                axis,
                num_dims: self.num_dims(),
            });
        }
        Ok(())
    }

    /// Length of the domain along `axis`.
    pub fn domain_size(&self, axis: usize) -> Result<f64, MeshError> {
        self.check_axis(axis)?;
        let [lo, hi] = self.domain[axis];
        Ok(hi - lo)
    }

    pub fn domain_volume(&self) -> f64 {
        self.domain.iter().map(|[lo, hi]| hi - lo).product()
    }

    pub fn cell_volume(&self) -> f64 {
        self.cell_size.iter().product()
    }

    pub fn is_periodic(&self, axis: usize, side: Side) -> Result<bool, MeshError> {
        self.check_axis(axis)?;
        Ok(self.periodic[axis][side.slot()])
    }

    /// Measure of one entity: the product of cell sizes over its non-special axes.
    ///
    /// Cell volume for cells, face area for faces, edge length for edges in 3D.
    pub fn measure(&self, class: EntityClass, orientation: usize) -> Result<f64, MeshError> {
        let shape = self.index_space.shape(class, orientation)?;
        Ok(self
            .cell_size
            .iter()
            .enumerate()
            .filter(|(axis, _)| !shape.is_special(*axis))
            .map(|(_, h)| h)
            .product())
    }

    pub fn face_area(&self, orientation: usize) -> Result<f64, MeshError> {
        self.measure(EntityClass::Face, orientation)
    }

    pub fn edge_length(&self, orientation: usize) -> Result<f64, MeshError> {
        self.measure(EntityClass::Edge, orientation)
    }

    /// The `n` cell-centre positions along `axis`.
    pub fn cell_centres(&self, axis: usize) -> Result<Vec<f64>, MeshError> {
        self.check_axis(axis)?;
        let n = self.num_cells()[axis];
        Ok((0..n).map(|i| self.axis_position(axis, i, false)).collect())
    }

    /// The `n + 1` cell-boundary positions along `axis`.
    pub fn cell_nodes(&self, axis: usize) -> Result<Vec<f64>, MeshError> {
        self.check_axis(axis)?;
        let n = self.num_cells()[axis];
        Ok((0..=n).map(|i| self.axis_position(axis, i, true)).collect())
    }

    #[inline]
    fn axis_position(&self, axis: usize, local: usize, special: bool) -> f64 {
        let offset = if special { 0.0 } else { 0.5 };
        self.domain[axis][0] + self.cell_size[axis] * (local as f64 + offset)
    }

    fn shape_position(&self, shape: &OrientationShape, local: &[usize]) -> Vec<f64> {
        local
            .iter()
            .enumerate()
            .map(|(axis, &i)| self.axis_position(axis, i, shape.is_special(axis)))
            .collect()
    }

    /// Physical position of one point given by its local tuple.
    pub fn position(
        &self,
        local: &[usize],
        class: EntityClass,
        orientation: usize,
    ) -> Result<Vec<f64>, MeshError> {
        let shape = self.index_space.shape(class, orientation)?;
        // Validates arity and extents.
        shape.to_flat(local)?;
        Ok(self.shape_position(shape, local))
    }

    /// Positions of every point of `(class, orientation)` in flat order.
    ///
    /// Computed lazily on each call; nothing is cached on the mesh.
    pub fn coordinates_iter(
        &self,
        class: EntityClass,
        orientation: usize,
    ) -> Result<impl Iterator<Item = Vec<f64>> + '_, MeshError> {
        let shape = self.index_space.shape(class, orientation)?;
        Ok(shape
            .iter_local()
            .map(move |local| self.shape_position(shape, &local)))
    }

    /// Coordinate arrays (one per axis) of `(class, orientation)`.
    pub fn coordinates(
        &self,
        class: EntityClass,
        orientation: usize,
    ) -> Result<CoordinateArrays, MeshError> {
        let total = self.index_space.total_points(class, orientation)?;
        let mut axes: Vec<Vec<f64>> = (0..self.num_dims())
            .map(|_| Vec::with_capacity(total))
            .collect();
        for point in self.coordinates_iter(class, orientation)? {
            for (column, x) in axes.iter_mut().zip(point) {
                column.push(x);
            }
        }
        Ok(CoordinateArrays { axes })
    }
}
