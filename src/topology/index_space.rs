//! Mesh index space: per-orientation shapes and flat/local index conversion.
//!
//! For a mesh with `n_i` cells along axis `i`, an entity of class `k` and
//! orientation `o` has `n_i + 1` points along each of its special axes and
//! `n_i` points along every other axis. Each `(class, orientation)` pair owns
//! an independent flat numbering `0..total_points`, mapped to per-axis local
//! tuples by a fixed [`AxisOrder`].
//!
//! All tables are computed once in [`MeshIndexSpace::new`] and never change,
//! so the index space is `Send + Sync` and can be queried from many threads.

use core::iter::Rev;
use core::ops::Range;

use itertools::Either;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::combination::{binomial, combination_table};
use crate::topology::entity::EntityClass;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Axis sequence produced by [`AxisOrder`].
pub type AxisIter = Either<Rev<Range<usize>>, Range<usize>>;

/// Order in which axis strides are accumulated.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrder {
    /// Row-major: the last axis varies fastest (stride 1), axis 0 slowest.
    #[default]
    LastFastest,
    /// Column-major: axis 0 varies fastest (stride 1).
    FirstFastest,
}

impl AxisOrder {
    /// Axes from fastest- to slowest-varying.
    pub fn fastest_first(self, num_dims: usize) -> AxisIter {
        match self {
            AxisOrder::LastFastest => Either::Left((0..num_dims).rev()),
            AxisOrder::FirstFastest => Either::Right(0..num_dims),
        }
    }

    /// Axes from slowest- to fastest-varying.
    pub fn slowest_first(self, num_dims: usize) -> AxisIter {
        match self {
            AxisOrder::LastFastest => Either::Right(0..num_dims),
            AxisOrder::FirstFastest => Either::Left((0..num_dims).rev()),
        }
    }
}

/// Shape of one `(class, orientation)` point set.
///
/// Only obtainable from a [`MeshIndexSpace`], so extents, strides and total
/// always agree.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OrientationShape {
    class: EntityClass,
    orientation: usize,
    /// Special axes, strictly increasing.
    combination: Vec<usize>,
    extents: Vec<usize>,
    strides: Vec<usize>,
    total: usize,
    axis_order: AxisOrder,
}

impl OrientationShape {
    /// # Errors
    /// `InvalidParameters` if an extent or the point total overflows `usize`.
    fn new(
        num_cells: &[usize],
        class: EntityClass,
        orientation: usize,
        combination: &[usize],
        axis_order: AxisOrder,
    ) -> Result<Self, MeshError> {
        let extents = num_cells
            .iter()
            .enumerate()
            .map(|(axis, &n)| {
                let extent = if combination.contains(&axis) {
                    n.checked_add(1)
                } else {
                    Some(n)
                };
                extent.ok_or_else(|| {
                    MeshError::invalid(format!("axis {axis}: {n} cells leave no room for n + 1 points"))
                })
            })
            .collect::<Result<Vec<usize>, _>>()?;
        let mut strides = vec![0; extents.len()];
        let mut stride: usize = 1;
        for axis in axis_order.fastest_first(extents.len()) {
            strides[axis] = stride;
            stride = stride.checked_mul(extents[axis]).ok_or_else(|| {
                MeshError::invalid(format!(
                    "{class} orientation {orientation}: point count of extents {extents:?} overflows usize"
                ))
            })?;
        }
        Ok(Self {
            class,
            orientation,
            combination: combination.to_vec(),
            extents,
            strides,
            total: stride,
            axis_order,
        })
    }

    #[inline]
    pub fn class(&self) -> EntityClass {
        self.class
    }

    #[inline]
    pub fn orientation(&self) -> usize {
        self.orientation
    }

    /// Special (boundary-aligned) axes in increasing order.
    #[inline]
    pub fn combination(&self) -> &[usize] {
        &self.combination
    }

    /// Whether `axis` is one of the special axes.
    #[inline]
    pub fn is_special(&self, axis: usize) -> bool {
        self.combination.contains(&axis)
    }

    /// Per-axis point counts.
    #[inline]
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// Per-axis flat-index strides under this shape's axis order.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Product of the extents.
    #[inline]
    pub fn total_points(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.extents.len()
    }

    /// Flat index of a local tuple.
    ///
    /// # Errors
    /// `ArityMismatch` if `local.len() != D`; `IndexOutOfRange` if any
    /// coordinate is outside its extent.
    pub fn to_flat(&self, local: &[usize]) -> Result<usize, MeshError> {
        if local.len() != self.num_dims() {
            return Err(MeshError::ArityMismatch {
                expected: self.num_dims(),
                found: local.len(),
            });
        }
        let mut index = 0;
        let mut stride = 1;
        for axis in self.axis_order.fastest_first(self.num_dims()) {
            let extent = self.extents[axis];
            if local[axis] >= extent {
                return Err(MeshError::IndexOutOfRange {
                    index: local[axis],
                    bound: extent,
                });
            }
            index += local[axis] * stride;
            stride *= extent;
        }
        Ok(index)
    }

    /// Local tuple of a flat index; exact inverse of [`to_flat`](Self::to_flat).
    ///
    /// # Errors
    /// `IndexOutOfRange` if `flat >= total_points`.
    pub fn to_local(&self, flat: usize) -> Result<Vec<usize>, MeshError> {
        if flat >= self.total {
            return Err(MeshError::IndexOutOfRange {
                index: flat,
                bound: self.total,
            });
        }
        let mut local = vec![0; self.num_dims()];
        self.fill_local(flat, &mut local);
        Ok(local)
    }

    /// Divide out the strides slowest axis first. `flat` must be in range.
    fn fill_local(&self, flat: usize, local: &mut [usize]) {
        let mut remaining = flat;
        let mut stride = self.total;
        for axis in self.axis_order.slowest_first(self.num_dims()) {
            stride /= self.extents[axis];
            local[axis] = remaining / stride;
            remaining %= stride;
        }
    }

    /// Local tuples of every point in flat order.
    pub fn iter_local(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        (0..self.total).map(move |flat| {
            let mut local = vec![0; self.num_dims()];
            self.fill_local(flat, &mut local);
            local
        })
    }

    /// Flat indices for a batch of tuples given as parallel arrays, one per axis.
    ///
    /// # Errors
    /// `ArityMismatch` if there are not exactly `D` columns,
    /// `LengthMismatch` if the columns differ in length, and the
    /// per-element errors of [`to_flat`](Self::to_flat).
    pub fn to_flat_batch<C: AsRef<[usize]> + Sync>(
        &self,
        columns: &[C],
    ) -> Result<Vec<usize>, MeshError> {
        if columns.len() != self.num_dims() {
            return Err(MeshError::ArityMismatch {
                expected: self.num_dims(),
                found: columns.len(),
            });
        }
        let count = columns.first().map_or(0, |c| c.as_ref().len());
        if let Some(bad) = columns.iter().find(|c| c.as_ref().len() != count) {
            return Err(MeshError::LengthMismatch {
                expected: count,
                found: bad.as_ref().len(),
            });
        }
        let element = |i: usize| {
            let local: Vec<usize> = columns.iter().map(|c| c.as_ref()[i]).collect();
            self.to_flat(&local)
        };

        #[cfg(feature = "rayon")]
        let flat = (0..count).into_par_iter().map(element).collect();
        #[cfg(not(feature = "rayon"))]
        let flat = (0..count).map(element).collect();
        flat
    }

    /// Local tuples for a batch of flat indices, returned as parallel arrays
    /// (one column of length `flat.len()` per axis).
    pub fn to_local_batch(&self, flat: &[usize]) -> Result<Vec<Vec<usize>>, MeshError> {
        #[cfg(feature = "rayon")]
        let tuples: Vec<Vec<usize>> = flat
            .par_iter()
            .map(|&f| self.to_local(f))
            .collect::<Result<_, _>>()?;
        #[cfg(not(feature = "rayon"))]
        let tuples: Vec<Vec<usize>> = flat
            .iter()
            .map(|&f| self.to_local(f))
            .collect::<Result<_, _>>()?;

        let mut columns: Vec<Vec<usize>> = (0..self.num_dims())
            .map(|_| Vec::with_capacity(flat.len()))
            .collect();
        for tuple in tuples {
            for (column, value) in columns.iter_mut().zip(tuple) {
                column.push(value);
            }
        }
        Ok(columns)
    }
}

/// Construction parameters of a [`MeshIndexSpace`], its serialized form.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct IndexSpaceParams {
    num_cells: Vec<usize>,
    #[serde(default)]
    axis_order: AxisOrder,
}

/// Index tables for every entity class of one mesh.
///
/// Serializes as its construction parameters; deserializing rebuilds the
/// tables through [`MeshIndexSpace::with_axis_order`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(into = "IndexSpaceParams", try_from = "IndexSpaceParams")]
pub struct MeshIndexSpace {
    num_cells: Vec<usize>,
    axis_order: AxisOrder,
    /// `classes[k][o]`, for `k <= min(D, 3)`.
    classes: Vec<Vec<OrientationShape>>,
}

impl MeshIndexSpace {
    /// Build the tables with the default (row-major) axis order.
    pub fn new(num_cells: &[usize]) -> Result<Self, MeshError> {
        Self::with_axis_order(num_cells, AxisOrder::default())
    }

    /// Build the tables for the given cell counts and axis order.
    ///
    /// # Errors
    /// `InvalidParameters` if `num_cells` is empty, has a zero entry, or
    /// describes a point set too large to number with `usize`.
    pub fn with_axis_order(num_cells: &[usize], axis_order: AxisOrder) -> Result<Self, MeshError> {
        let num_dims = num_cells.len();
        if num_dims == 0 {
            return Err(MeshError::invalid("mesh must have at least one dimension"));
        }
        if let Some(axis) = num_cells.iter().position(|&n| n == 0) {
            return Err(MeshError::invalid(format!(
                "axis {axis} has zero cells"
            )));
        }

        let mut classes = Vec::with_capacity(4);
        for class in EntityClass::ALL
            .into_iter()
            .take_while(|c| c.special_axes() <= num_dims)
        {
            let table = combination_table(num_dims, class.special_axes())?;
            let shapes = table
                .iter()
                .enumerate()
                .map(|(o, comb)| OrientationShape::new(num_cells, class, o, comb, axis_order))
                .collect::<Result<Vec<_>, _>>()?;
            classes.push(shapes);
        }

        let space = Self {
            num_cells: num_cells.to_vec(),
            axis_order,
            classes,
        };
        log::debug!(
            "index space: D={num_dims} cells={:?} order={axis_order:?} orientations={:?}",
            space.num_cells,
            space.classes.iter().map(Vec::len).collect::<Vec<_>>()
        );
        crate::debug_invariants!(space.validate_invariants(), "MeshIndexSpace");
        Ok(space)
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.num_cells.len()
    }

    #[inline]
    pub fn num_cells(&self) -> &[usize] {
        &self.num_cells
    }

    #[inline]
    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    /// Entity classes present on this mesh (`k <= min(D, 3)`).
    pub fn classes(&self) -> impl Iterator<Item = EntityClass> + '_ {
        EntityClass::ALL.into_iter().take(self.classes.len())
    }

    /// Whether `class` exists on this mesh.
    #[inline]
    pub fn supports(&self, class: EntityClass) -> bool {
        class.special_axes() < self.classes.len()
    }

    fn class_shapes(&self, class: EntityClass) -> Result<&[OrientationShape], MeshError> {
        self.classes
            .get(class.special_axes())
            .map(Vec::as_slice)
            .ok_or_else(|| {
                MeshError::invalid(format!(
                    "{class} class needs {} special axes but the mesh has {} dimensions",
                    class.special_axes(),
                    self.num_dims()
                ))
            })
    }

    /// Number of orientations of `class`, i.e. `C(D, k)`.
    pub fn num_orientations(&self, class: EntityClass) -> Result<usize, MeshError> {
        Ok(self.class_shapes(class)?.len())
    }

    /// Shape of one `(class, orientation)` point set.
    ///
    /// # Errors
    /// `InvalidParameters` if the class does not exist on this mesh,
    /// `RankOutOfRange` if the orientation does not exist.
    pub fn shape(&self, class: EntityClass, orientation: usize) -> Result<&OrientationShape, MeshError> {
        let shapes = self.class_shapes(class)?;
        shapes.get(orientation).ok_or(MeshError::RankOutOfRange {
            rank: orientation,
            count: shapes.len(),
        })
    }

    /// Iterate all shapes of `class` in orientation order.
    pub fn shapes(&self, class: EntityClass) -> Result<impl Iterator<Item = &OrientationShape>, MeshError> {
        Ok(self.class_shapes(class)?.iter())
    }

    pub fn extents(&self, class: EntityClass, orientation: usize) -> Result<&[usize], MeshError> {
        Ok(self.shape(class, orientation)?.extents())
    }

    pub fn total_points(&self, class: EntityClass, orientation: usize) -> Result<usize, MeshError> {
        Ok(self.shape(class, orientation)?.total_points())
    }

    /// Orientation whose special axes are `special_axes` (any order).
    pub fn orientation_of(&self, class: EntityClass, special_axes: &[usize]) -> Result<usize, MeshError> {
        let shapes = self.class_shapes(class)?;
        let rank = crate::topology::combination::combination_to_rank(
            self.num_dims(),
            class.special_axes(),
            special_axes,
        )?;
        debug_assert!(rank < shapes.len());
        Ok(rank)
    }

    pub fn to_flat(&self, local: &[usize], class: EntityClass, orientation: usize) -> Result<usize, MeshError> {
        self.shape(class, orientation)?.to_flat(local)
    }

    pub fn to_local(&self, flat: usize, class: EntityClass, orientation: usize) -> Result<Vec<usize>, MeshError> {
        self.shape(class, orientation)?.to_local(flat)
    }

    pub fn to_flat_batch<C: AsRef<[usize]> + Sync>(
        &self,
        columns: &[C],
        class: EntityClass,
        orientation: usize,
    ) -> Result<Vec<usize>, MeshError> {
        self.shape(class, orientation)?.to_flat_batch(columns)
    }

    pub fn to_local_batch(
        &self,
        flat: &[usize],
        class: EntityClass,
        orientation: usize,
    ) -> Result<Vec<Vec<usize>>, MeshError> {
        self.shape(class, orientation)?.to_local_batch(flat)
    }

    /// Local tuples of every point of `(class, orientation)` in flat order.
    pub fn iter_local(
        &self,
        class: EntityClass,
        orientation: usize,
    ) -> Result<impl Iterator<Item = Vec<usize>> + '_, MeshError> {
        Ok(self.shape(class, orientation)?.iter_local())
    }
}

impl From<MeshIndexSpace> for IndexSpaceParams {
    fn from(space: MeshIndexSpace) -> Self {
        Self {
            num_cells: space.num_cells,
            axis_order: space.axis_order,
        }
    }
}

impl TryFrom<IndexSpaceParams> for MeshIndexSpace {
    type Error = MeshError;

    fn try_from(params: IndexSpaceParams) -> Result<Self, Self::Error> {
        Self::with_axis_order(&params.num_cells, params.axis_order)
    }
}

impl DebugInvariants for MeshIndexSpace {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "MeshIndexSpace invalid");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        let d = self.num_dims();
        let expected_classes = d.min(3) + 1;
        if self.classes.len() != expected_classes {
            return Err(MeshError::LengthMismatch {
                expected: expected_classes,
                found: self.classes.len(),
            });
        }
        for (k, shapes) in self.classes.iter().enumerate() {
            let count = binomial(d, k);
            if shapes.len() != count {
                return Err(MeshError::LengthMismatch {
                    expected: count,
                    found: shapes.len(),
                });
            }
            for (o, shape) in shapes.iter().enumerate() {
                if shape.orientation != o || shape.class.special_axes() != k {
                    return Err(MeshError::invalid(format!(
                        "shape stored at class {k} orientation {o} is labelled {} {}",
                        shape.class, shape.orientation
                    )));
                }
                for axis in 0..d {
                    let want = self.num_cells[axis] + usize::from(shape.is_special(axis));
                    if shape.extents[axis] != want {
                        return Err(MeshError::LengthMismatch {
                            expected: want,
                            found: shape.extents[axis],
                        });
                    }
                }
                let product: usize = shape.extents.iter().product();
                if shape.total != product {
                    return Err(MeshError::LengthMismatch {
                        expected: product,
                        found: shape.total,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(MeshIndexSpace: Send, Sync);
    static_assertions::assert_impl_all!(OrientationShape: Send, Sync);

    #[test]
    fn two_dimensional_counts() {
        let space = MeshIndexSpace::new(&[4, 4]).unwrap();
        assert_eq!(space.num_orientations(EntityClass::Cell).unwrap(), 1);
        assert_eq!(space.total_points(EntityClass::Cell, 0).unwrap(), 16);
        assert_eq!(space.num_orientations(EntityClass::Face).unwrap(), 2);
        assert_eq!(space.extents(EntityClass::Face, 0).unwrap(), &[5, 4]);
        assert_eq!(space.extents(EntityClass::Face, 1).unwrap(), &[4, 5]);
        assert_eq!(space.total_points(EntityClass::Face, 0).unwrap(), 20);
        assert_eq!(space.total_points(EntityClass::Face, 1).unwrap(), 20);
        assert_eq!(space.num_orientations(EntityClass::Edge).unwrap(), 1);
        assert_eq!(space.total_points(EntityClass::Edge, 0).unwrap(), 25);
        assert!(!space.supports(EntityClass::Corner));
        assert!(matches!(
            space.total_points(EntityClass::Corner, 0),
            Err(MeshError::InvalidParameters(_))
        ));
    }

    #[test]
    fn one_dimensional_mesh_has_cells_and_faces_only() {
        let space = MeshIndexSpace::new(&[7]).unwrap();
        assert_eq!(
            space.classes().collect::<Vec<_>>(),
            vec![EntityClass::Cell, EntityClass::Face]
        );
        assert_eq!(space.total_points(EntityClass::Face, 0).unwrap(), 8);
    }

    #[test]
    fn four_dimensional_mesh_caps_at_corners() {
        let space = MeshIndexSpace::new(&[2, 3, 4, 5]).unwrap();
        assert_eq!(space.classes().count(), 4);
        assert_eq!(space.num_orientations(EntityClass::Corner).unwrap(), 4);
        assert_eq!(space.num_orientations(EntityClass::Edge).unwrap(), 6);
        // (0,1,3) is rank 1 among 3-subsets of 4 axes.
        assert_eq!(space.extents(EntityClass::Corner, 1).unwrap(), &[3, 4, 4, 6]);
    }

    #[test]
    fn orientation_out_of_range() {
        let space = MeshIndexSpace::new(&[4, 4]).unwrap();
        assert_eq!(
            space.total_points(EntityClass::Face, 2),
            Err(MeshError::RankOutOfRange { rank: 2, count: 2 })
        );
    }

    #[test]
    fn invalid_construction() {
        assert!(matches!(
            MeshIndexSpace::new(&[]),
            Err(MeshError::InvalidParameters(_))
        ));
        assert!(matches!(
            MeshIndexSpace::new(&[3, 0]),
            Err(MeshError::InvalidParameters(_))
        ));
    }

    #[test]
    fn row_major_strides() {
        let space = MeshIndexSpace::new(&[2, 3, 4]).unwrap();
        let shape = space.shape(EntityClass::Cell, 0).unwrap();
        assert_eq!(shape.strides(), &[12, 4, 1]);
        assert_eq!(shape.to_flat(&[1, 2, 3]).unwrap(), 23);
        assert_eq!(shape.to_local(23).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn column_major_strides() {
        let space = MeshIndexSpace::with_axis_order(&[2, 3, 4], AxisOrder::FirstFastest).unwrap();
        let shape = space.shape(EntityClass::Cell, 0).unwrap();
        assert_eq!(shape.strides(), &[1, 2, 6]);
        assert_eq!(shape.to_flat(&[1, 2, 3]).unwrap(), 1 + 4 + 18);
        assert_eq!(shape.to_local(23).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn to_flat_rejects_bad_tuples() {
        let space = MeshIndexSpace::new(&[4, 4]).unwrap();
        assert_eq!(
            space.to_flat(&[4, 0], EntityClass::Cell, 0),
            Err(MeshError::IndexOutOfRange { index: 4, bound: 4 })
        );
        // Faces normal to x have 5 points along x.
        assert_eq!(space.to_flat(&[4, 0], EntityClass::Face, 0).unwrap(), 16);
        assert_eq!(
            space.to_flat(&[1, 1, 1], EntityClass::Cell, 0),
            Err(MeshError::ArityMismatch { expected: 2, found: 3 })
        );
    }

    #[test]
    fn to_local_rejects_flat_past_end() {
        let space = MeshIndexSpace::new(&[4, 4]).unwrap();
        assert_eq!(
            space.to_local(20, EntityClass::Face, 1),
            Err(MeshError::IndexOutOfRange { index: 20, bound: 20 })
        );
    }

    #[test]
    fn iter_local_is_flat_order() {
        let space = MeshIndexSpace::new(&[2, 3]).unwrap();
        let shape = space.shape(EntityClass::Face, 1).unwrap();
        for (flat, local) in shape.iter_local().enumerate() {
            assert_eq!(shape.to_flat(&local).unwrap(), flat);
        }
        assert_eq!(shape.iter_local().count(), 8);
    }

    #[test]
    fn batch_matches_scalar() {
        let space = MeshIndexSpace::new(&[3, 2, 2]).unwrap();
        let shape = space.shape(EntityClass::Edge, 1).unwrap();
        let flat: Vec<usize> = (0..shape.total_points()).rev().collect();
        let columns = shape.to_local_batch(&flat).unwrap();
        assert_eq!(columns.len(), 3);
        for (i, &f) in flat.iter().enumerate() {
            let local = shape.to_local(f).unwrap();
            for axis in 0..3 {
                assert_eq!(columns[axis][i], local[axis]);
            }
        }
        assert_eq!(shape.to_flat_batch(&columns).unwrap(), flat);
    }

    #[test]
    fn batch_rejects_ragged_columns() {
        let space = MeshIndexSpace::new(&[3, 3]).unwrap();
        let columns = vec![vec![0, 1], vec![0]];
        assert_eq!(
            space.to_flat_batch(&columns, EntityClass::Cell, 0),
            Err(MeshError::LengthMismatch { expected: 2, found: 1 })
        );
        let one = vec![vec![0usize]];
        assert_eq!(
            space.to_flat_batch(&one, EntityClass::Cell, 0),
            Err(MeshError::ArityMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    fn orientation_of_special_axes() {
        let space = MeshIndexSpace::new(&[2, 2, 2]).unwrap();
        assert_eq!(space.orientation_of(EntityClass::Edge, &[1, 2]).unwrap(), 2);
        assert_eq!(space.orientation_of(EntityClass::Face, &[2]).unwrap(), 2);
        let shape = space.shape(EntityClass::Edge, 2).unwrap();
        assert_eq!(shape.combination(), &[1, 2]);
        assert!(shape.is_special(2) && !shape.is_special(0));
    }

    #[test]
    fn invariants_hold_after_construction() {
        let space = MeshIndexSpace::new(&[3, 1, 2]).unwrap();
        space.validate_invariants().unwrap();
        space.debug_assert_invariants();
    }

    #[test]
    fn corrupted_total_is_reported() {
        let mut space = MeshIndexSpace::new(&[2, 2]).unwrap();
        space.classes[1][0].total += 1;
        assert_eq!(
            space.validate_invariants(),
            Err(MeshError::LengthMismatch { expected: 6, found: 7 })
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn point_totals_beyond_usize_are_rejected() {
        assert!(matches!(
            MeshIndexSpace::new(&[1 << 40, 1 << 40]),
            Err(MeshError::InvalidParameters(_))
        ));
    }

    #[test]
    fn boundary_extent_overflow_is_rejected() {
        // Cells fit exactly; faces would need usize::MAX + 1 points.
        assert!(matches!(
            MeshIndexSpace::new(&[usize::MAX]),
            Err(MeshError::InvalidParameters(_))
        ));
    }

    #[test]
    fn serializes_as_construction_parameters() {
        let space = MeshIndexSpace::with_axis_order(&[3, 2], AxisOrder::FirstFastest).unwrap();
        let json = serde_json::to_string(&space).unwrap();
        assert_eq!(json, r#"{"num_cells":[3,2],"axis_order":"first_fastest"}"#);
        let back: MeshIndexSpace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, space);
        back.validate_invariants().unwrap();
    }

    #[test]
    fn deserializing_rebuilds_and_checks_tables() {
        let space: MeshIndexSpace = serde_json::from_str(r#"{"num_cells":[2]}"#).unwrap();
        assert_eq!(space.axis_order(), AxisOrder::LastFastest);
        let shape = space.shape(EntityClass::Face, 0).unwrap();
        assert_eq!(shape.extents(), &[3]);
        assert_eq!(
            shape.to_local(3).unwrap_err(),
            MeshError::IndexOutOfRange { index: 3, bound: 3 }
        );
        assert!(serde_json::from_str::<MeshIndexSpace>(r#"{"num_cells":[0]}"#).is_err());
        assert!(serde_json::from_str::<MeshIndexSpace>(r#"{"num_cells":[]}"#).is_err());
    }

    #[test]
    fn batch_columns_reserve_full_length() {
        let space = MeshIndexSpace::new(&[4, 4, 4]).unwrap();
        let flat: Vec<usize> = (0..40).collect();
        let columns = space.to_local_batch(&flat, EntityClass::Cell, 0).unwrap();
        assert!(columns.iter().all(|c| c.len() == 40 && c.capacity() >= 40));
    }
}
