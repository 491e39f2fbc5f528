//! PointField: a scalar value per point of one `(class, orientation)`.
//!
//! The field is a thin, shape-checked wrapper over a [`Storage`] buffer of
//! length `total_points`. Slot `i` of the buffer holds the value at flat
//! index `i`; tuple access goes through the [`OrientationShape`] the field
//! was created for. Arithmetic is exposed as named methods that refuse to
//! combine fields living on different point sets.

use core::marker::PhantomData;

use num_traits::Num;

use crate::data::storage::{Storage, VecStorage};
use crate::geometry::cartesian::CartesianMesh;
use crate::mesh_error::MeshError;
use crate::topology::entity::EntityClass;
use crate::topology::index_space::{MeshIndexSpace, OrientationShape};

/// Values over the points of one `(class, orientation)`.
#[derive(Clone, Debug)]
pub struct PointField<V, S: Storage<V> = VecStorage<V>> {
    shape: OrientationShape,
    storage: S,
    _marker: PhantomData<V>,
}

impl<V, S: Storage<V>> PointField<V, S> {
    fn wrap(shape: OrientationShape, storage: S) -> Self {
        debug_assert_eq!(shape.total_points(), storage.len());
        Self {
            shape,
            storage,
            _marker: PhantomData,
        }
    }

    /// Field filled with a single value.
    pub fn constant(
        space: &MeshIndexSpace,
        class: EntityClass,
        orientation: usize,
        value: V,
    ) -> Result<Self, MeshError>
    where
        V: Clone,
    {
        let shape = space.shape(class, orientation)?.clone();
        let storage = S::with_len(shape.total_points(), value);
        Ok(Self::wrap(shape, storage))
    }

    /// Field taking ownership of `values`, one per flat index.
    ///
    /// # Errors
    /// `LengthMismatch` if `values.len() != total_points`.
    pub fn from_values(
        space: &MeshIndexSpace,
        class: EntityClass,
        orientation: usize,
        values: Vec<V>,
    ) -> Result<Self, MeshError> {
        let shape = space.shape(class, orientation)?.clone();
        if values.len() != shape.total_points() {
            return Err(MeshError::LengthMismatch {
                expected: shape.total_points(),
                found: values.len(),
            });
        }
        Ok(Self::wrap(shape, S::from_vec(values)))
    }

    /// Field initialised by evaluating `f` at every point position.
    pub fn from_fn<F>(
        mesh: &CartesianMesh,
        class: EntityClass,
        orientation: usize,
        mut f: F,
    ) -> Result<Self, MeshError>
    where
        F: FnMut(&[f64]) -> V,
    {
        let shape = mesh.index_space().shape(class, orientation)?.clone();
        let values: Vec<V> = mesh
            .coordinates_iter(class, orientation)?
            .map(|x| f(x.as_slice()))
            .collect();
        Ok(Self::wrap(shape, S::from_vec(values)))
    }

    #[inline]
    pub fn shape(&self) -> &OrientationShape {
        &self.shape
    }

    #[inline]
    pub fn class(&self) -> EntityClass {
        self.shape.class()
    }

    #[inline]
    pub fn orientation(&self) -> usize {
        self.shape.orientation()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[V] {
        self.storage.as_slice()
    }

    #[inline]
    pub fn values_mut(&mut self) -> &mut [V] {
        self.storage.as_mut_slice()
    }

    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn get(&self, flat: usize) -> Result<&V, MeshError> {
        self.storage.get(flat)
    }

    pub fn set(&mut self, flat: usize, value: V) -> Result<(), MeshError> {
        *self.storage.get_mut(flat)? = value;
        Ok(())
    }

    /// Value at a per-axis local tuple.
    pub fn get_local(&self, local: &[usize]) -> Result<&V, MeshError> {
        let flat = self.shape.to_flat(local)?;
        self.storage.get(flat)
    }

    pub fn set_local(&mut self, local: &[usize], value: V) -> Result<(), MeshError> {
        let flat = self.shape.to_flat(local)?;
        self.set(flat, value)
    }

    pub fn fill(&mut self, value: V)
    where
        V: Clone,
    {
        self.storage.as_mut_slice().fill(value);
    }

    /// New field on the same points with `f` applied to every value.
    pub fn map<W, T, F>(&self, f: F) -> PointField<W, T>
    where
        T: Storage<W>,
        F: FnMut(&V) -> W,
    {
        let values = self.values().iter().map(f).collect();
        PointField::wrap(self.shape.clone(), T::from_vec(values))
    }

    fn check_same_points<T: Storage<V>>(&self, other: &PointField<V, T>) -> Result<(), MeshError> {
        if self.len() != other.len() {
            return Err(MeshError::LengthMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        if self.shape != other.shape {
            return Err(MeshError::invalid(format!(
                "fields live on different points: {} {} vs {} {}",
                self.class(),
                self.orientation(),
                other.class(),
                other.orientation()
            )));
        }
        Ok(())
    }

    /// Elementwise combination of two fields on the same points.
    pub fn zip_with<T, F>(&self, other: &PointField<V, T>, mut f: F) -> Result<Self, MeshError>
    where
        T: Storage<V>,
        F: FnMut(&V, &V) -> V,
    {
        self.check_same_points(other)?;
        let values = self
            .values()
            .iter()
            .zip(other.values())
            .map(|(a, b)| f(a, b))
            .collect();
        Ok(Self::wrap(self.shape.clone(), S::from_vec(values)))
    }
}

impl<V, S> PointField<V, S>
where
    V: Num + Copy,
    S: Storage<V>,
{
    /// Field of zeros.
    pub fn zeros(space: &MeshIndexSpace, class: EntityClass, orientation: usize) -> Result<Self, MeshError> {
        Self::constant(space, class, orientation, V::zero())
    }

    pub fn add<T: Storage<V>>(&self, other: &PointField<V, T>) -> Result<Self, MeshError> {
        self.zip_with(other, |&a, &b| a + b)
    }

    pub fn sub<T: Storage<V>>(&self, other: &PointField<V, T>) -> Result<Self, MeshError> {
        self.zip_with(other, |&a, &b| a - b)
    }

    pub fn mul<T: Storage<V>>(&self, other: &PointField<V, T>) -> Result<Self, MeshError> {
        self.zip_with(other, |&a, &b| a * b)
    }

    /// Elementwise quotient.
    ///
    /// # Errors
    /// The location checks of [`zip_with`](Self::zip_with) first, then
    /// `InvalidParameters` if `other` holds a zero.
    pub fn div<T: Storage<V>>(&self, other: &PointField<V, T>) -> Result<Self, MeshError> {
        self.check_same_points(other)?;
        if let Some(flat) = other.values().iter().position(|v| v.is_zero()) {
            return Err(MeshError::invalid(format!(
                "division by zero at flat index {flat}"
            )));
        }
        self.zip_with(other, |&a, &b| a / b)
    }

    pub fn add_scalar(&self, value: V) -> Self {
        self.map(|&a| a + value)
    }

    pub fn scale(&self, factor: V) -> Self {
        self.map(|&a| a * factor)
    }

    /// Sum of elementwise products.
    pub fn dot<T: Storage<V>>(&self, other: &PointField<V, T>) -> Result<V, MeshError> {
        self.check_same_points(other)?;
        Ok(self
            .values()
            .iter()
            .zip(other.values())
            .fold(V::zero(), |acc, (&a, &b)| acc + a * b))
    }

    pub fn sum(&self) -> V {
        self.values().iter().fold(V::zero(), |acc, &a| acc + a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Field = PointField<f64>;

    #[test]
    fn constant_sized_by_total_points() {
        let space = MeshIndexSpace::new(&[4, 4]).unwrap();
        let f = Field::constant(&space, EntityClass::Face, 1, 9.0).unwrap();
        assert_eq!(f.len(), 20);
        assert!(f.values().iter().all(|&v| v == 9.0));
    }

    #[test]
    fn from_values_checks_length() {
        let space = MeshIndexSpace::new(&[2, 2]).unwrap();
        assert_eq!(
            Field::from_values(&space, EntityClass::Cell, 0, vec![1.0; 3]).unwrap_err(),
            MeshError::LengthMismatch { expected: 4, found: 3 }
        );
    }

    #[test]
    fn local_access_uses_index_space() {
        let space = MeshIndexSpace::new(&[3, 2]).unwrap();
        let mut f = Field::zeros(&space, EntityClass::Cell, 0).unwrap();
        f.set_local(&[2, 1], 7.0).unwrap();
        assert_eq!(*f.get(5).unwrap(), 7.0);
        assert_eq!(*f.get_local(&[2, 1]).unwrap(), 7.0);
        assert_eq!(
            f.set_local(&[3, 0], 1.0),
            Err(MeshError::IndexOutOfRange { index: 3, bound: 3 })
        );
    }

    #[test]
    fn arithmetic_on_matching_points() {
        let space = MeshIndexSpace::new(&[2, 2]).unwrap();
        let a = Field::from_values(&space, EntityClass::Cell, 0, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Field::constant(&space, EntityClass::Cell, 0, 2.0).unwrap();
        assert_eq!(a.add(&b).unwrap().values(), &[3.0, 4.0, 5.0, 6.0]);
        assert_eq!(a.sub(&b).unwrap().values(), &[-1.0, 0.0, 1.0, 2.0]);
        assert_eq!(a.mul(&b).unwrap().values(), &[2.0, 4.0, 6.0, 8.0]);
        assert_eq!(a.div(&b).unwrap().values(), &[0.5, 1.0, 1.5, 2.0]);
        assert_eq!(a.add_scalar(1.0).values(), &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(a.scale(0.5).values(), &[0.5, 1.0, 1.5, 2.0]);
        assert_eq!(a.dot(&b).unwrap(), 20.0);
        assert_eq!(a.sum(), 10.0);
    }

    #[test]
    fn mismatched_points_are_rejected() {
        let space = MeshIndexSpace::new(&[4, 4]).unwrap();
        let x_faces = Field::zeros(&space, EntityClass::Face, 0).unwrap();
        let y_faces = Field::zeros(&space, EntityClass::Face, 1).unwrap();
        let cells = Field::zeros(&space, EntityClass::Cell, 0).unwrap();
        // Same size, different orientation.
        assert!(matches!(
            x_faces.add(&y_faces),
            Err(MeshError::InvalidParameters(_))
        ));
        assert_eq!(
            x_faces.add(&cells).unwrap_err(),
            MeshError::LengthMismatch { expected: 20, found: 16 }
        );
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let space = MeshIndexSpace::new(&[2]).unwrap();
        let a = Field::constant(&space, EntityClass::Cell, 0, 1.0).unwrap();
        let z = Field::zeros(&space, EntityClass::Cell, 0).unwrap();
        assert!(matches!(a.div(&z), Err(MeshError::InvalidParameters(_))));
    }

    #[test]
    fn location_mismatch_wins_over_zero_divisor() {
        let space = MeshIndexSpace::new(&[2]).unwrap();
        let cells = Field::constant(&space, EntityClass::Cell, 0, 1.0).unwrap();
        let faces = Field::zeros(&space, EntityClass::Face, 0).unwrap();
        assert_eq!(
            cells.div(&faces).unwrap_err(),
            MeshError::LengthMismatch { expected: 2, found: 3 }
        );
    }

    #[test]
    fn integer_fields_work_too() {
        let space = MeshIndexSpace::new(&[3]).unwrap();
        let f = PointField::<i64>::from_values(&space, EntityClass::Face, 0, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(f.scale(3).sum(), 30);
        let g: PointField<f64> = f.map(|&v| v as f64 * 0.5);
        assert_eq!(g.values(), &[0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn from_fn_samples_coordinates() {
        let mesh = CartesianMesh::new(&[[0.0, 1.0], [0.0, 1.0]], &[2, 2]).unwrap();
        let f = Field::from_fn(&mesh, EntityClass::Cell, 0, |x| x[0] * x[0]).unwrap();
        assert_eq!(f.values(), &[0.0625, 0.0625, 0.5625, 0.5625]);
    }
}
