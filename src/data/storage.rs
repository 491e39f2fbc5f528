//! Pluggable storage for point-field buffers.
//!
//! A field owns one flat buffer with exactly one slot per flat index of its
//! `(class, orientation)`. This trait abstracts how that buffer is held so a
//! field can sit on a `Vec`, a memory map or a device-staging buffer without
//! changing the field API.

use core::fmt::{self, Debug};

use crate::mesh_error::MeshError;

/// Contiguous, indexable storage for `V` with slice access.
pub trait Storage<V>: Debug {
    /// Construct a buffer of `len`, filled with `fill`.
    fn with_len(len: usize, fill: V) -> Self
    where
        V: Clone;

    /// Take ownership of an existing vector.
    fn from_vec(values: Vec<V>) -> Self;

    /// Current length in elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entire read-only buffer.
    fn as_slice(&self) -> &[V];

    /// Entire mutable buffer.
    fn as_mut_slice(&mut self) -> &mut [V];

    /// Read slot `index`.
    fn get(&self, index: usize) -> Result<&V, MeshError> {
        let bound = self.len();
        self.as_slice()
            .get(index)
            .ok_or(MeshError::IndexOutOfRange { index, bound })
    }

    /// Mutable access to slot `index`.
    fn get_mut(&mut self, index: usize) -> Result<&mut V, MeshError> {
        let bound = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(MeshError::IndexOutOfRange { index, bound })
    }
}

/// `Vec`-backed storage (default).
#[derive(Clone, PartialEq)]
pub struct VecStorage<V>(pub(crate) Vec<V>);

impl<V> Debug for VecStorage<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecStorage")
            .field("len", &self.0.len())
            .finish()
    }
}

impl<V> Storage<V> for VecStorage<V> {
    fn with_len(len: usize, fill: V) -> Self
    where
        V: Clone,
    {
        Self(vec![fill; len])
    }

    fn from_vec(values: Vec<V>) -> Self {
        Self(values)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn as_slice(&self) -> &[V] {
        &self.0
    }

    fn as_mut_slice(&mut self) -> &mut [V] {
        &mut self.0
    }
}

impl<V> From<Vec<V>> for VecStorage<V> {
    fn from(v: Vec<V>) -> Self {
        Self(v)
    }
}

impl<V> VecStorage<V> {
    pub fn into_inner(self) -> Vec<V> {
        self.0
    }
}
