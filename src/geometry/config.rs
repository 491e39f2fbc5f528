//! Mesh construction parameters.
//!
//! A [`MeshConfig`] is plain data: it can be built in code or deserialized
//! with serde (JSON, TOML, ...). Nothing is checked until
//! [`validate`](MeshConfig::validate) or mesh construction.

use crate::mesh_error::MeshError;
use crate::topology::index_space::AxisOrder;

/// Lower or upper boundary of an axis.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Lower,
    Upper,
}

impl Side {
    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            Side::Lower => 0,
            Side::Upper => 1,
        }
    }
}

/// Domain, resolution and traversal convention of a Cartesian mesh.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshConfig {
    /// `[min, max]` per axis.
    pub domain: Vec<[f64; 2]>,
    /// Cell count per axis.
    pub num_cells: Vec<usize>,
    /// `[lower, upper]` periodicity per axis; `None` means no periodic boundary.
    #[serde(default)]
    pub periodic: Option<Vec<[bool; 2]>>,
    #[serde(default)]
    pub axis_order: AxisOrder,
}

impl MeshConfig {
    pub fn new(domain: Vec<[f64; 2]>, num_cells: Vec<usize>) -> Self {
        Self {
            domain,
            num_cells,
            periodic: None,
            axis_order: AxisOrder::default(),
        }
    }

    /// Build from interleaved bounds `(x0, x1, y0, y1, ...)`.
    ///
    /// # Errors
    /// `LengthMismatch` if `bounds.len() != 2 * num_cells.len()`.
    pub fn from_flat_bounds(bounds: &[f64], num_cells: &[usize]) -> Result<Self, MeshError> {
        if bounds.len() != 2 * num_cells.len() {
            return Err(MeshError::LengthMismatch {
                expected: 2 * num_cells.len(),
                found: bounds.len(),
            });
        }
        let domain = bounds.chunks_exact(2).map(|b| [b[0], b[1]]).collect();
        Ok(Self::new(domain, num_cells.to_vec()))
    }

    pub fn with_periodic(mut self, periodic: Vec<[bool; 2]>) -> Self {
        self.periodic = Some(periodic);
        self
    }

    pub fn with_axis_order(mut self, axis_order: AxisOrder) -> Self {
        self.axis_order = axis_order;
        self
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.num_cells.len()
    }

    /// Periodicity flags with the default (all `false`) filled in.
    pub fn periodic_flags(&self) -> Vec<[bool; 2]> {
        self.periodic
            .clone()
            .unwrap_or_else(|| vec![[false; 2]; self.num_dims()])
    }

    /// Check that the configuration describes a non-empty box mesh.
    pub fn validate(&self) -> Result<(), MeshError> {
        let d = self.num_dims();
        if d == 0 {
            return Err(MeshError::invalid("mesh must have at least one dimension"));
        }
        if self.domain.len() != d {
            return Err(MeshError::LengthMismatch {
                expected: d,
                found: self.domain.len(),
            });
        }
        if let Some(periodic) = &self.periodic {
            if periodic.len() != d {
                return Err(MeshError::LengthMismatch {
                    expected: d,
                    found: periodic.len(),
                });
            }
        }
        if let Some(axis) = self.num_cells.iter().position(|&n| n == 0) {
            return Err(MeshError::invalid(format!("axis {axis} has zero cells")));
        }
        for (axis, &[lo, hi]) in self.domain.iter().enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(MeshError::InvalidGeometry(format!(
                    "axis {axis} bounds [{lo}, {hi}] are not finite"
                )));
            }
            if lo >= hi {
                return Err(MeshError::InvalidGeometry(format!(
                    "axis {axis} lower bound {lo} is not below upper bound {hi}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_bounds_are_paired_per_axis() {
        let cfg = MeshConfig::from_flat_bounds(&[0.0, 1.0, -2.0, 2.0], &[4, 8]).unwrap();
        assert_eq!(cfg.domain, vec![[0.0, 1.0], [-2.0, 2.0]]);
        assert_eq!(cfg.num_dims(), 2);
        cfg.validate().unwrap();
    }

    #[test]
    fn flat_bounds_length_checked() {
        assert_eq!(
            MeshConfig::from_flat_bounds(&[0.0, 1.0, 0.0], &[4, 8]),
            Err(MeshError::LengthMismatch { expected: 4, found: 3 })
        );
    }

    #[test]
    fn inverted_bounds_rejected() {
        let cfg = MeshConfig::new(vec![[1.0, 0.0]], vec![3]);
        assert!(matches!(cfg.validate(), Err(MeshError::InvalidGeometry(_))));
    }

    #[test]
    fn non_finite_bounds_rejected() {
        let cfg = MeshConfig::new(vec![[0.0, f64::INFINITY]], vec![3]);
        assert!(matches!(cfg.validate(), Err(MeshError::InvalidGeometry(_))));
    }

    #[test]
    fn periodic_length_checked() {
        let cfg = MeshConfig::new(vec![[0.0, 1.0], [0.0, 1.0]], vec![2, 2])
            .with_periodic(vec![[true, true]]);
        assert_eq!(
            cfg.validate(),
            Err(MeshError::LengthMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    fn default_periodicity_is_closed() {
        let cfg = MeshConfig::new(vec![[0.0, 1.0]; 3], vec![1, 1, 1]);
        assert_eq!(cfg.periodic_flags(), vec![[false, false]; 3]);
    }
}
