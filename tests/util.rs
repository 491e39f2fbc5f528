#![allow(dead_code)]
use cartesian_mesh::prelude::*;

/// Unit box `[0, 1]^D` with the given cell counts.
pub fn unit_box(num_cells: &[usize]) -> CartesianMesh {
    let domain = vec![[0.0, 1.0]; num_cells.len()];
    CartesianMesh::new(&domain, num_cells).unwrap()
}

/// Every `(class, orientation)` pair present on `space`.
pub fn locations(space: &MeshIndexSpace) -> Vec<(EntityClass, usize)> {
    space
        .classes()
        .flat_map(|c| (0..space.num_orientations(c).unwrap()).map(move |o| (c, o)))
        .collect()
}

pub fn assert_close(got: f64, want: f64) {
    assert!(
        (got - want).abs() <= 1e-12 * want.abs().max(1.0),
        "got {got}, want {want}"
    );
}
