//! Eigen-decomposition of small symmetric matrices.
//!
//! Thin wrapper over nalgebra's `SymmetricEigen` that returns eigenvalues in
//! ascending order together with the matching unit eigenvectors.

use glam::{DMat2, DMat3, DVec2, DVec3};
use nalgebra::{Matrix2, Matrix3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricEigen2 {
    /// Ascending.
    pub values: [f64; 2],
    pub vectors: [DVec2; 2],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricEigen3 {
    /// Ascending.
    pub values: [f64; 3],
    pub vectors: [DVec3; 3],
}

impl SymmetricEigen3 {
    /// Eigenvector of the largest eigenvalue.
    pub fn principal_axis(&self) -> DVec3 {
        self.vectors[2]
    }
}

/// Decomposes a symmetric 2x2 matrix. Only the lower triangle is read.
pub fn symmetric_eigen2(m: DMat2) -> SymmetricEigen2 {
    let a = Matrix2::new(m.x_axis.x, m.y_axis.x, m.x_axis.y, m.y_axis.y);
    let eigen = a.symmetric_eigen();

    let mut order = [0usize, 1];
    order.sort_by(|&i, &j| eigen.eigenvalues[i].total_cmp(&eigen.eigenvalues[j]));

    let column = |i: usize| DVec2::new(eigen.eigenvectors[(0, i)], eigen.eigenvectors[(1, i)]);
    SymmetricEigen2 {
        values: order.map(|i| eigen.eigenvalues[i]),
        vectors: order.map(column),
    }
}

/// Decomposes a symmetric 3x3 matrix. Only the lower triangle is read.
pub fn symmetric_eigen3(m: DMat3) -> SymmetricEigen3 {
    let a = Matrix3::new(
        m.x_axis.x, m.y_axis.x, m.z_axis.x, //
        m.x_axis.y, m.y_axis.y, m.z_axis.y, //
        m.x_axis.z, m.y_axis.z, m.z_axis.z,
    );
    let eigen = a.symmetric_eigen();

    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| eigen.eigenvalues[i].total_cmp(&eigen.eigenvalues[j]));

    let column = |i: usize| {
        DVec3::new(
            eigen.eigenvectors[(0, i)],
            eigen.eigenvectors[(1, i)],
            eigen.eigenvectors[(2, i)],
        )
    };
    SymmetricEigen3 {
        values: order.map(|i| eigen.eigenvalues[i]),
        vectors: order.map(column),
    }
}
