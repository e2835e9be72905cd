//! Shower-shape moments of a cluster.

use glam::{DMat2, DMat3, DVec2, DVec3};

use crate::math::{angle_azimuthal, angle_polar, symmetric_eigen2, symmetric_eigen3};

/// Second-moment descriptors of the hit distribution around the centroid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShowerShape {
    pub radius: f64,
    pub dispersion: f64,
    /// Eigenvalues of the (θ, φ) covariance, ascending.
    pub widths_2d: [f64; 2],
    /// Eigenvalues of the (x, y, z) covariance, ascending.
    pub widths_3d: [f64; 3],
    /// Unit principal axis oriented along the centroid; zero when the
    /// moments are undefined.
    pub axis: DVec3,
}

impl ShowerShape {
    /// Shape of `samples` (hit position, weight) around `centroid`.
    ///
    /// Fewer than two samples give an all-zero shape. With zero total weight
    /// only the radius is computed.
    pub fn compute(centroid: DVec3, samples: &[(DVec3, f64)]) -> Self {
        let mut shape = ShowerShape::default();
        if samples.len() <= 1 {
            return shape;
        }

        let mut radius = 0.0;
        let mut dispersion = 0.0;
        let mut w_sum = 0.0;
        let mut sum2_2d = DMat2::ZERO;
        let mut sum2_3d = DMat3::ZERO;
        let mut sum1_2d = DVec2::ZERO;
        let mut sum1_3d = DVec3::ZERO;

        for &(position, w) in samples {
            let angles = DVec2::new(angle_polar(position), angle_azimuthal(position));
            let delta2 = (centroid - position).length_squared();

            radius += delta2;
            dispersion += delta2 * w;

            sum2_2d += outer2(angles) * w;
            sum2_3d += outer3(position) * w;
            sum1_2d += angles * w;
            sum1_3d += position * w;
            w_sum += w;
        }

        shape.radius = (radius / (samples.len() as f64 - 1.0)).sqrt();

        if w_sum > 0.0 {
            let inv = 1.0 / w_sum;
            shape.dispersion = (dispersion * inv).sqrt();

            let mean_2d = sum1_2d * inv;
            let mean_3d = sum1_3d * inv;
            let cov2 = sum2_2d * inv - outer2(mean_2d);
            let cov3 = sum2_3d * inv - outer3(mean_3d);

            let eigen2 = symmetric_eigen2(cov2);
            let eigen3 = symmetric_eigen3(cov3);
            shape.widths_2d = eigen2.values;
            shape.widths_3d = eigen3.values;

            let axis = eigen3.principal_axis();
            shape.axis = if axis.dot(centroid) < 0.0 { -axis } else { axis };
        }

        shape
    }
}

#[inline]
fn outer2(v: DVec2) -> DMat2 {
    DMat2::from_cols(v * v.x, v * v.y)
}

#[inline]
fn outer3(v: DVec3) -> DMat3 {
    DMat3::from_cols(v * v.x, v * v.y, v * v.z)
}
