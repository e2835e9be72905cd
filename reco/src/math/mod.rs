//! Vector and angle helpers over `glam::DVec3`.
//!
//! Conventions follow collider physics: polar angle θ measured from +z,
//! azimuth φ in the transverse plane, pseudorapidity η = -ln tan(θ/2).

pub mod eigen;

use glam::DVec3;

pub use eigen::{SymmetricEigen2, SymmetricEigen3, symmetric_eigen2, symmetric_eigen3};

/// Length of the projection onto the xy-plane.
#[inline]
pub fn magnitude_transverse(v: DVec3) -> f64 {
    v.x.hypot(v.y)
}

/// Polar angle θ in [0, π].
#[inline]
pub fn angle_polar(v: DVec3) -> f64 {
    magnitude_transverse(v).atan2(v.z)
}

/// Azimuthal angle φ in [-π, π].
#[inline]
pub fn angle_azimuthal(v: DVec3) -> f64 {
    v.y.atan2(v.x)
}

/// Pseudorapidity. ±∞ on the beam axis.
#[inline]
pub fn eta(v: DVec3) -> f64 {
    (v.z / magnitude_transverse(v)).asinh()
}

/// Polar angle of a given pseudorapidity.
#[inline]
pub fn eta_to_angle(eta: f64) -> f64 {
    2.0 * (-eta).exp().atan()
}

/// Cartesian vector from (r, θ, φ).
#[inline]
pub fn spherical_to_vector(r: f64, theta: f64, phi: f64) -> DVec3 {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    DVec3::new(
        r * sin_theta * cos_phi,
        r * sin_theta * sin_phi,
        r * cos_theta,
    )
}

/// Angle between two vectors in [0, π]; NaN if either is zero.
#[inline]
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    let cos = a.dot(b) / (a.length() * b.length());
    cos.clamp(-1.0, 1.0).acos()
}

/// Evaluates `Σ coeffs[i] * x^i` (Horner).
#[inline]
pub fn polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
