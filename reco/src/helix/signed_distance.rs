use glam::DVec3;

use super::Helix;
use crate::math::magnitude_transverse;
use crate::units::TESLA;

impl Helix {
    /// Transverse distance of closest approach to `(x, y)`, signed by the
    /// side of the track the point lies on: positive when the track runs
    /// counter-clockwise around the point.
    pub fn geometric_signed_distance_xy(&self, x: f64, y: f64) -> f64 {
        let s = self.path_length_xy(x, y);
        let mut dca = self.at(s);
        dca.z = 0.0;
        let dca_vec = dca - DVec3::new(x, y, 0.0);

        let mut direction = if self.singular {
            self.at(1.0) - self.at(0.0)
        } else {
            self.momentum_at(s, 1.0 * TESLA)
        };
        direction.z = 0.0;

        let cross = dca_vec.x * direction.y - dca_vec.y * direction.x;
        let sign = if cross >= 0.0 { 1.0 } else { -1.0 };
        sign * magnitude_transverse(dca_vec)
    }

    /// [`Helix::geometric_signed_distance_xy`] in the curvature convention:
    /// divided by `h`, so positive when the point lies inside the circle.
    pub fn curvature_signed_distance_xy(&self, x: f64, y: f64) -> f64 {
        let geometric = self.geometric_signed_distance_xy(x, y);
        if self.singular || self.h == 0 {
            geometric
        } else {
            geometric / f64::from(self.h)
        }
    }

    /// 3D distance of closest approach to `pos` with the sign of the
    /// transverse geometric convention.
    pub fn geometric_signed_distance(&self, pos: DVec3) -> f64 {
        let transverse = self.geometric_signed_distance_xy(pos.x, pos.y);
        side_sign(transverse) * self.distance(pos, true)
    }

    /// 3D distance of closest approach to `pos` with the sign of the
    /// transverse curvature convention.
    pub fn curvature_signed_distance(&self, pos: DVec3) -> f64 {
        let transverse = self.curvature_signed_distance_xy(pos.x, pos.y);
        side_sign(transverse) * self.distance(pos, true)
    }
}

/// +1 for zero (either sign) and positive values, -1 otherwise.
#[inline]
fn side_sign(transverse: f64) -> f64 {
    if transverse >= 0.0 { 1.0 } else { -1.0 }
}
