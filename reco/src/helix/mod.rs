//! Charged-particle trajectories in a solenoidal field.
//!
//! A [`Helix`] is parameterized by arc length `s` measured from its origin.
//! In the transverse plane the track is a circle of radius `1/curvature`;
//! along z it advances `sin(dip)` per unit of arc length. Zero curvature
//! (no field or a neutral particle) turns the helix into a straight line,
//! which every query handles separately.
//!
//! Closest-approach queries have no closed form on a helix and are solved
//! numerically: a transverse-plane seed refined with Newton's method for a
//! point, a circle-circle seed refined with a shrinking grid scan for two
//! helices. When no solution exists the arc length [`NO_SOLUTION`] is
//! returned instead of an error.

mod path_length;
mod signed_distance;

pub use path_length::NO_RADIUS_CROSSING;

#[cfg(test)]
mod tests;

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::fmt;

use glam::DVec3;

use crate::edm::{ReconstructedParticle, TrackParameters};
use crate::math::magnitude_transverse;
use crate::units::{BENDING_CONSTANT, UM};

/// Arc length returned when a geometric solution does not exist.
pub const NO_SOLUTION: f64 = 3.0e33;

/// World size used by [`Helix::check`] when none is given, in cm.
pub const DEFAULT_WORLD_SIZE: f64 = 1.0e5;

/// Default smallest scan step of [`Helix::path_lengths`].
pub const DEFAULT_MIN_STEP_SIZE: f64 = 10.0 * UM;

/// Default smallest scan range of [`Helix::path_lengths`].
pub const DEFAULT_MIN_RANGE: f64 = 10.0 * crate::units::CM;

/// Failed parameter sanity check. [`HelixDefect::code`] gives the numeric
/// code reported by [`Helix::bad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HelixDefect {
    #[error("dip angle is not finite")]
    NonFiniteDipAngle,
    #[error("curvature is not finite")]
    NonFiniteCurvature,
    #[error("dip angle magnitude exceeds 1.58 rad")]
    DipAngleTooLarge,
    #[error("dip angle is within 1/world of pi/2")]
    DipAngleNearVertical,
    #[error("curvature exceeds the world size")]
    CurvatureTooLarge,
    #[error("curvature is negative")]
    NegativeCurvature,
    #[error("handedness is not +1 or -1")]
    InvalidHandedness,
}

impl HelixDefect {
    pub fn code(self) -> i32 {
        match self {
            HelixDefect::NonFiniteDipAngle => 11,
            HelixDefect::NonFiniteCurvature => 12,
            HelixDefect::DipAngleTooLarge => 21,
            HelixDefect::CurvatureTooLarge => 22,
            HelixDefect::InvalidHandedness => 24,
            HelixDefect::DipAngleNearVertical => 31,
            HelixDefect::NegativeCurvature => 32,
        }
    }
}

/// Helical (or straight) trajectory.
///
/// Cached trigonometric values are private and refreshed by the setters, so
/// they always match `phase` and `dip_angle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helix {
    singular: bool,
    origin: DVec3,
    dip_angle: f64,
    curvature: f64,
    phase: f64,
    /// -sign(q B)
    h: i32,

    cos_dip_angle: f64,
    sin_dip_angle: f64,
    cos_phase: f64,
    sin_phase: f64,
}

impl Helix {
    /// Helix from its geometric parameters. `h >= 0` means +1.
    ///
    /// A negative curvature describes the same trajectory with the opposite
    /// handedness and the phase rotated by π.
    pub fn new(curvature: f64, dip_angle: f64, phase: f64, origin: DVec3, h: i32) -> Self {
        let mut helix = Self::unset();
        helix.set_parameters(curvature, dip_angle, phase, origin, h);
        helix
    }

    /// Helix of a particle with momentum `p` (GeV) and integer `charge`
    /// passing `origin` in a field `b` (T) along z.
    pub fn from_momentum(p: DVec3, origin: DVec3, b: f64, charge: i32) -> Self {
        let mut helix = Self::unset();
        helix.set_momentum(p, origin, b, charge);
        helix
    }

    /// Helix through the point of closest approach described by fitted track
    /// parameters.
    pub fn from_track_parameters(track: &TrackParameters, b: f64) -> Self {
        let mut helix = Self::unset();
        helix.set_track_parameters(track, b);
        helix
    }

    /// Helix of a reconstructed particle. Every track parameter set of every
    /// track is applied in turn, so the last one wins. `None` without tracks.
    pub fn from_particle(particle: &ReconstructedParticle, b: f64) -> Option<Self> {
        let mut helix: Option<Helix> = None;
        for track in &particle.tracks {
            helix
                .get_or_insert_with(Self::unset)
                .set_track_parameters(track, b);
        }
        helix
    }

    fn unset() -> Self {
        Self {
            singular: true,
            origin: DVec3::ZERO,
            dip_angle: 0.0,
            curvature: 0.0,
            phase: 0.0,
            h: 1,
            cos_dip_angle: 1.0,
            sin_dip_angle: 0.0,
            cos_phase: 1.0,
            sin_phase: 0.0,
        }
    }

    pub fn set_parameters(
        &mut self,
        curvature: f64,
        dip_angle: f64,
        phase: f64,
        origin: DVec3,
        h: i32,
    ) {
        self.h = if h >= 0 { 1 } else { -1 };
        self.origin = origin;
        self.set_dip_angle(dip_angle);
        self.set_phase(phase);

        // May flip h and the phase, so it goes last.
        self.set_curvature(curvature);

        // A straight line always uses h = +1. Since phase = psi - h π/2 the
        // phase has to follow when the caller passed h = -1.
        if self.singular && self.h == -1 {
            self.h = 1;
            self.set_phase(self.phase - PI);
        }
    }

    pub fn set_momentum(&mut self, p: DVec3, origin: DVec3, b: f64, charge: i32) {
        self.h = if f64::from(charge) * b <= 0.0 { 1 } else { -1 };
        let h = f64::from(self.h);
        if p.x == 0.0 && p.y == 0.0 {
            self.set_phase(FRAC_PI_4 * (1.0 - 2.0 * h));
        } else {
            self.set_phase(p.y.atan2(p.x) - h * FRAC_PI_2);
        }
        self.set_dip_angle(p.z.atan2(magnitude_transverse(p)));
        self.origin = origin;

        let curvature =
            (BENDING_CONSTANT * f64::from(charge) * b / (p.length() * self.cos_dip_angle)).abs();
        self.set_curvature(curvature);
    }

    pub fn set_track_parameters(&mut self, track: &TrackParameters, b: f64) {
        let momentum = track.momentum();
        let charge = track.charge() as i32;
        let (sin_phi, cos_phi) = track.phi.sin_cos();
        let a = track.loc.x;
        let position = DVec3::new(-a * sin_phi, a * cos_phi, track.loc.y);
        self.set_momentum(momentum, position, b, charge);
    }

    /// Stores `|value|`; a negative value flips the handedness and rotates
    /// the phase by π. Values within machine epsilon of zero switch to the
    /// straight-line parameterization.
    pub fn set_curvature(&mut self, value: f64) {
        if value < 0.0 {
            self.curvature = -value;
            self.h = -self.h;
            self.set_phase(self.phase + PI);
        } else {
            self.curvature = value;
        }
        self.singular = self.curvature.abs() <= f64::EPSILON;
    }

    /// Sets the phase, folding it into [-π, π].
    pub fn set_phase(&mut self, value: f64) {
        self.phase = value;
        self.cos_phase = value.cos();
        self.sin_phase = value.sin();
        if self.phase.abs() > PI {
            self.phase = self.sin_phase.atan2(self.cos_phase);
        }
    }

    pub fn set_dip_angle(&mut self, value: f64) {
        self.dip_angle = value;
        self.cos_dip_angle = value.cos();
        self.sin_dip_angle = value.sin();
    }

    pub fn dip_angle(&self) -> f64 {
        self.dip_angle
    }

    /// 1/R in the xy-plane.
    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    /// Azimuth of the origin seen from the circle center.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// -sign(q B); +1 for straight lines.
    pub fn h(&self) -> i32 {
        self.h
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// True for the straight-line (zero curvature) case.
    pub fn is_singular(&self) -> bool {
        self.singular
    }

    /// x of the circle center; 0 for straight lines.
    pub fn x_center(&self) -> f64 {
        if self.singular {
            0.0
        } else {
            self.origin.x - self.cos_phase / self.curvature
        }
    }

    /// y of the circle center; 0 for straight lines.
    pub fn y_center(&self) -> f64 {
        if self.singular {
            0.0
        } else {
            self.origin.y - self.sin_phase / self.curvature
        }
    }

    /// Turning angle accumulated after arc length `s`, offset by the phase.
    #[inline]
    fn angle_at(&self, s: f64) -> f64 {
        self.phase + s * f64::from(self.h) * self.curvature * self.cos_dip_angle
    }

    #[inline]
    pub fn x(&self, s: f64) -> f64 {
        if self.singular {
            self.origin.x - s * self.cos_dip_angle * self.sin_phase
        } else {
            self.origin.x + (self.angle_at(s).cos() - self.cos_phase) / self.curvature
        }
    }

    #[inline]
    pub fn y(&self, s: f64) -> f64 {
        if self.singular {
            self.origin.y + s * self.cos_dip_angle * self.cos_phase
        } else {
            self.origin.y + (self.angle_at(s).sin() - self.sin_phase) / self.curvature
        }
    }

    #[inline]
    pub fn z(&self, s: f64) -> f64 {
        self.origin.z + s * self.sin_dip_angle
    }

    /// Position at arc length `s`.
    #[inline]
    pub fn at(&self, s: f64) -> DVec3 {
        DVec3::new(self.x(s), self.y(s), self.z(s))
    }

    #[inline]
    pub fn cx(&self, s: f64) -> f64 {
        if self.singular {
            -self.cos_dip_angle * self.sin_phase
        } else {
            -self.angle_at(s).sin() * f64::from(self.h) * self.cos_dip_angle
        }
    }

    #[inline]
    pub fn cy(&self, s: f64) -> f64 {
        if self.singular {
            self.cos_dip_angle * self.cos_phase
        } else {
            self.angle_at(s).cos() * f64::from(self.h) * self.cos_dip_angle
        }
    }

    #[inline]
    pub fn cz(&self, _s: f64) -> f64 {
        self.sin_dip_angle
    }

    /// Unit tangent at arc length `s`.
    #[inline]
    pub fn cat(&self, s: f64) -> DVec3 {
        DVec3::new(self.cx(s), self.cy(s), self.cz(s))
    }

    /// Arc length of one full turn; `f64::MAX` for straight lines.
    pub fn period(&self) -> f64 {
        if self.singular {
            f64::MAX
        } else {
            (2.0 * PI / (f64::from(self.h) * self.curvature * self.cos_dip_angle)).abs()
        }
    }

    /// Momentum at the origin in a field `b` (T). Zero for straight lines,
    /// whose momentum the geometry does not determine.
    pub fn momentum(&self, b: f64) -> DVec3 {
        if self.singular {
            return DVec3::ZERO;
        }
        let pt = (BENDING_CONSTANT * b).abs() / self.curvature.abs();
        let direction = self.phase + f64::from(self.h) * FRAC_PI_2;
        DVec3::new(
            pt * direction.cos(),
            pt * direction.sin(),
            pt * self.dip_angle.tan(),
        )
    }

    /// Momentum at arc length `s` in a field `b` (T).
    pub fn momentum_at(&self, s: f64, b: f64) -> DVec3 {
        let mut moved = *self;
        moved.move_origin(s);
        moved.momentum(b)
    }

    /// Charge sign implied by the handedness in a field `b`.
    pub fn charge(&self, b: f64) -> i32 {
        if b > 0.0 { -self.h } else { self.h }
    }

    /// Re-anchors the parameterization so that the point at `s` becomes the
    /// origin. The physical curve is unchanged.
    pub fn move_origin(&mut self, s: f64) {
        if self.singular {
            self.origin = self.at(s);
        } else {
            let new_origin = self.at(s);
            let new_phase =
                (new_origin.y - self.y_center()).atan2(new_origin.x - self.x_center());
            self.origin = new_origin;
            self.set_phase(new_phase);
        }
    }

    /// Parameter sanity check against a world size (cm).
    pub fn check(&self, world_size: f64) -> Result<(), HelixDefect> {
        if !self.dip_angle.is_finite() {
            return Err(HelixDefect::NonFiniteDipAngle);
        }
        if !self.curvature.is_finite() {
            return Err(HelixDefect::NonFiniteCurvature);
        }
        if self.dip_angle.abs() > 1.58 {
            return Err(HelixDefect::DipAngleTooLarge);
        }
        if (self.dip_angle.abs() - FRAC_PI_2).abs() < 1.0 / world_size {
            return Err(HelixDefect::DipAngleNearVertical);
        }
        if self.curvature.abs() > world_size {
            return Err(HelixDefect::CurvatureTooLarge);
        }
        if self.curvature < 0.0 {
            return Err(HelixDefect::NegativeCurvature);
        }
        if self.h.abs() != 1 {
            return Err(HelixDefect::InvalidHandedness);
        }
        Ok(())
    }

    /// Numeric code of the first failed check, 0 when healthy.
    pub fn bad(&self, world_size: f64) -> i32 {
        self.check(world_size).err().map_or(0, HelixDefect::code)
    }

    pub fn valid(&self, world_size: f64) -> bool {
        self.check(world_size).is_ok()
    }
}

impl fmt::Display for Helix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(curvature = {}, dip angle = {}, phase = {}, h = {}, origin = {} {} {})",
            self.curvature,
            self.dip_angle,
            self.phase,
            self.h,
            self.origin.x,
            self.origin.y,
            self.origin.z
        )
    }
}
