use glam::DVec3;
use tracing::trace;

use super::{DEFAULT_MIN_RANGE, DEFAULT_MIN_STEP_SIZE, Helix, NO_SOLUTION};
use crate::units::UM;

/// Both arc lengths returned by [`Helix::path_length_at_radius`] when the
/// trajectory never reaches the radius.
pub const NO_RADIUS_CROSSING: f64 = 999_999_999.0;

const MAX_ITERATIONS: i32 = 100;
const PLANE_MAX_ITERATIONS: usize = 20;
const NEWTON_TOLERANCE: f64 = 1.0 * UM;

impl Helix {
    /// Arc length of the point of closest approach to `p` in the xy-plane,
    /// within one turn of the origin. Exact for points on the curve.
    pub fn fudge_path_length(&self, p: DVec3) -> f64 {
        let dx = p.x - self.origin.x;
        let dy = p.y - self.origin.y;

        if self.singular {
            (dy * self.cos_phase - dx * self.sin_phase) / self.cos_dip_angle
        } else {
            (dy * self.cos_phase - dx * self.sin_phase)
                .atan2(1.0 / self.curvature + dx * self.cos_phase + dy * self.sin_phase)
                / (f64::from(self.h) * self.curvature * self.cos_dip_angle)
        }
    }

    /// Transverse closest approach to the point `(x, y)`.
    pub fn path_length_xy(&self, x: f64, y: f64) -> f64 {
        self.fudge_path_length(DVec3::new(x, y, 0.0))
    }

    /// Arc length of the point of closest approach to `p`.
    ///
    /// With `scan_periods` the search walks whole turns forward and back
    /// from the transverse seed to pick the turn nearest in z before the
    /// Newton refinement. Without it Newton starts from the seed directly,
    /// and for points several turns away it may settle on another turn or
    /// not converge at all; [`Helix::path_length_with_status`] reports which.
    pub fn path_length(&self, p: DVec3, scan_periods: bool) -> f64 {
        self.path_length_with_status(p, scan_periods).0
    }

    /// [`Helix::path_length`] plus whether the Newton refinement met its
    /// 1 µm tolerance within the iteration cap.
    pub fn path_length_with_status(&self, p: DVec3, scan_periods: bool) -> (f64, bool) {
        let d = p - self.origin;

        if self.singular {
            let s = self.cos_dip_angle * (self.cos_phase * d.y - self.sin_phase * d.x)
                + self.sin_dip_angle * d.z;
            return (s, true);
        }

        let mut s = self.fudge_path_length(p);

        if scan_periods {
            let ds = self.period();
            let mut dmin = (self.at(s) - p).length();
            let mut jmin = 0;
            for j in 1..MAX_ITERATIONS {
                let dist = (self.at(s + f64::from(j) * ds) - p).length();
                if dist >= dmin {
                    break;
                }
                dmin = dist;
                jmin = j;
            }
            for j in (-MAX_ITERATIONS + 1..=-1).rev() {
                let dist = (self.at(s + f64::from(j) * ds) - p).length();
                if dist >= dmin {
                    break;
                }
                dmin = dist;
                jmin = j;
            }
            if jmin != 0 {
                s += f64::from(jmin) * ds;
            }
        }

        // Newton on d/ds |x(s) - p|^2.
        let h = f64::from(self.h);
        let cos_dip2 = self.cos_dip_angle * self.cos_dip_angle;
        let t34 = self.curvature * cos_dip2;
        let t41 = self.sin_dip_angle * self.sin_dip_angle;

        for _ in 0..MAX_ITERATIONS {
            let t6 = self.angle_at(s);
            let t7 = t6.cos();
            let t12 = t6.sin();
            let t11 = d.x - (t7 - self.cos_phase) / self.curvature;
            let t19 = d.y - (t12 - self.sin_phase) / self.curvature;
            let t21 = d.z - s * self.sin_dip_angle;

            let numerator = t11 * t12 * h * self.cos_dip_angle
                - t19 * t7 * h * self.cos_dip_angle
                - t21 * self.sin_dip_angle;
            let denominator = t12 * t12 * cos_dip2
                + t11 * t7 * t34
                + t7 * t7 * cos_dip2
                + t19 * t12 * t34
                + t41;

            let s_old = s;
            s -= numerator / denominator;
            if (s_old - s).abs() < NEWTON_TOLERANCE {
                return (s, true);
            }
        }

        trace!(s, "closest approach did not converge");
        (s, false)
    }

    /// The two arc lengths at which the trajectory crosses the cylinder of
    /// radius `r` around the z axis, smaller first. Each is shifted by a
    /// period when that brings it closer to zero. Both are
    /// [`NO_RADIUS_CROSSING`] when the circle never reaches `r`.
    pub fn path_length_at_radius(&self, r: f64) -> (f64, f64) {
        let no_crossing = (NO_RADIUS_CROSSING, NO_RADIUS_CROSSING);
        let o = self.origin;
        let (mut first, mut second);

        if self.singular {
            let cos_dip2 = self.cos_dip_angle * self.cos_dip_angle;
            let t1 = self.cos_dip_angle * (o.x * self.sin_phase - o.y * self.cos_phase);
            let t12 = o.y * o.y;
            let t13 = self.cos_phase * self.cos_phase;
            let t15 = r * r;
            let t16 = o.x * o.x;
            let t20 = -cos_dip2
                * (2.0 * o.x * self.sin_phase * o.y * self.cos_phase + t12 - t12 * t13 - t15
                    + t13 * t16);
            if t20 < 0.0 {
                return no_crossing;
            }
            let t20 = t20.sqrt();
            first = (t1 - t20) / cos_dip2;
            second = (t1 + t20) / cos_dip2;
        } else {
            // Closed-form roots of |xy(s)| = r.
            let k = self.curvature;
            let t1 = o.y * k;
            let t2 = self.sin_phase;
            let t3 = k * k;
            let t4 = o.y * t2;
            let t5 = self.cos_phase;
            let t6 = o.x * t5;
            let t8 = o.x * o.x;
            let t11 = o.y * o.y;
            let t14 = r * r;
            let t15 = t14 * k;
            let t17 = t8 * t8;
            let t19 = t11 * t11;
            let t21 = t11 * t3;
            let t23 = t5 * t5;
            let t32 = t14 * t14;
            let t35 = t14 * t3;
            let t38 = 8.0 * t4 * t6 - 4.0 * t1 * t2 * t8 - 4.0 * t11 * k * t6
                + 4.0 * t15 * t6
                + t17 * t3
                + t19 * t3
                + 2.0 * t21 * t8
                + 4.0 * t8 * t23
                - 4.0 * t8 * o.x * k * t5
                - 4.0 * t11 * t23
                - 4.0 * t11 * o.y * k * t2
                + 4.0 * t11
                - 4.0 * t14
                + t32 * t3
                + 4.0 * t15 * t4
                - 2.0 * t35 * t11
                - 2.0 * t35 * t8;
            let t40 = -t3 * t38;
            if t40 < 0.0 {
                return no_crossing;
            }
            let t40 = t40.sqrt();

            let t43 = o.x * k;
            let t45 = 2.0 * t5 - t35 + t21 + 2.0 - 2.0 * t1 * t2 - 2.0 * t43 - 2.0 * t43 * t5
                + t8 * t3;
            let t46 = f64::from(self.h) * self.cos_dip_angle * k;

            first = (-self.phase + 2.0 * ((-2.0 * t1 + 2.0 * t2 + t40) / t45).atan()) / t46;
            second = -(self.phase + 2.0 * ((2.0 * t1 - 2.0 * t2 + t40) / t45).atan()) / t46;

            let p = self.period();
            first = nearest_turn(first, p);
            second = nearest_turn(second, p);
        }

        if first > second {
            std::mem::swap(&mut first, &mut second);
        }
        (first, second)
    }

    /// [`Helix::path_length_at_radius`] for a cylinder whose axis passes
    /// through `(x, y)`.
    pub fn path_length_at_radius_about(&self, r: f64, x: f64, y: f64) -> (f64, f64) {
        let mut shifted = *self;
        shifted.origin.x -= x;
        shifted.origin.y -= y;
        shifted.path_length_at_radius(r)
    }

    /// Arc length at which the trajectory crosses the plane through `r` with
    /// normal `n`, or [`NO_SOLUTION`].
    ///
    /// The curved case runs Newton with the step capped at a fraction of the
    /// turning radius so that it cannot jump across a turn.
    pub fn path_length_to_plane(&self, r: DVec3, n: DVec3) -> f64 {
        if self.singular {
            let t = n.z * self.sin_dip_angle + n.y * self.cos_dip_angle * self.cos_phase
                - n.x * self.cos_dip_angle * self.sin_phase;
            // Rounding in the cached trig leaves exactly parallel lines a few
            // ulps away from zero.
            if t.abs() <= f64::EPSILON {
                return NO_SOLUTION;
            }
            return (r - self.origin).dot(n) / t;
        }

        let a = self.curvature * (self.origin - r).dot(n)
            - n.x * self.cos_phase
            - n.y * self.sin_phase;
        let t = f64::from(self.h) * self.curvature * self.cos_dip_angle;
        let u = n.z * self.curvature * self.sin_dip_angle;
        let max_step = (0.21 / (self.curvature * self.cos_dip_angle)).abs();

        let mut s = 0.0;
        for _ in 0..PLANE_MAX_ITERATIONS {
            let angle = t * s + self.phase;
            let (sin_a, cos_a) = angle.sin_cos();
            let f = a + n.x * cos_a + n.y * sin_a + u * s;
            let fp = -n.x * sin_a * t + n.y * cos_a * t + u;

            let shift = if fp.abs() * max_step <= f.abs() {
                let mut sign = 1.0;
                if fp < 0.0 {
                    sign = -sign;
                }
                if f < 0.0 {
                    sign = -sign;
                }
                let step = sign * max_step;
                if step < 0.0 { step * 0.9 } else { step }
            } else {
                f / fp
            };

            let s_old = s;
            s -= shift;
            if (s_old - s).abs() < NEWTON_TOLERANCE {
                return s;
            }
        }

        trace!("plane crossing did not converge");
        NO_SOLUTION
    }

    /// Arc lengths `(s1, s2)` on `self` and `other` of their mutual point of
    /// closest approach. Mixed straight and curved inputs give
    /// `(NO_SOLUTION, NO_SOLUTION)`.
    ///
    /// `min_step_size` bounds the final scan granularity and `min_range` the
    /// initial scan window, both in cm.
    #[allow(clippy::float_cmp)]
    pub fn path_lengths(&self, other: &Helix, min_step_size: f64, min_range: f64) -> (f64, f64) {
        if self.singular != other.singular {
            return (NO_SOLUTION, NO_SOLUTION);
        }

        if self.singular {
            // Two lines: solve for the common perpendicular.
            let dv = other.origin - self.origin;
            let a = self.cat(0.0);
            let b = other.cat(0.0);
            let ab = a.dot(b);
            let g = dv.dot(a);
            let k = dv.dot(b);
            let s2 = (k - ab * g) / (ab * ab - 1.0);
            let s1 = g + s2 * ab;
            return (s1, s2);
        }

        let mut s = self.circle_seed(other);

        let mut dmin = other.distance(self.at(s), true);
        let range = (2.0 * dmin).max(min_range);
        let mut ds = range / 10.0;
        let mut s1 = s - range / 2.0;
        let mut s2 = s + range / 2.0;
        let mut slast = -999_999.0;

        while ds > min_step_size {
            let mut ss = s1;
            while ss < s2 + ds {
                let d = other.distance(self.at(ss), true);
                if d < dmin {
                    dmin = d;
                    s = ss;
                }
                slast = ss;
                ss += ds;
            }

            if s == s1 {
                let shift = 0.8 * (s2 - s1);
                s1 -= shift;
                s2 -= shift;
            } else if s == slast {
                let shift = 0.8 * (s2 - s1);
                s1 += shift;
                s2 += shift;
            } else {
                s1 = s - ds;
                s2 = s + ds;
                ds /= 10.0;
            }
        }

        (s, other.path_length(self.at(s), true))
    }

    /// [`Helix::path_lengths`] with a 10 µm step and a 10 cm window.
    pub fn path_lengths_default(&self, other: &Helix) -> (f64, f64) {
        self.path_lengths(other, DEFAULT_MIN_STEP_SIZE, DEFAULT_MIN_RANGE)
    }

    /// Seed on `self` from the intersection (or nearest approach) of both
    /// transverse circles.
    fn circle_seed(&self, other: &Helix) -> f64 {
        let dx = other.x_center() - self.x_center();
        let dy = other.y_center() - self.y_center();
        let dd = dx.hypot(dy);
        let r1 = 1.0 / self.curvature;
        let r2 = 1.0 / other.curvature;

        let cos_alpha = (r1 * r1 + dd * dd - r2 * r2) / (2.0 * r1 * dd);

        let (x, y) = if cos_alpha.abs() < 1.0 {
            let sin_alpha = (1.0 - cos_alpha * cos_alpha).sqrt();
            let along_x = r1 * cos_alpha * dx / dd;
            let along_y = r1 * cos_alpha * dy / dd;
            let across_x = r1 * sin_alpha * dy / dd;
            let across_y = r1 * sin_alpha * dx / dd;

            let xa = self.x_center() + along_x + across_x;
            let ya = self.y_center() + along_y - across_y;
            let xb = self.x_center() + along_x - across_x;
            let yb = self.y_center() + along_y + across_y;

            let sa = self.path_length_xy(xa, ya);
            let sb = self.path_length_xy(xb, yb);
            if other.distance(self.at(sa), true) < other.distance(self.at(sb), true) {
                (xa, ya)
            } else {
                (xb, yb)
            }
        } else {
            // Circles apart or nested: take the point of self's circle on the
            // line of centers facing the other circle.
            let rsign = if r2 - r1 > dd { -1.0 } else { 1.0 };
            (
                self.x_center() + rsign * r1 * dx / dd,
                self.y_center() + rsign * r1 * dy / dd,
            )
        };

        self.path_length_xy(x, y)
    }

    /// Distance from `p` to its point of closest approach.
    pub fn distance(&self, p: DVec3, scan_periods: bool) -> f64 {
        (self.at(self.path_length(p, scan_periods)) - p).length()
    }
}

/// Shifts `s` by one period when that brings it closer to zero. NaN passes
/// through.
fn nearest_turn(s: f64, period: f64) -> f64 {
    if s.is_nan() {
        s
    } else if (s - period).abs() < s.abs() {
        s - period
    } else if (s + period).abs() < s.abs() {
        s + period
    } else {
        s
    }
}
