use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DMat2, DVec2, DVec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::math::magnitude_transverse;
use crate::testing::assert_vec_close;

const B_FIELD: f64 = 1.5;

fn pion_helix() -> Helix {
    Helix::from_momentum(
        DVec3::new(0.5, 0.3, 0.4),
        DVec3::new(0.1, -0.2, 0.3),
        B_FIELD,
        -1,
    )
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_momentum_round_trip() {
    for &(charge, b) in &[(1, 1.5), (-1, 1.5), (1, -2.0), (-1, -2.0)] {
        let p = DVec3::new(-0.8, 1.1, -0.3);
        let helix = Helix::from_momentum(p, DVec3::new(1.0, 2.0, 3.0), b, charge);

        assert!(!helix.is_singular());
        assert!(helix.valid(DEFAULT_WORLD_SIZE));
        assert_vec_close(helix.momentum(b), p, 1e-9);
        assert_eq!(helix.charge(b), charge);
        assert_vec_close(helix.at(0.0), DVec3::new(1.0, 2.0, 3.0), 1e-12);
    }
}

#[test]
fn test_radius_from_momentum() {
    // pT = 1 GeV in 1 T bends with R = 3.3356 m.
    let helix = Helix::from_momentum(DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO, 1.0, 1);
    assert!((1.0 / helix.curvature() - 333.564_095).abs() < 1e-3);
}

#[test]
fn test_tangent_follows_momentum() {
    let helix = pion_helix();
    let p = DVec3::new(0.5, 0.3, 0.4);
    assert_vec_close(helix.cat(0.0), p.normalize(), 1e-12);
}

#[test]
fn test_neutral_is_straight_line() {
    let p = DVec3::new(0.0, 2.0, 2.0);
    let helix = Helix::from_momentum(p, DVec3::ZERO, B_FIELD, 0);

    assert!(helix.is_singular());
    assert_eq!(helix.h(), 1);
    assert_eq!(helix.period(), f64::MAX);
    assert_eq!(helix.momentum(B_FIELD), DVec3::ZERO);
    assert_vec_close(helix.at(2.0_f64.sqrt()), DVec3::new(0.0, 1.0, 1.0), 1e-12);
}

#[test]
fn test_negative_curvature_flips_handedness() {
    let origin = DVec3::new(3.0, -1.0, 2.0);
    let flipped = Helix::new(-0.01, 0.3, 0.5, origin, 1);
    let reference = Helix::new(0.01, 0.3, 0.5 + PI, origin, -1);

    assert_eq!(flipped.h(), -1);
    assert!((flipped.curvature() - 0.01).abs() < 1e-15);
    for s in [-120.0, -3.0, 0.0, 7.5, 250.0] {
        assert_vec_close(flipped.at(s), reference.at(s), 1e-9);
    }
}

#[test]
fn test_straight_line_forces_positive_handedness() {
    let left = Helix::new(0.0, 0.2, 1.0, DVec3::ZERO, -1);
    let right = Helix::new(0.0, 0.2, 1.0 - PI, DVec3::ZERO, 1);

    assert_eq!(left.h(), 1);
    for s in [-5.0, 0.0, 12.0] {
        assert_vec_close(left.at(s), right.at(s), 1e-12);
    }
}

#[test]
fn test_phase_is_folded() {
    let helix = Helix::new(0.01, 0.0, 3.0 * PI + 0.25, DVec3::ZERO, 1);
    assert!(helix.phase().abs() <= PI);
    assert!((helix.phase() - (-PI + 0.25)).abs() < 1e-12);
}

#[test]
fn test_from_track_parameters() {
    let p = DVec3::new(0.3, -0.4, 1.2);
    let track = TrackParameters::from_momentum(p, -1.0, DVec2::new(0.05, -1.5));
    let helix = Helix::from_track_parameters(&track, B_FIELD);

    let (sin_phi, cos_phi) = track.phi.sin_cos();
    assert_vec_close(
        helix.origin(),
        DVec3::new(-0.05 * sin_phi, 0.05 * cos_phi, -1.5),
        1e-12,
    );
    assert_vec_close(helix.momentum(B_FIELD), p, 1e-9);
    assert_eq!(helix.charge(B_FIELD), -1);
}

#[test]
fn test_from_particle_uses_last_track() {
    let first = TrackParameters::from_momentum(DVec3::new(1.0, 0.0, 0.0), 1.0, DVec2::ZERO);
    let last = TrackParameters::from_momentum(DVec3::new(0.0, 2.0, 0.5), -1.0, DVec2::ZERO);
    let particle = ReconstructedParticle {
        tracks: vec![first, last],
        ..Default::default()
    };

    let helix = Helix::from_particle(&particle, B_FIELD).unwrap();
    assert_vec_close(helix.momentum(B_FIELD), DVec3::new(0.0, 2.0, 0.5), 1e-9);

    assert!(Helix::from_particle(&ReconstructedParticle::default(), B_FIELD).is_none());
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_center_and_period() {
    let helix = Helix::new(0.02, 0.4, 0.3, DVec3::new(1.0, 1.0, 0.0), 1);
    let center = DVec3::new(helix.x_center(), helix.y_center(), 0.0);

    for s in [0.0, 13.0, 77.0] {
        let r = magnitude_transverse(helix.at(s) - center);
        assert!((r - 50.0).abs() < 1e-9);
    }
    let rise = DVec3::Z * helix.period() * 0.4_f64.sin();
    assert_vec_close(helix.at(helix.period()), helix.at(0.0) + rise, 1e-9);
}

#[test]
fn test_small_curvature_approaches_straight_line() {
    let origin = DVec3::new(0.5, -0.5, 1.0);
    let straight = Helix::new(0.0, 0.3, 0.7, origin, 1);
    let nearly = Helix::new(1e-7, 0.3, 0.7, origin, 1);

    assert!(straight.is_singular());
    assert!(!nearly.is_singular());
    assert!(nearly.period() > 1e7);
    for s in [-10.0, 0.0, 4.0, 10.0] {
        assert_vec_close(nearly.at(s), straight.at(s), 1e-4);
        assert_vec_close(nearly.cat(s), straight.cat(s), 1e-5);
    }
}

#[test]
fn test_move_origin_keeps_curve() {
    let helix = pion_helix();
    let mut moved = helix;
    moved.move_origin(42.0);

    assert_vec_close(moved.at(0.0), helix.at(42.0), 1e-9);
    for t in [-30.0, 5.0, 100.0] {
        assert_vec_close(moved.at(t), helix.at(42.0 + t), 1e-9);
    }
    assert!((moved.curvature() - helix.curvature()).abs() < 1e-15);
    assert_eq!(moved.h(), helix.h());
}

#[test]
fn test_momentum_at_rotates_with_tangent() {
    let helix = pion_helix();
    let p0 = helix.momentum(B_FIELD);

    for s in [-60.0, 25.0, 300.0] {
        let p = helix.momentum_at(s, B_FIELD);
        assert!((p.length() - p0.length()).abs() < 1e-9);
        assert!((p.z - p0.z).abs() < 1e-9);
        assert_vec_close(p.normalize(), helix.cat(s), 1e-9);
    }
}

// ============================================================================
// Closest approach
// ============================================================================

#[test]
fn test_path_length_of_point_on_curve() {
    let helix = pion_helix();
    let period = helix.period();

    for s in [-1.4 * period, -50.0, 0.0, 10.0, 120.0, 0.9 * period, 1.3 * period] {
        let (found, converged) = helix.path_length_with_status(helix.at(s), true);
        assert!(converged);
        assert!((found - s).abs() < 1e-3, "s = {s}, found {found}");
    }
}

#[test]
fn test_path_length_without_scan() {
    let helix = pion_helix();
    let period = helix.period();

    // On the seed's turn Newton alone finds the point.
    let s = 0.3 * period;
    let (found, converged) = helix.path_length_with_status(helix.at(s), false);
    assert!(converged);
    assert!((found - s).abs() < 1e-3, "found {found}");

    // Several turns away only the period scan gives a usable start.
    let s = 2.3 * period;
    let (_, converged) = helix.path_length_with_status(helix.at(s), false);
    assert!(!converged);
    let (found, converged) = helix.path_length_with_status(helix.at(s), true);
    assert!(converged);
    assert!((found - s).abs() < 1e-3, "found {found}");
}

#[test]
fn test_distance_to_offset_point() {
    let helix = pion_helix();
    let s = 80.0;
    let on_curve = helix.at(s);
    let center = DVec3::new(helix.x_center(), helix.y_center(), on_curve.z);
    let inward = (center - on_curve).normalize();
    let p = on_curve + 2.0 * inward;

    assert!((helix.distance(p, true) - 2.0).abs() < 1e-6);
    assert!((helix.path_length(p, true) - s).abs() < 1e-3);
}

#[test]
fn test_straight_line_path_length() {
    let line = Helix::new(0.0, 0.0, -FRAC_PI_2, DVec3::ZERO, 1);
    assert!((line.path_length(DVec3::new(7.0, 3.0, -2.0), true) - 7.0).abs() < 1e-12);
    assert!((line.distance(DVec3::new(7.0, 3.0, 0.0), true) - 3.0).abs() < 1e-12);
}

#[test]
fn test_random_points_on_curve_are_found() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let p = DVec3::new(
            rng.random_range(-2.0..2.0),
            rng.random_range(-2.0..2.0),
            rng.random_range(-2.0..2.0),
        );
        if magnitude_transverse(p) < 0.1 {
            continue;
        }
        let origin = DVec3::new(
            rng.random_range(-5.0..5.0),
            rng.random_range(-5.0..5.0),
            rng.random_range(-20.0..20.0),
        );
        let charge = if rng.random_bool(0.5) { 1 } else { -1 };
        let helix = Helix::from_momentum(p, origin, B_FIELD, charge);

        let s = rng.random_range(-1.0..1.0) * helix.period();
        let found = helix.path_length(helix.at(s), true);
        assert!(
            (helix.at(found) - helix.at(s)).length() < 1e-3,
            "helix {helix}, s = {s}, found {found}"
        );
    }
}

// ============================================================================
// Radius and plane crossings
// ============================================================================

#[test]
fn test_straight_line_radius_crossing() {
    let line = Helix::new(0.0, 0.0, -FRAC_PI_2, DVec3::ZERO, 1);
    let (s1, s2) = line.path_length_at_radius(5.0);
    assert!((s1 + 5.0).abs() < 1e-12);
    assert!((s2 - 5.0).abs() < 1e-12);

    let offset = Helix::new(0.0, 0.0, -FRAC_PI_2, DVec3::new(0.0, 8.0, 0.0), 1);
    assert_eq!(
        offset.path_length_at_radius(5.0),
        (NO_RADIUS_CROSSING, NO_RADIUS_CROSSING)
    );
}

#[test]
fn test_helix_radius_crossing() {
    let helix = Helix::from_momentum(DVec3::new(0.5, 0.3, 0.4), DVec3::ZERO, B_FIELD, 1);

    let (s1, s2) = helix.path_length_at_radius(50.0);
    assert!(s1 <= s2);
    for s in [s1, s2] {
        assert!((magnitude_transverse(helix.at(s)) - 50.0).abs() < 1e-6, "s = {s}");
    }

    // Diameter of the circle through the beam line is about 2.6 m.
    assert_eq!(
        helix.path_length_at_radius(300.0),
        (NO_RADIUS_CROSSING, NO_RADIUS_CROSSING)
    );
}

#[test]
fn test_radius_crossing_picks_turn_nearest_origin() {
    let reference = pion_helix();
    let period = reference.period();
    let (r1, r2) = reference.path_length_at_radius(30.0);

    let mut moved = reference;
    moved.move_origin(0.7 * period);
    let (s1, s2) = moved.path_length_at_radius(30.0);

    for s in [s1, s2] {
        assert!(s.abs() <= 0.5 * period + 1e-6, "s = {s}");
        assert!((magnitude_transverse(moved.at(s)) - 30.0).abs() < 1e-6, "s = {s}");

        // Same crossing as before the move, up to whole turns.
        let same_crossing = [r1, r2].iter().any(|&r| {
            let turns = (s + 0.7 * period - r) / period;
            (turns - turns.round()).abs() < 1e-9
        });
        assert!(same_crossing, "s = {s}");
    }
}

#[test]
fn test_radius_crossing_about_point() {
    let helix = pion_helix();
    let (s1, s2) = helix.path_length_at_radius_about(30.0, 1.0, -2.0);
    for s in [s1, s2] {
        let p = helix.at(s);
        assert!(((p.x - 1.0).hypot(p.y + 2.0) - 30.0).abs() < 1e-6, "s = {s}");
    }
}

#[test]
fn test_straight_line_plane_crossing() {
    let line = Helix::new(0.0, 0.0, -FRAC_PI_2, DVec3::ZERO, 1);
    let s = line.path_length_to_plane(DVec3::new(5.0, 0.0, 0.0), DVec3::X);
    assert!((s - 5.0).abs() < 1e-12);

    let parallel = line.path_length_to_plane(DVec3::new(0.0, 5.0, 0.0), DVec3::Y);
    assert_eq!(parallel, NO_SOLUTION);
}

#[test]
fn test_helix_crosses_endcap_plane() {
    let helix = Helix::new(1.0 / 130.0, 0.6, 0.2, DVec3::ZERO, 1);
    let s = helix.path_length_to_plane(DVec3::new(0.0, 0.0, 20.0), DVec3::Z);

    assert!((s - 20.0 / 0.6_f64.sin()).abs() < 1e-4);
    assert!((helix.at(s).z - 20.0).abs() < 1e-4);
}

#[test]
fn test_flat_helix_never_reaches_endcap() {
    // Zero dip: z stays constant, the Newton budget runs out.
    let helix = Helix::new(1.0 / 130.0, 0.0, 0.2, DVec3::ZERO, 1);
    let s = helix.path_length_to_plane(DVec3::new(0.0, 0.0, 20.0), DVec3::Z);
    assert_eq!(s, NO_SOLUTION);
}

#[test]
fn test_helix_crosses_tilted_plane() {
    let helix = pion_helix();
    let point = helix.at(35.0);
    let normal = DVec3::new(1.0, 1.0, 0.5).normalize();

    let s = helix.path_length_to_plane(point, normal);
    assert_ne!(s, NO_SOLUTION);
    assert!((helix.at(s) - point).dot(normal).abs() < 1e-4);
}

// ============================================================================
// Two helices
// ============================================================================

#[test]
fn test_straight_lines_closest_approach() {
    let a = Helix::new(0.0, 0.3, 0.2, DVec3::ZERO, 1);
    let b = Helix::new(0.0, -0.5, 1.4, DVec3::new(1.0, 2.0, 3.0), 1);

    let (s1, s2) = a.path_lengths_default(&b);

    let da = a.cat(0.0);
    let db = b.cat(0.0);
    let dv = b.origin() - a.origin();
    let ab = da.dot(db);
    let m = DMat2::from_cols(DVec2::new(1.0, ab), DVec2::new(-ab, -1.0));
    let expected = m.inverse() * DVec2::new(dv.dot(da), dv.dot(db));

    assert!((s1 - expected.x).abs() < 1e-9);
    assert!((s2 - expected.y).abs() < 1e-9);

    let link = b.at(s2) - a.at(s1);
    assert!(link.dot(da).abs() < 1e-9);
    assert!(link.dot(db).abs() < 1e-9);
}

#[test]
fn test_mixed_singularity_has_no_solution() {
    let line = Helix::new(0.0, 0.0, 0.0, DVec3::ZERO, 1);
    let helix = pion_helix();

    assert_eq!(line.path_lengths_default(&helix), (NO_SOLUTION, NO_SOLUTION));
    assert_eq!(helix.path_lengths_default(&line), (NO_SOLUTION, NO_SOLUTION));
}

/// Flat helix running on the circle of `radius` around `(cx, cy)`, starting
/// at its top.
fn flat_circle(cx: f64, cy: f64, radius: f64) -> Helix {
    Helix::new(1.0 / radius, 0.0, FRAC_PI_2, DVec3::new(cx, cy + radius, 0.0), 1)
}

#[test]
fn test_disjoint_circles_closest_approach() {
    let left = flat_circle(0.0, 0.0, 10.0);
    let right = flat_circle(30.0, 0.0, 10.0);

    let (s1, s2) = left.path_lengths_default(&right);

    assert_vec_close(left.at(s1), DVec3::new(10.0, 0.0, 0.0), 1e-2);
    assert_vec_close(right.at(s2), DVec3::new(20.0, 0.0, 0.0), 1e-2);
    assert!(((left.at(s1) - right.at(s2)).length() - 10.0).abs() < 1e-4);
}

#[test]
fn test_nested_circles_closest_approach() {
    let inner = flat_circle(0.0, 0.0, 10.0);
    let outer = flat_circle(5.0, 0.0, 30.0);

    let (s1, s2) = inner.path_lengths_default(&outer);

    // The inner point farthest from the outer center is nearest the outer circle.
    assert_vec_close(inner.at(s1), DVec3::new(-10.0, 0.0, 0.0), 1e-2);
    assert_vec_close(outer.at(s2), DVec3::new(-25.0, 0.0, 0.0), 1e-2);
    assert!(((inner.at(s1) - outer.at(s2)).length() - 15.0).abs() < 1e-4);
}

#[test]
fn test_helices_from_common_vertex_meet_there() {
    let vertex = DVec3::new(2.0, 3.0, 1.0);
    let plus = Helix::from_momentum(DVec3::new(0.6, 0.2, 0.3), vertex, B_FIELD, 1);
    let minus = Helix::from_momentum(DVec3::new(0.4, -0.3, -0.1), vertex, B_FIELD, -1);

    let (s1, s2) = plus.path_lengths_default(&minus);
    let p1 = plus.at(s1);
    let p2 = minus.at(s2);

    assert!((p1 - p2).length() < 2e-3, "dca = {}", (p1 - p2).length());
    assert_vec_close(p1, vertex, 1e-2);
}

// ============================================================================
// Signed distances, validity, display
// ============================================================================

#[test]
fn test_geometric_sign_follows_side() {
    let line = Helix::new(0.0, 0.0, -FRAC_PI_2, DVec3::ZERO, 1);

    assert!((line.geometric_signed_distance_xy(5.0, 2.0) - 2.0).abs() < 1e-12);
    assert!((line.geometric_signed_distance_xy(5.0, -2.0) + 2.0).abs() < 1e-12);
    assert!((line.curvature_signed_distance_xy(5.0, -2.0) + 2.0).abs() < 1e-12);
}

#[test]
fn test_curvature_sign_is_positive_inside_circle() {
    for h in [1, -1] {
        let phase = if h == 1 { -FRAC_PI_2 } else { FRAC_PI_2 };
        let helix = Helix::new(0.01, 0.0, phase, DVec3::ZERO, h);
        let center = DVec3::new(helix.x_center(), helix.y_center(), 0.0);
        let inward = center.normalize();

        let inside = 2.0 * inward;
        let outside = -2.0 * inward;

        assert!((helix.curvature_signed_distance_xy(inside.x, inside.y) - 2.0).abs() < 1e-9);
        assert!((helix.curvature_signed_distance_xy(outside.x, outside.y) + 2.0).abs() < 1e-9);
        assert!(
            (helix.geometric_signed_distance_xy(inside.x, inside.y) - 2.0 * f64::from(h)).abs()
                < 1e-9
        );
    }
}

#[test]
fn test_signed_distance_3d() {
    let line = Helix::new(0.0, 0.0, -FRAC_PI_2, DVec3::ZERO, 1);
    let d = line.geometric_signed_distance(DVec3::new(5.0, -3.0, 4.0));
    assert!((d + 5.0).abs() < 1e-12);
    let d = line.curvature_signed_distance(DVec3::new(5.0, 3.0, 4.0));
    assert!((d - 5.0).abs() < 1e-12);
}

#[test]
fn test_signed_distance_on_track_projection_is_positive() {
    // The transverse part is exactly zero; with h = -1 it becomes -0.0.
    let helix = Helix::new(0.01, 0.0, FRAC_PI_2, DVec3::ZERO, -1);
    let above = DVec3::new(0.0, 0.0, 2.0);

    assert_eq!(helix.curvature_signed_distance(above), 2.0);
    assert_eq!(helix.geometric_signed_distance(above), 2.0);
}

#[test]
fn test_bad_codes() {
    let ok = Helix::new(0.01, 0.3, 0.0, DVec3::ZERO, 1);
    assert_eq!(ok.bad(DEFAULT_WORLD_SIZE), 0);
    assert!(ok.check(DEFAULT_WORLD_SIZE).is_ok());

    let cases = [
        (Helix::new(0.01, f64::NAN, 0.0, DVec3::ZERO, 1), 11),
        (Helix::new(f64::INFINITY, 0.3, 0.0, DVec3::ZERO, 1), 12),
        (Helix::new(0.01, 1.6, 0.0, DVec3::ZERO, 1), 21),
        (Helix::new(1.0e6, 0.3, 0.0, DVec3::ZERO, 1), 22),
        (Helix::new(0.01, FRAC_PI_2 - 1e-6, 0.0, DVec3::ZERO, 1), 31),
    ];
    for (helix, code) in cases {
        assert_eq!(helix.bad(DEFAULT_WORLD_SIZE), code, "{helix}");
        assert!(!helix.valid(DEFAULT_WORLD_SIZE));
    }

    assert_eq!(HelixDefect::NegativeCurvature.code(), 32);
    assert_eq!(HelixDefect::InvalidHandedness.code(), 24);
}

#[test]
fn test_display() {
    let helix = Helix::new(0.5, 0.25, 1.0, DVec3::new(1.0, 2.0, 3.0), 1);
    let text = helix.to_string();
    assert!(text.starts_with("(curvature = 0.5, dip angle = 0.25"));
    assert!(text.ends_with("origin = 1 2 3)"));
}
