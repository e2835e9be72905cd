//! Helpers shared by the unit tests.

use glam::DVec3;

pub use common::log_setup::init_test_tracing;

pub fn assert_vec_close(a: DVec3, b: DVec3, tol: f64) {
    assert!(
        (a - b).length() < tol,
        "expected {b:?}, got {a:?} (|diff| = {})",
        (a - b).length()
    );
}
