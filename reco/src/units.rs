//! Unit system shared by every public API of this crate.
//!
//! Lengths are in centimetres, energies and momenta in GeV, times in
//! nanoseconds and magnetic fields in tesla. Multiply a value by a constant
//! to express it in crate units (`5.0 * MM`), divide to read it back
//! (`length / MM`).

pub const CM: f64 = 1.0;
pub const MM: f64 = 0.1 * CM;
pub const UM: f64 = 1e-4 * CM;
pub const M: f64 = 100.0 * CM;

pub const GEV: f64 = 1.0;
pub const MEV: f64 = 1e-3 * GEV;

pub const NS: f64 = 1.0;

pub const TESLA: f64 = 1.0;

/// Speed of light in cm/ns.
pub const C_LIGHT: f64 = 29.979_245_8 * CM / NS;

/// `pT = BENDING_CONSTANT * |q B| * R`, in GeV / (T cm).
pub const BENDING_CONSTANT: f64 = 0.299_792_458 * GEV / (TESLA * M);
