use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Generator status of particles produced by the event generator itself.
pub const GENERATOR_STATUS_FINAL_STATE: i32 = 1;

/// A simulated particle with its genealogy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct McParticle {
    pub pdg: i32,
    pub generator_status: i32,
    pub charge: f64,
    pub mass: f64,
    pub momentum: DVec3,
    pub vertex: DVec3,
    /// Indices into the event's MC particle collection.
    pub parents: Vec<usize>,
    pub daughters: Vec<usize>,
}

impl McParticle {
    pub fn is_generator_final_state(&self) -> bool {
        self.generator_status == GENERATOR_STATUS_FINAL_STATE
    }
}

/// Fitted track parameters at the point of closest approach to the beam line.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackParameters {
    /// Local transverse (`a`) and longitudinal (`b`) offsets of the point of
    /// closest approach.
    pub loc: DVec2,
    pub theta: f64,
    pub phi: f64,
    /// Charge over momentum, 1/GeV.
    pub q_over_p: f64,
    pub time: f64,
}

impl TrackParameters {
    /// Parameters of a track from the beam line with momentum `p` and `charge`.
    pub fn from_momentum(p: DVec3, charge: f64, loc: DVec2) -> Self {
        Self {
            loc,
            theta: crate::math::angle_polar(p),
            phi: crate::math::angle_azimuthal(p),
            q_over_p: charge / p.length(),
            time: 0.0,
        }
    }

    pub fn momentum(&self) -> DVec3 {
        crate::math::spherical_to_vector(1.0 / self.q_over_p.abs(), self.theta, self.phi)
    }

    pub fn charge(&self) -> f64 {
        1.0_f64.copysign(self.q_over_p)
    }
}

/// A reconstructed particle candidate with the track fits it was built from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReconstructedParticle {
    pub pdg: i32,
    pub charge: f64,
    pub energy: f64,
    pub momentum: DVec3,
    pub mass: f64,
    pub tracks: Vec<TrackParameters>,
}
