//! Cuts of the secondary vertex finder.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::units::{MM, UM};

/// Settings of [`super::SecondaryVertexFinder`]. Lengths in cm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryVertexConfig {
    /// Solenoid field along z, tesla.
    pub b_field: f64,
    /// Species of the decay daughters; charge conjugates are included.
    pub daughter_pdg: i32,
    /// Pair only opposite charges.
    pub unlike_sign: bool,
    /// Minimum distance of each track from the primary vertex.
    pub min_dca: f64,
    /// Maximum distance between the two tracks at closest approach.
    pub max_dca12: f64,
    /// Maximum impact parameter of the pair momentum line w.r.t. the
    /// primary vertex.
    pub max_dca: f64,
    /// Minimum cosine of the angle between pair momentum and decay length.
    pub min_cos_theta: f64,
}

impl Default for SecondaryVertexConfig {
    fn default() -> Self {
        Self {
            b_field: 1.7,
            daughter_pdg: 211,
            unlike_sign: true,
            min_dca: 30.0 * UM,
            max_dca12: 0.5 * MM,
            max_dca: 1.0 * MM,
            min_cos_theta: 0.8,
        }
    }
}

impl SecondaryVertexConfig {
    /// Loads a YAML or JSON configuration and checks it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = common::deserialize_file(path)?;
        config.check()?;
        Ok(config)
    }

    /// Validate configuration parameters.
    ///
    /// # Panics
    ///
    /// Panics if a cut is negative, the cosine is outside [-1, 1] or the
    /// field is zero.
    pub fn validate(&self) {
        if let Err(err) = self.check() {
            panic!("{err}");
        }
    }

    /// Non-panicking form of [`SecondaryVertexConfig::validate`].
    pub fn check(&self) -> Result<()> {
        let lengths = [
            ("min_dca", self.min_dca),
            ("max_dca12", self.max_dca12),
            ("max_dca", self.max_dca),
        ];
        for (field, value) in lengths {
            if value.is_nan() || value < 0.0 {
                return Err(Error::InvalidConfig {
                    field,
                    reason: format!("must be non-negative, got {value}"),
                });
            }
        }
        if !(-1.0..=1.0).contains(&self.min_cos_theta) {
            return Err(Error::InvalidConfig {
                field: "min_cos_theta",
                reason: format!("must be within [-1, 1], got {}", self.min_cos_theta),
            });
        }
        // Tracks in a zero field are straight lines without a momentum scale.
        if !self.b_field.is_finite() || self.b_field == 0.0 {
            return Err(Error::InvalidConfig {
                field: "b_field",
                reason: format!("must be finite and non-zero, got {}", self.b_field),
            });
        }
        Ok(())
    }
}
