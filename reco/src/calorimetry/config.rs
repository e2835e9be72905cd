//! Configuration of the center-of-gravity clusterer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::units::MEV;

/// Settings of [`super::CogClusterer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterRecoConfig {
    /// Name of the readout the hits come from. Informational only.
    pub readout: String,
    /// `"none"`, `"linear"` or `"log"`, any case.
    pub energy_weight: String,
    /// Sampling fraction; cluster energy is the hit sum divided by it.
    pub samp_frac: f64,
    /// Fixed base of the log weighting. Ignored when
    /// `log_weight_base_coeffs` is non-empty.
    pub log_weight_base: f64,
    /// Polynomial coefficients `c_i` of the energy dependent log base
    /// `Σ c_i l^i` with `l = ln(E_cluster / log_weight_base_e_ref)`.
    pub log_weight_base_coeffs: Vec<f64>,
    /// Reference energy of the log base polynomial, GeV.
    pub log_weight_base_e_ref: f64,
    /// Clip the centroid pseudorapidity to the range spanned by the hits.
    pub enable_eta_bounds: bool,
    /// Derive intrinsic θ/φ from the shower axis.
    pub longitudinal_shower_info_available: bool,
}

impl Default for ClusterRecoConfig {
    fn default() -> Self {
        Self {
            readout: String::new(),
            energy_weight: "log".to_string(),
            samp_frac: 1.0,
            log_weight_base: 3.6,
            log_weight_base_coeffs: Vec::new(),
            log_weight_base_e_ref: 50.0 * MEV,
            enable_eta_bounds: false,
            longitudinal_shower_info_available: false,
        }
    }
}

impl ClusterRecoConfig {
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
    /// Panics if a numeric parameter is out of range.
    pub fn validate(&self) {
        if let Err(err) = self.check() {
            panic!("{err}");
        }
    }

    /// Non-panicking form of [`ClusterRecoConfig::validate`].
    pub fn check(&self) -> Result<()> {
        if self.samp_frac.is_nan() || self.samp_frac <= 0.0 {
            return Err(Error::InvalidConfig {
                field: "samp_frac",
                reason: format!("must be positive, got {}", self.samp_frac),
            });
        }
        if !self.log_weight_base.is_finite() {
            return Err(Error::InvalidConfig {
                field: "log_weight_base",
                reason: format!("must be finite, got {}", self.log_weight_base),
            });
        }
        if !self.log_weight_base_coeffs.is_empty()
            && (self.log_weight_base_e_ref.is_nan() || self.log_weight_base_e_ref <= 0.0)
        {
            return Err(Error::InvalidConfig {
                field: "log_weight_base_e_ref",
                reason: format!("must be positive, got {}", self.log_weight_base_e_ref),
            });
        }
        Ok(())
    }
}
