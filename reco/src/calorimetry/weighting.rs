use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{Error, Result};

/// Per-hit weighting used for the cluster centroid and shower shape.
#[derive(Debug, Display, EnumString, EnumIter, Copy, Clone, PartialEq, Eq, Default)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EnergyWeight {
    /// Every hit weighs 1.
    None,
    /// Weight equals the hit energy.
    Linear,
    /// `max(0, base + ln(E / E_total))`: hits below `e^-base` of the total
    /// get exactly zero weight.
    #[default]
    Log,
}

impl EnergyWeight {
    /// Resolves a configured name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse().map_err(|_| Error::UnknownEnergyWeight {
            name: name.to_string(),
            choices: Self::choices(),
        })
    }

    /// Comma separated list of accepted names.
    pub fn choices() -> String {
        EnergyWeight::iter()
            .map(|weight| weight.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[inline]
    pub fn weight(self, energy: f64, total_energy: f64, log_base: f64) -> f64 {
        match self {
            EnergyWeight::None => 1.0,
            EnergyWeight::Linear => energy,
            // f64::max ignores NaN, so ln(0 / 0) also ends up as zero weight.
            EnergyWeight::Log => (log_base + (energy / total_energy).ln()).max(0.0),
        }
    }
}
