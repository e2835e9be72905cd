//! Error types for configuration and setup.
//!
//! Degenerate physics input is not an error: it yields `None`, an empty
//! collection or [`crate::helix::NO_SOLUTION`].

use thiserror::Error;

/// Errors raised while configuring the reconstruction components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot find energy weighting method '{name}', choose one from [{choices}]")]
    UnknownEnergyWeight { name: String, choices: String },

    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Unknown particle species with PDG code {0}")]
    UnknownSpecies(i32),

    #[error("Failed to load configuration: {0}")]
    ConfigFile(#[from] common::SerdeFormatError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_energy_weight_message() {
        let err = Error::UnknownEnergyWeight {
            name: "cubic".to_string(),
            choices: "none, linear, log".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot find energy weighting method 'cubic', choose one from [none, linear, log]"
        );
    }

    #[test]
    fn test_invalid_config_message() {
        let err = Error::InvalidConfig {
            field: "samp_frac",
            reason: "must be positive, got 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: samp_frac must be positive, got 0"
        );
    }
}
