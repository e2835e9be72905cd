//! Calorimeter cluster reconstruction.
//!
//! [`CogClusterer`] turns proto-clusters (hit indices with sharing weights)
//! into clusters: energy corrected for the sampling fraction, an
//! energy-weighted time, a center-of-gravity position with optional
//! pseudorapidity clipping and second-moment shower-shape descriptors.
//! When simulation truth is available each cluster is associated with the
//! primary particles that deposited its energy.

mod cog;
mod config;
mod shape;
mod truth;
mod weighting;


pub use cog::{ClusterRecoOutput, CogClusterer};
pub use config::ClusterRecoConfig;
pub use shape::ShowerShape;
pub use truth::{TruthMatcher, TruthSource, primary_of};
pub use weighting::EnergyWeight;
