//! Reco - event reconstruction building blocks for collider detectors.
//!
//! This library provides:
//! - Helix geometry of charged tracks in a solenoid field: positions,
//!   momenta, closest approach to points, circles, planes and other helices
//! - Center-of-gravity calorimeter clustering with shower-shape moments and
//!   truth association to primary MC particles
//! - Two-track secondary vertex finding for neutral decays such as K0S
//!
//! All quantities use the units of [`units`]: cm, GeV, ns and tesla.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reco::prelude::*;
//!
//! let clusterer = CogClusterer::new(ClusterRecoConfig::default());
//! let output = clusterer.process(&proto_clusters, &hits, None);
//!
//! let finder = SecondaryVertexFinder::new(SecondaryVertexConfig::default())?;
//! let vertices = finder.find(&primary_vertices, &particles);
//! ```

pub mod calorimetry;
pub mod edm;
pub mod error;
pub mod helix;
pub mod math;
pub mod units;
pub mod vertexing;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude;

// ============================================================================
// Errors
// ============================================================================

pub use error::{Error, Result};

// ============================================================================
// Event data
// ============================================================================

pub use edm::{
    CalorimeterHit, Cluster, ClusterParticleAssociation, McParticle, ProtoCluster,
    ReconstructedParticle, SimCalorimeterHit, TrackParameters, Vertex, VertexType,
};

// ============================================================================
// Helix geometry
// ============================================================================

pub use helix::{Helix, HelixDefect, NO_RADIUS_CROSSING, NO_SOLUTION};

// ============================================================================
// Calorimetry
// ============================================================================

pub use calorimetry::{
    ClusterRecoConfig, ClusterRecoOutput, CogClusterer, EnergyWeight, ShowerShape, TruthSource,
};

// ============================================================================
// Vertexing
// ============================================================================

pub use vertexing::{
    ParticleProperties, PdgTable, SecondaryVertexCandidate, SecondaryVertexConfig,
    SecondaryVertexFinder,
};
