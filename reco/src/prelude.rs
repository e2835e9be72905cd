//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use reco::prelude::*;
//! ```

// Event data
pub use crate::{
    CalorimeterHit, Cluster, ProtoCluster, ReconstructedParticle, TrackParameters, Vertex,
};

// Helix geometry
pub use crate::Helix;

// Calorimetry - main API
pub use crate::{ClusterRecoConfig, ClusterRecoOutput, CogClusterer, TruthSource};

// Vertexing - main API
pub use crate::{SecondaryVertexConfig, SecondaryVertexFinder};
