//! Plain event data exchanged with upstream digitization, tracking and
//! simulation stages.
//!
//! Collections are ordinary `Vec`s and cross references are indices into the
//! sibling collection of the same event (a proto-cluster refers to hits by
//! their position in the hit slice, a contribution to its particle by the
//! particle's position in the MC particle slice, and so on).

mod calorimeter;
mod particle;
mod vertex;

pub use calorimeter::{
    CaloHitContribution, CalorimeterHit, CalorimeterHitAssociation, Cluster,
    ClusterParticleAssociation, ProtoCluster, SHAPE_PARAMETER_COUNT, SimCalorimeterHit,
};
pub use particle::{
    GENERATOR_STATUS_FINAL_STATE, McParticle, ReconstructedParticle, TrackParameters,
};
pub use vertex::{Vertex, VertexType};
