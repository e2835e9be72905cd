//! Two-track secondary vertex finding.
//!
//! Charged daughter tracks that miss the primary vertex are paired, their
//! helices intersected by a closest-approach search, and pairs whose summed
//! momentum points back to the primary vertex are kept as decay vertices.

mod config;
mod finder;
mod particle_table;


pub use config::SecondaryVertexConfig;
pub use finder::{SecondaryVertexCandidate, SecondaryVertexFinder};
pub use particle_table::{ParticleData, ParticleProperties, PdgTable};
