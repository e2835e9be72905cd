use glam::DVec3;
use tracing::{debug, info};

use super::config::SecondaryVertexConfig;
use super::particle_table::{ParticleProperties, PdgTable};
use crate::edm::{ReconstructedParticle, Vertex, VertexType};
use crate::error::{Error, Result};
use crate::helix::Helix;
use crate::math::angle_between;
use crate::units::C_LIGHT;

/// A two-track decay vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryVertexCandidate {
    /// Secondary vertex at the midpoint of closest approach; its associated
    /// particles are the two daughters.
    pub vertex: Vertex,
    /// Pair mass under the daughter mass hypothesis, GeV.
    pub invariant_mass: f64,
}

/// Pairs charged tracks displaced from the primary vertex into decay
/// vertices of neutral particles.
#[derive(Debug, Clone)]
pub struct SecondaryVertexFinder {
    config: SecondaryVertexConfig,
    daughter_mass: f64,
}

impl SecondaryVertexFinder {
    /// Finder with the daughter mass taken from the built-in [`PdgTable`].
    pub fn new(config: SecondaryVertexConfig) -> Result<Self> {
        Self::with_particle_properties(config, &PdgTable)
    }

    pub fn with_particle_properties(
        config: SecondaryVertexConfig,
        properties: &dyn ParticleProperties,
    ) -> Result<Self> {
        config.check()?;
        let daughter_mass = properties
            .mass(config.daughter_pdg)
            .ok_or(Error::UnknownSpecies(config.daughter_pdg))?;
        Ok(Self {
            config,
            daughter_mass,
        })
    }

    pub fn config(&self) -> &SecondaryVertexConfig {
        &self.config
    }

    pub fn daughter_mass(&self) -> f64 {
        self.daughter_mass
    }

    /// Secondary vertices of one event, pairs in index order.
    ///
    /// Only the first primary vertex is used. Without one nothing is found.
    pub fn find(
        &self,
        primary_vertices: &[Vertex],
        particles: &[ReconstructedParticle],
    ) -> Vec<SecondaryVertexCandidate> {
        let Some(primary) = primary_vertices.first() else {
            info!("No primary vertex, skipping secondary vertex search");
            return Vec::new();
        };
        let pv = primary.position;
        let cfg = &self.config;

        let daughters = self.displaced_daughters(pv, particles);
        debug!(
            particles = particles.len(),
            displaced = daughters.len(),
            "Selected displaced daughter tracks"
        );

        let mut candidates = Vec::new();
        for (i, &(index1, charge1, helix1)) in daughters.iter().enumerate() {
            for &(index2, charge2, helix2) in &daughters[i + 1..] {
                if cfg.unlike_sign && charge1 + charge2 != 0 {
                    continue;
                }

                let (s1, s2) = helix1.path_lengths_default(&helix2);
                let point1 = helix1.at(s1);
                let point2 = helix2.at(s2);
                let dca12 = (point1 - point2).length();
                if dca12.is_nan() || dca12 > cfg.max_dca12 {
                    continue;
                }

                let position = (point1 + point2) * 0.5;
                let momentum1 = helix1.momentum_at(s1, cfg.b_field);
                let momentum2 = helix2.momentum_at(s2, cfg.b_field);
                let momentum = momentum1 + momentum2;
                let energy = momentum1.length().hypot(self.daughter_mass)
                    + momentum2.length().hypot(self.daughter_mass);

                let decay = position - pv;
                if !passes_pointing_cuts(cfg, momentum, decay) {
                    continue;
                }
                let decay_length = decay.length();

                let beta = momentum.length() / energy;
                let time = decay_length / (beta * C_LIGHT);
                let invariant_mass = (energy * energy - momentum.length_squared()).max(0.0).sqrt();

                info!(
                    x = position.x,
                    y = position.y,
                    z = position.z,
                    mass = invariant_mass,
                    dca12,
                    "Found secondary vertex"
                );

                candidates.push(SecondaryVertexCandidate {
                    vertex: Vertex {
                        vertex_type: VertexType::Secondary,
                        position,
                        time,
                        chi2: 0.0,
                        ndf: 0,
                        associated_particles: vec![index1, index2],
                    },
                    invariant_mass,
                });
            }
        }

        candidates
    }

    /// Charged particles of the daughter species with a track whose helix
    /// passes at least `min_dca` from `pv`.
    fn displaced_daughters(
        &self,
        pv: DVec3,
        particles: &[ReconstructedParticle],
    ) -> Vec<(usize, i32, Helix)> {
        let species = self.config.daughter_pdg.abs();
        particles
            .iter()
            .enumerate()
            .filter(|(_, particle)| particle.charge != 0.0 && particle.pdg.abs() == species)
            .filter_map(|(index, particle)| {
                let helix = Helix::from_particle(particle, self.config.b_field)?;
                let dca = helix.distance(pv, true);
                if dca < self.config.min_dca {
                    debug!(index, dca, "Track compatible with the primary vertex");
                    return None;
                }
                Some((index, particle.charge.round() as i32, helix))
            })
            .collect()
    }
}

/// Pair momentum must point back to the primary vertex: the opening angle to
/// the decay vector passes `min_cos_theta` and the impact parameter of the
/// momentum line stays within `max_dca`. A zero vector never passes.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub(super) fn passes_pointing_cuts(
    cfg: &SecondaryVertexConfig,
    momentum: DVec3,
    decay: DVec3,
) -> bool {
    let angle = angle_between(momentum, decay);
    // A NaN angle must fail both comparisons.
    if !(angle.cos() >= cfg.min_cos_theta) {
        return false;
    }
    decay.length() * angle.sin() <= cfg.max_dca
}
