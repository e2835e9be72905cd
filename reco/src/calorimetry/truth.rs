//! Cluster to MC-particle truth association.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use tracing::{debug, trace, warn};

use crate::edm::{
    CalorimeterHit, CalorimeterHitAssociation, Cluster, ClusterParticleAssociation, McParticle,
    SimCalorimeterHit,
};

/// Simulation truth available for an event.
#[derive(Debug, Clone, Copy)]
pub enum TruthSource<'a> {
    /// Simulated hits matched to reconstructed hits by cell id.
    SimHits {
        sim_hits: &'a [SimCalorimeterHit],
        particles: &'a [McParticle],
    },
    /// Digitization links from raw cell ids to simulated hits.
    HitAssociations {
        associations: &'a [CalorimeterHitAssociation],
        sim_hits: &'a [SimCalorimeterHit],
        particles: &'a [McParticle],
    },
}

impl<'a> TruthSource<'a> {
    pub fn sim_hits(&self) -> &'a [SimCalorimeterHit] {
        match *self {
            TruthSource::SimHits { sim_hits, .. } => sim_hits,
            TruthSource::HitAssociations { sim_hits, .. } => sim_hits,
        }
    }

    pub fn particles(&self) -> &'a [McParticle] {
        match *self {
            TruthSource::SimHits { particles, .. } => particles,
            TruthSource::HitAssociations { particles, .. } => particles,
        }
    }
}

/// Per-event lookup from cell id to simulated hit, built once and shared by
/// every cluster of the event.
#[derive(Debug)]
pub struct TruthMatcher<'a> {
    sim_hits: &'a [SimCalorimeterHit],
    particles: &'a [McParticle],
    by_cell: HashMap<u64, usize>,
}

impl<'a> TruthMatcher<'a> {
    pub fn new(source: &TruthSource<'a>) -> Self {
        let mut by_cell = HashMap::new();
        match *source {
            TruthSource::SimHits { sim_hits, .. } => {
                for (index, sim_hit) in sim_hits.iter().enumerate() {
                    by_cell.entry(sim_hit.cell_id).or_insert(index);
                }
            }
            TruthSource::HitAssociations {
                associations,
                sim_hits,
                ..
            } => {
                for association in associations {
                    if association.sim_hit < sim_hits.len() {
                        by_cell
                            .entry(association.raw_cell_id)
                            .or_insert(association.sim_hit);
                    } else {
                        warn!(
                            cell_id = association.raw_cell_id,
                            sim_hit = association.sim_hit,
                            "Hit association points past the simulated hits"
                        );
                    }
                }
            }
        }

        Self {
            sim_hits: source.sim_hits(),
            particles: source.particles(),
            by_cell,
        }
    }

    /// First simulated hit recorded for `cell_id`.
    pub fn sim_hit_for_cell(&self, cell_id: u64) -> Option<&'a SimCalorimeterHit> {
        self.by_cell.get(&cell_id).map(|&index| &self.sim_hits[index])
    }

    /// Associations of cluster `cluster_index` with the primary particles
    /// that deposited its energy, ordered by primary index.
    ///
    /// Each weight is the primary's deposited energy over the total energy
    /// of the matched simulated hits.
    pub fn associate(
        &self,
        cluster_index: usize,
        cluster: &Cluster,
        hits: &[CalorimeterHit],
    ) -> Vec<ClusterParticleAssociation> {
        let mut sim_energy_sum = 0.0;
        // primary index -> (deposited energy, first (sim hit, contribution))
        let mut per_primary: BTreeMap<usize, (f64, (usize, usize))> = BTreeMap::new();

        for &hit_index in &cluster.hits {
            let Some(hit) = hits.get(hit_index) else {
                warn!(hit_index, "Cluster refers to a missing hit");
                continue;
            };
            let Some(&sim_index) = self.by_cell.get(&hit.cell_id) else {
                debug!(cell_id = hit.cell_id, "No simulated hit for cell");
                continue;
            };
            let sim_hit = &self.sim_hits[sim_index];
            sim_energy_sum += sim_hit.energy;

            for (contribution_index, contribution) in sim_hit.contributions.iter().enumerate() {
                let Some(primary) = primary_of(self.particles, contribution.particle) else {
                    warn!(
                        particle = contribution.particle,
                        "Contribution refers to a missing particle"
                    );
                    continue;
                };
                per_primary
                    .entry(primary)
                    .and_modify(|(energy, _)| *energy += contribution.energy)
                    .or_insert((contribution.energy, (sim_index, contribution_index)));
            }
        }

        per_primary
            .into_iter()
            .filter(|(_, (energy, _))| *energy != 0.0)
            .map(|(primary, (energy, (sim_index, contribution_index)))| {
                trace!(
                    cluster_index,
                    primary,
                    sim_hit = sim_index,
                    contribution = contribution_index,
                    energy,
                    "Primary contributes to cluster"
                );
                ClusterParticleAssociation {
                    rec_id: cluster_index,
                    sim_id: primary,
                    weight: energy / sim_energy_sum,
                }
            })
            .collect()
    }
}

/// Walks the genealogy of `index` up to its primary: the first particle
/// (itself included) with generator final-state status, or one without
/// parents.
///
/// Only the first parent is followed; additional parents are ignored.
pub fn primary_of(particles: &[McParticle], mut index: usize) -> Option<usize> {
    // A well formed genealogy is acyclic, so the walk is at most this long.
    for _ in 0..=particles.len() {
        let particle = particles.get(index)?;
        match particle.parents.first() {
            Some(&parent) if !particle.is_generator_final_state() => index = parent,
            _ => return Some(index),
        }
    }
    warn!(index, "Particle genealogy contains a cycle");
    None
}
