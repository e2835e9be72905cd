use glam::DVec3;
use rayon::prelude::*;
use tracing::{debug, error, warn};

use super::config::ClusterRecoConfig;
use super::shape::ShowerShape;
use super::truth::{TruthMatcher, TruthSource};
use super::weighting::EnergyWeight;
use crate::edm::{
    CalorimeterHit, Cluster, ClusterParticleAssociation, ProtoCluster, SHAPE_PARAMETER_COUNT,
};
use crate::error::Result;
use crate::math::{angle_azimuthal, angle_polar, eta, eta_to_angle, polynomial, spherical_to_vector};

/// Clusters and truth associations of one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterRecoOutput {
    pub clusters: Vec<Cluster>,
    pub associations: Vec<ClusterParticleAssociation>,
}

/// Center-of-gravity cluster reconstruction.
///
/// The weighting method is resolved once on construction. A clusterer built
/// with [`CogClusterer::new`] from an unusable configuration is inert: it
/// logs the problem once and produces nothing.
#[derive(Debug, Clone)]
pub struct CogClusterer {
    config: ClusterRecoConfig,
    energy_weight: Option<EnergyWeight>,
}

impl CogClusterer {
    pub fn new(config: ClusterRecoConfig) -> Self {
        match Self::try_new(config.clone()) {
            Ok(clusterer) => clusterer,
            Err(err) => {
                error!("{err}");
                Self {
                    config,
                    energy_weight: None,
                }
            }
        }
    }

    pub fn try_new(config: ClusterRecoConfig) -> Result<Self> {
        config.check()?;
        let energy_weight = EnergyWeight::from_name(&config.energy_weight)?;
        Ok(Self {
            config,
            energy_weight: Some(energy_weight),
        })
    }

    pub fn config(&self) -> &ClusterRecoConfig {
        &self.config
    }

    /// Resolved weighting, `None` when inert.
    pub fn energy_weight(&self) -> Option<EnergyWeight> {
        self.energy_weight
    }

    pub fn is_inert(&self) -> bool {
        self.energy_weight.is_none()
    }

    /// Builds one cluster from a proto-cluster whose hit entries index
    /// `hits`.
    ///
    /// Returns `None` for an empty or malformed proto-cluster, when every
    /// hit ends up with zero weight, and when the clusterer is inert.
    pub fn reconstruct(&self, proto: &ProtoCluster, hits: &[CalorimeterHit]) -> Option<Cluster> {
        let energy_weight = self.energy_weight?;

        if proto.is_empty() {
            debug!("Skipping empty proto-cluster");
            return None;
        }
        if !proto.validate(hits.len()) {
            warn!(
                hits = proto.hits.len(),
                weights = proto.weights.len(),
                available = hits.len(),
                "Skipping malformed proto-cluster"
            );
            return None;
        }

        // First pass: energy, running time average, eta range.
        let mut total_energy = 0.0;
        let mut energy_error2 = 0.0;
        let mut time = 0.0;
        let mut min_hit_eta = f64::INFINITY;
        let mut max_hit_eta = f64::NEG_INFINITY;
        let mut hit_contributions = Vec::with_capacity(proto.len());

        for (index, weight) in proto.iter() {
            let hit = &hits[index];
            let energy = hit.energy * weight;
            total_energy += energy;
            energy_error2 += (hit.energy_error * weight).powi(2);
            // Running average; the result depends on hit order.
            if total_energy != 0.0 {
                time += (hit.time - time) * energy / total_energy;
            }
            hit_contributions.push(energy);

            let hit_eta = eta(hit.position);
            min_hit_eta = min_hit_eta.min(hit_eta);
            max_hit_eta = max_hit_eta.max(hit_eta);
        }

        let cluster_energy = total_energy / self.config.samp_frac;
        let log_weight_base = self.log_weight_base(cluster_energy);

        // Second pass: weighted centroid.
        let mut total_weight = 0.0;
        let mut weighted_position = DVec3::ZERO;
        for (index, weight) in proto.iter() {
            let hit = &hits[index];
            let w = energy_weight.weight(hit.energy * weight, total_energy, log_weight_base);
            total_weight += w;
            weighted_position += hit.position * w;
        }

        if total_weight == 0.0 {
            warn!(
                nhits = proto.len(),
                energy = cluster_energy,
                "Total weight is 0, skipping cluster"
            );
            return None;
        }

        let mut position = weighted_position / total_weight;

        if self.config.enable_eta_bounds {
            let cluster_eta = eta(position);
            let overflow = cluster_eta > max_hit_eta;
            let underflow = cluster_eta < min_hit_eta;
            if overflow || underflow {
                let bound = if overflow { max_hit_eta } else { min_hit_eta };
                position = spherical_to_vector(
                    position.length(),
                    eta_to_angle(bound),
                    angle_azimuthal(position),
                );
            }
        }

        // Shape weights use the hit energy without the proto-cluster weight.
        let samples: Vec<(DVec3, f64)> = proto
            .hits
            .iter()
            .map(|&index| {
                let hit = &hits[index];
                let w = energy_weight.weight(hit.energy, total_energy, log_weight_base);
                (hit.position, w)
            })
            .collect();
        let shape = ShowerShape::compute(position, &samples);

        let mut shape_parameters = [0.0; SHAPE_PARAMETER_COUNT];
        shape_parameters[0] = shape.radius;
        shape_parameters[1] = shape.dispersion;
        shape_parameters[2..4].copy_from_slice(&shape.widths_2d);
        shape_parameters[4..7].copy_from_slice(&shape.widths_3d);

        let (intrinsic_theta, intrinsic_phi) =
            if self.config.longitudinal_shower_info_available && shape.axis != DVec3::ZERO {
                (angle_polar(shape.axis), angle_azimuthal(shape.axis))
            } else {
                (f64::NAN, f64::NAN)
            };

        let cluster = Cluster {
            nhits: proto.len(),
            hits: proto.hits.clone(),
            hit_contributions,
            energy: cluster_energy,
            energy_error: energy_error2.sqrt() / self.config.samp_frac,
            time,
            time_error: 0.0,
            position,
            position_error: DVec3::ZERO,
            shape_parameters,
            intrinsic_theta,
            intrinsic_phi,
        };

        debug!(
            nhits = cluster.nhits,
            energy = cluster.energy,
            x = cluster.position.x,
            y = cluster.position.y,
            z = cluster.position.z,
            "Reconstructed cluster"
        );

        Some(cluster)
    }

    /// Truth associations of an already reconstructed cluster.
    pub fn associate(
        &self,
        cluster_index: usize,
        cluster: &Cluster,
        hits: &[CalorimeterHit],
        truth: &TruthSource<'_>,
    ) -> Vec<ClusterParticleAssociation> {
        TruthMatcher::new(truth).associate(cluster_index, cluster, hits)
    }

    /// Reconstructs every proto-cluster of an event and, with truth given,
    /// associates each cluster with its primaries.
    ///
    /// Proto-clusters are processed in parallel; clusters keep the input
    /// order and are numbered by their position in the output.
    pub fn process(
        &self,
        proto_clusters: &[ProtoCluster],
        hits: &[CalorimeterHit],
        truth: Option<&TruthSource<'_>>,
    ) -> ClusterRecoOutput {
        if self.is_inert() {
            return ClusterRecoOutput::default();
        }

        let clusters: Vec<Cluster> = proto_clusters
            .par_iter()
            .filter_map(|proto| self.reconstruct(proto, hits))
            .collect();

        let associations = match truth {
            Some(truth) => {
                let matcher = TruthMatcher::new(truth);
                clusters
                    .par_iter()
                    .enumerate()
                    .flat_map_iter(|(index, cluster)| matcher.associate(index, cluster, hits))
                    .collect()
            }
            None => {
                debug!("No simulated hits given, truth association skipped");
                Vec::new()
            }
        };

        debug!(
            proto_clusters = proto_clusters.len(),
            clusters = clusters.len(),
            associations = associations.len(),
            "Processed event"
        );

        ClusterRecoOutput {
            clusters,
            associations,
        }
    }

    fn log_weight_base(&self, cluster_energy: f64) -> f64 {
        let coeffs = &self.config.log_weight_base_coeffs;
        if coeffs.is_empty() {
            self.config.log_weight_base
        } else {
            let l = (cluster_energy / self.config.log_weight_base_e_ref).ln();
            polynomial(coeffs, l)
        }
    }
}
