use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Number of entries in [`Cluster::shape_parameters`].
pub const SHAPE_PARAMETER_COUNT: usize = 7;

/// A reconstructed calorimeter cell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalorimeterHit {
    pub cell_id: u64,
    pub energy: f64,
    pub energy_error: f64,
    pub time: f64,
    pub time_error: f64,
    pub position: DVec3,
    pub dimension: DVec3,
    pub sector: i32,
    pub layer: i32,
    pub local: DVec3,
}

impl CalorimeterHit {
    /// Hit with the given cell, energy, time and global position; every
    /// other field zeroed.
    pub fn new(cell_id: u64, energy: f64, time: f64, position: DVec3) -> Self {
        Self {
            cell_id,
            energy,
            time,
            position,
            ..Default::default()
        }
    }
}

/// Hits grouped by an upstream clustering stage, with per-hit weights
/// (fractions of the hit energy attributed to this group).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProtoCluster {
    /// Indices into the event's hit collection.
    pub hits: Vec<usize>,
    pub weights: Vec<f64>,
}

impl ProtoCluster {
    pub fn push(&mut self, hit: usize, weight: f64) {
        self.hits.push(hit);
        self.weights.push(weight);
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Iterates `(hit index, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.hits.iter().copied().zip(self.weights.iter().copied())
    }

    /// Hit and weight arrays must have equal length and every hit index must
    /// be below `hit_count`.
    pub fn validate(&self, hit_count: usize) -> bool {
        self.hits.len() == self.weights.len() && self.hits.iter().all(|&i| i < hit_count)
    }
}

impl FromIterator<(usize, f64)> for ProtoCluster {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        let mut proto = ProtoCluster::default();
        for (hit, weight) in iter {
            proto.push(hit, weight);
        }
        proto
    }
}

/// A reconstructed calorimeter cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub nhits: usize,
    /// Indices into the event's hit collection.
    pub hits: Vec<usize>,
    /// `hit.energy * weight` for every entry of `hits`.
    pub hit_contributions: Vec<f64>,
    pub energy: f64,
    pub energy_error: f64,
    pub time: f64,
    pub time_error: f64,
    pub position: DVec3,
    /// Not computed; always zero.
    pub position_error: DVec3,
    /// `[radius, dispersion, 2D width 1, 2D width 2, 3D width 1, 3D width 2, 3D width 3]`.
    /// Widths are eigenvalues of the (θ, φ) and (x, y, z) covariance, ascending.
    pub shape_parameters: [f64; SHAPE_PARAMETER_COUNT],
    /// NaN unless longitudinal shower information is available.
    pub intrinsic_theta: f64,
    /// NaN unless longitudinal shower information is available.
    pub intrinsic_phi: f64,
}

impl Cluster {
    pub fn radius(&self) -> f64 {
        self.shape_parameters[0]
    }

    pub fn dispersion(&self) -> f64 {
        self.shape_parameters[1]
    }

    pub fn widths_2d(&self) -> [f64; 2] {
        [self.shape_parameters[2], self.shape_parameters[3]]
    }

    pub fn widths_3d(&self) -> [f64; 3] {
        [
            self.shape_parameters[4],
            self.shape_parameters[5],
            self.shape_parameters[6],
        ]
    }
}

/// Energy deposited in a simulated cell by one particle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CaloHitContribution {
    pub pdg: i32,
    pub energy: f64,
    pub time: f64,
    pub step_position: DVec3,
    /// Index into the event's MC particle collection.
    pub particle: usize,
}

/// A simulated calorimeter cell with its per-particle contributions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimCalorimeterHit {
    pub cell_id: u64,
    pub energy: f64,
    pub position: DVec3,
    pub contributions: Vec<CaloHitContribution>,
}

/// Links a digitized cell (by cell id) to the simulated hit it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalorimeterHitAssociation {
    pub raw_cell_id: u64,
    /// Index into the event's simulated hit collection.
    pub sim_hit: usize,
    pub weight: f64,
}

/// Truth link from a reconstructed cluster to a primary MC particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterParticleAssociation {
    /// Index of the cluster in the output collection.
    pub rec_id: usize,
    /// Index of the primary particle in the MC particle collection.
    pub sim_id: usize,
    /// Fraction of the matched simulated energy carried by the particle.
    pub weight: f64,
}
