//! Reconstructs one synthetic event: two calorimeter showers and a K0S
//! decaying into two charged pions 3 cm from the interaction point.
//!
//! Run with `cargo run -p reco --example reconstruct_event`.

use anyhow::Result;
use glam::{DVec2, DVec3};
use tracing::info;

use reco::math::angle_azimuthal;
use reco::prelude::*;
use reco::units::{CM, GEV, MEV};

const B_FIELD: f64 = 1.7;

fn main() -> Result<()> {
    common::log_setup::setup_logging("info", "logs")?;

    // Calorimetry
    let mut hits = Vec::new();
    let mut proto_clusters = Vec::new();
    for (shower, direction) in [DVec3::new(1.0, 0.2, 0.4), DVec3::new(-0.3, 1.0, -0.8)]
        .into_iter()
        .enumerate()
    {
        let center = direction.normalize() * 150.0 * CM;
        let first = hits.len();
        for step in 0..9 {
            let offset = DVec3::new(f64::from(step % 3) - 1.0, f64::from(step / 3) - 1.0, 0.0);
            let energy = if offset == DVec3::ZERO { 800.0 * MEV } else { 60.0 * MEV };
            let cell_id = ((shower as u64) << 32) | step as u64;
            hits.push(CalorimeterHit::new(cell_id, energy, 5.0, center + offset * 2.0 * CM));
        }
        proto_clusters.push((first..hits.len()).map(|index| (index, 1.0)).collect::<ProtoCluster>());
    }

    let clusterer = CogClusterer::new(ClusterRecoConfig {
        samp_frac: 0.9,
        ..Default::default()
    });
    let output = clusterer.process(&proto_clusters, &hits, None);
    for cluster in &output.clusters {
        info!(
            energy = cluster.energy,
            x = cluster.position.x,
            y = cluster.position.y,
            z = cluster.position.z,
            radius = cluster.radius(),
            "Cluster"
        );
    }

    // Vertexing
    let decay = DVec3::new(2.5, 1.5, 0.8) * CM;
    let total = decay.normalize() * 1.2 * GEV;
    let across = DVec3::new(-total.y, total.x, 0.0).normalize() * 0.2 + DVec3::new(0.0, 0.0, 0.05);
    let particles = vec![
        pion(1, decay, total * 0.5 + across),
        pion(-1, decay, total * 0.5 - across),
    ];

    let finder = SecondaryVertexFinder::new(SecondaryVertexConfig {
        b_field: B_FIELD,
        ..Default::default()
    })?;
    let primary_vertices = vec![Vertex::primary(DVec3::ZERO)];
    for candidate in finder.find(&primary_vertices, &particles) {
        info!(
            mass = candidate.invariant_mass,
            time = candidate.vertex.time,
            particles = ?candidate.vertex.associated_particles,
            "Secondary vertex"
        );
    }

    Ok(())
}

/// Charged pion produced at `vertex`, described by its track parameters at
/// the point of closest approach to the beam line.
fn pion(charge: i32, vertex: DVec3, momentum: DVec3) -> ReconstructedParticle {
    let helix = Helix::from_momentum(momentum, vertex, B_FIELD, charge);
    let s = helix.path_length_xy(0.0, 0.0);
    let pca = helix.at(s);
    let p = helix.momentum_at(s, B_FIELD);
    let (sin_phi, cos_phi) = angle_azimuthal(p).sin_cos();
    let loc = DVec2::new(-pca.x * sin_phi + pca.y * cos_phi, pca.z);

    ReconstructedParticle {
        pdg: 211 * charge,
        charge: f64::from(charge),
        momentum,
        tracks: vec![TrackParameters::from_momentum(p, f64::from(charge), loc)],
        ..Default::default()
    }
}
