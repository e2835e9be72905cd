use glam::DVec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexType {
    Primary = 1,
    Secondary = 2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub vertex_type: VertexType,
    pub position: DVec3,
    pub time: f64,
    pub chi2: f64,
    pub ndf: u32,
    /// Indices into the event's reconstructed particle collection.
    pub associated_particles: Vec<usize>,
}

impl Vertex {
    pub fn primary(position: DVec3) -> Self {
        Self {
            vertex_type: VertexType::Primary,
            position,
            time: 0.0,
            chi2: 0.0,
            ndf: 0,
            associated_particles: Vec::new(),
        }
    }
}
