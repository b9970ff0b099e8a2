// Radial force-directed layout.
//
// Goals:
// - Phases own one angular sector each, in phase order
// - Related categories drift toward each other along edges
// - No two nodes closer than the collision diameter
// - Deterministic: no randomness, same input -> same trajectory
// - A dragged node can be pinned without disturbing the rest of the model
//
// Submodules:
// - placement: ring geometry, sector spans, initial placement
// - adjacency: edge filtering (dangling targets dropped) and degree counts
// - spatial_grid: O(1) neighbor lookup for the collision pass
// - forces: the individual force contributions
// - simulation: the damped integrator and tick loop state
// - engine: owns at most one live simulation per diagram

use serde::{Deserialize, Serialize};

use crate::ontology::{OntologyStore, RelationRecord};

mod adjacency;
mod engine;
mod forces;
mod placement;
mod simulation;
mod spatial_grid;

pub use adjacency::{Adjacency, LayoutEdge};
pub use engine::LayoutEngine;
pub use forces::{
    AxisForce, Axis, Body, CenterForce, CollisionForce, Force, LinkForce, ManyBodyForce,
    RadialForce,
};
pub use placement::{sector_bands, RingGeometry, Sector, SectorBand};
pub use simulation::{NodePosition, SimNode, Simulation, SimulationStatus};

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &PointF) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Available drawing area in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Zero, negative or non-finite dimensions cannot host a layout.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> PointF {
        PointF { x: self.width / 2.0, y: self.height / 2.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Target ring radius as a fraction of min(width, height).
    pub ring_ratio: f64,
    /// Extra radius for odd-indexed categories at initial placement.
    pub ring_offset: f64,
    pub link_distance: f64,
    pub link_strength: f64,
    /// Negative repels.
    pub charge_strength: f64,
    pub center_strength: f64,
    pub radial_strength: f64,
    pub angular_strength: f64,
    pub collision_radius: f64,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    /// Alpha target held while a node is dragged.
    pub drag_alpha_target: f64,
    /// Total node speed (px/tick) under which the layout counts as settled.
    pub settle_threshold: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            ring_ratio: 0.34,
            ring_offset: 25.0,
            link_distance: 120.0,
            link_strength: 0.1,
            charge_strength: -80.0,
            center_strength: 0.05,
            radial_strength: 0.4,
            angular_strength: 0.3,
            collision_radius: 22.0,
            velocity_decay: 0.4,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            drag_alpha_target: 0.3,
            settle_threshold: 0.5,
        }
    }
}

/// A category as seen by the layout: identity plus where it sits in its phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub phase_index: usize,
    /// Position within the phase's ordered category list.
    pub slot: usize,
}

/// Node set plus the number of sectors to carve the circle into.
/// Empty phases still own a sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub phase_count: usize,
    pub nodes: Vec<LayoutNode>,
}

impl Topology {
    pub fn from_store(store: &OntologyStore) -> Self {
        let nodes = store
            .phases()
            .iter()
            .enumerate()
            .flat_map(|(pi, phase)| {
                phase.categories.iter().enumerate().map(move |(ci, cat)| LayoutNode {
                    id: cat.id.clone(),
                    phase_index: pi,
                    slot: ci,
                })
            })
            .collect();
        Self { phase_count: store.phases().len(), nodes }
    }

    /// Number of categories in each phase.
    pub fn phase_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.phase_count];
        for node in &self.nodes {
            if let Some(s) = sizes.get_mut(node.phase_index) {
                *s += 1;
            }
        }
        sizes
    }
}

/// Start a simulation over `topology`. Relations with an endpoint outside the
/// node set are left out of the force model. Returns `None` for an unusable
/// viewport.
pub fn build_layout(
    topology: &Topology,
    relations: &[RelationRecord],
    viewport: Viewport,
    cfg: &LayoutConfig,
) -> Option<Simulation> {
    let Some(geometry) = RingGeometry::for_viewport(viewport, cfg) else {
        tracing::warn!(
            width = viewport.width,
            height = viewport.height,
            "layout skipped: viewport has no usable area"
        );
        return None;
    };
    Some(Simulation::new(topology, relations, geometry, cfg))
}
