// Radial sector placement.
//
// The circle is cut into one equal sector per phase, starting at twelve
// o'clock and running clockwise (screen space, y down). Categories spread
// evenly over their phase's span; odd slots sit on an outer ring so that
// neighbors in the same phase start apart.
//
// Every node keeps the angle it was placed at as its target angle for the
// lifetime of the simulation.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::Serialize;

use super::{LayoutConfig, PointF, Topology, Viewport};

/// Band drawn behind each sector, relative to the ring radius.
const BAND_HALF_WIDTH: f64 = 60.0;
/// Distance of the phase label from the ring.
const LABEL_OFFSET: f64 = 85.0;

/// Center and radius of the target ring.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RingGeometry {
    pub center: PointF,
    pub radius: f64,
}

impl RingGeometry {
    pub fn for_viewport(viewport: Viewport, cfg: &LayoutConfig) -> Option<Self> {
        if !viewport.is_valid() {
            return None;
        }
        Some(Self {
            center: viewport.center(),
            radius: viewport.width.min(viewport.height) * cfg.ring_ratio,
        })
    }

    pub fn point_at(&self, angle: f64, radius: f64) -> PointF {
        PointF {
            x: self.center.x + angle.cos() * radius,
            y: self.center.y + angle.sin() * radius,
        }
    }

    /// The point on the target ring at `angle`.
    pub fn ring_point(&self, angle: f64) -> PointF {
        self.point_at(angle, self.radius)
    }
}

/// Angular span of one phase, in radians.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Sector {
    pub start: f64,
    pub end: f64,
}

impl Sector {
    pub fn of(phase_index: usize, phase_count: usize) -> Self {
        let n = phase_count.max(1) as f64;
        Self {
            start: (phase_index as f64 / n) * TAU - FRAC_PI_2,
            end: ((phase_index + 1) as f64 / n) * TAU - FRAC_PI_2,
        }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Angle of slot `slot` out of `count` evenly spread slots.
    pub fn slot_angle(&self, slot: usize, count: usize) -> f64 {
        self.start + ((slot as f64 + 0.5) / count.max(1) as f64) * self.span()
    }

    pub fn contains(&self, angle: f64) -> bool {
        let a = (angle - self.start).rem_euclid(TAU);
        a <= self.span() + 1e-9
    }
}

/// Initial position and fixed target angle of one node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub target_angle: f64,
    pub position: PointF,
}

/// Place every node of `topology`, in node order.
pub fn place_radial(topology: &Topology, geometry: &RingGeometry, cfg: &LayoutConfig) -> Vec<Placement> {
    let sizes = topology.phase_sizes();
    topology
        .nodes
        .iter()
        .map(|node| {
            let sector = Sector::of(node.phase_index, topology.phase_count);
            let count = sizes.get(node.phase_index).copied().unwrap_or(1);
            let angle = sector.slot_angle(node.slot, count);
            let r = if node.slot % 2 == 0 { geometry.radius } else { geometry.radius + cfg.ring_offset };
            Placement { target_angle: angle, position: geometry.point_at(angle, r) }
        })
        .collect()
}

/// Background band and label anchor for one phase sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorBand {
    pub phase_index: usize,
    pub sector: Sector,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub label: PointF,
    /// Degrees, flipped on the left half so text never reads upside down.
    pub label_rotation: f64,
}

pub fn sector_bands(phase_count: usize, geometry: &RingGeometry) -> Vec<SectorBand> {
    (0..phase_count)
        .map(|pi| {
            let sector = Sector::of(pi, phase_count);
            let mid = sector.mid();
            let deg = mid * 180.0 / PI;
            let label_rotation = if deg > 90.0 || deg < -90.0 { deg + 180.0 } else { deg };
            SectorBand {
                phase_index: pi,
                sector,
                inner_radius: (geometry.radius - BAND_HALF_WIDTH).max(0.0),
                outer_radius: geometry.radius + BAND_HALF_WIDTH,
                label: geometry.point_at(mid, geometry.radius + LABEL_OFFSET),
                label_rotation,
            }
        })
        .collect()
}
