//! The damped integrator behind the radial layout.
//!
//! A [`Simulation`] owns the only mutable copy of node positions. Each tick
//! cools `alpha` toward `alpha_target`, runs every force in order, then
//! integrates velocities into positions. Pinned bodies are snapped to their
//! pin after integration, so a pinned node reports exactly its pin position.
//!
//! The tick loop is cooperative: the host calls [`Simulation::advance`] once
//! per frame and stops when it returns `false`.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::adjacency::{Adjacency, LayoutEdge};
use super::forces::{
    Axis, AxisForce, Body, CenterForce, CollisionForce, Force, LinkForce, ManyBodyForce,
    RadialForce,
};
use super::placement::{place_radial, RingGeometry};
use super::{LayoutConfig, PointF, Topology};
use crate::ontology::RelationRecord;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    Running,
    /// Cooled and below the settle threshold; `advance` is a no-op until reheated.
    Settled,
    /// Terminal. Nothing ticks again.
    Disposed,
}

/// Static per-node data fixed at build time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimNode {
    pub id: String,
    pub phase_index: usize,
    /// Radians; assigned at placement and never changed.
    pub target_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

pub struct Simulation {
    nodes: Vec<SimNode>,
    bodies: Vec<Body>,
    index: HashMap<String, usize>,
    adjacency: Adjacency,
    forces: Vec<Box<dyn Force>>,
    geometry: RingGeometry,
    phase_count: usize,

    alpha: f64,
    alpha_target: f64,
    alpha_min: f64,
    alpha_decay: f64,
    velocity_decay: f64,
    settle_threshold: f64,

    status: SimulationStatus,
    ticks: u64,
}

impl Simulation {
    pub fn new(
        topology: &Topology,
        relations: &[RelationRecord],
        geometry: RingGeometry,
        cfg: &LayoutConfig,
    ) -> Self {
        let placements = place_radial(topology, &geometry, cfg);

        let nodes: Vec<SimNode> = topology
            .nodes
            .iter()
            .zip(&placements)
            .map(|(n, p)| SimNode {
                id: n.id.clone(),
                phase_index: n.phase_index,
                target_angle: p.target_angle,
            })
            .collect();
        let bodies: Vec<Body> = placements.iter().map(|p| Body::at(p.position)).collect();
        let index: HashMap<String, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();

        let adjacency = Adjacency::from_relations(&index, relations);

        let ring_targets: Vec<PointF> =
            nodes.iter().map(|n| geometry.ring_point(n.target_angle)).collect();

        let forces: Vec<Box<dyn Force>> = vec![
            Box::new(LinkForce::new(
                &adjacency.edges,
                &adjacency.degree,
                cfg.link_distance,
                cfg.link_strength,
            )),
            Box::new(ManyBodyForce::new(cfg.charge_strength)),
            Box::new(CenterForce::new(geometry.center, cfg.center_strength)),
            Box::new(RadialForce::new(geometry.center, geometry.radius, cfg.radial_strength)),
            Box::new(AxisForce::toward(Axis::X, &ring_targets, cfg.angular_strength)),
            Box::new(AxisForce::toward(Axis::Y, &ring_targets, cfg.angular_strength)),
            Box::new(CollisionForce::new(cfg.collision_radius)),
        ];

        tracing::info!(
            nodes = nodes.len(),
            edges = adjacency.edges.len(),
            radius = geometry.radius,
            "layout simulation built"
        );

        Self {
            nodes,
            bodies,
            index,
            adjacency,
            forces,
            geometry,
            phase_count: topology.phase_count,
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_min: cfg.alpha_min,
            alpha_decay: cfg.alpha_decay,
            velocity_decay: cfg.velocity_decay,
            settle_threshold: cfg.settle_threshold,
            status: SimulationStatus::Running,
            ticks: 0,
        }
    }

    /// Run exactly one tick, regardless of status (except after dispose).
    pub fn step(&mut self) {
        if self.status == SimulationStatus::Disposed {
            return;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        for force in self.forces.iter_mut() {
            force.apply(&mut self.bodies, self.alpha);
        }

        let keep = 1.0 - self.velocity_decay;
        for body in self.bodies.iter_mut() {
            match body.pin {
                Some(p) => {
                    body.x = p.x;
                    body.y = p.y;
                    body.vx = 0.0;
                    body.vy = 0.0;
                }
                None => {
                    body.vx *= keep;
                    body.vy *= keep;
                    body.x += body.vx;
                    body.y += body.vy;
                }
            }
        }

        self.ticks += 1;
    }

    /// One iteration of the cooperative tick loop. Returns `false` once the
    /// layout has settled or the simulation was disposed.
    pub fn advance(&mut self) -> bool {
        if self.status != SimulationStatus::Running {
            return false;
        }
        self.step();
        if self.alpha < self.alpha_min && self.alpha_target <= 0.0 && self.is_settled() {
            tracing::debug!(ticks = self.ticks, "layout settled");
            self.status = SimulationStatus::Settled;
        }
        true
    }

    /// Hold alpha near `alpha_target` so the layout keeps moving, and wake the
    /// tick loop.
    pub fn reheat(&mut self, alpha_target: f64) {
        if self.status == SimulationStatus::Disposed {
            return;
        }
        self.alpha_target = alpha_target;
        self.status = SimulationStatus::Running;
    }

    /// Drop the alpha target back to zero; alpha decays from where it is.
    pub fn release(&mut self) {
        self.alpha_target = 0.0;
    }

    /// Pin `id` at `p`. The body jumps there immediately. Non-finite points
    /// are refused and leave the body untouched.
    pub fn pin(&mut self, id: &str, p: PointF) -> bool {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        if !p.is_finite() {
            tracing::debug!(id, x = p.x, y = p.y, "ignoring non-finite pin");
            return false;
        }
        let body = &mut self.bodies[i];
        body.pin = Some(p);
        body.x = p.x;
        body.y = p.y;
        body.vx = 0.0;
        body.vy = 0.0;
        true
    }

    /// Release a pin; the node stays where it was last pinned.
    pub fn unpin(&mut self, id: &str) -> bool {
        match self.index.get(id) {
            Some(&i) => self.bodies[i].pin.take().is_some(),
            None => false,
        }
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.index.get(id).is_some_and(|&i| self.bodies[i].is_pinned())
    }

    /// Stop ticking for good and release the force state.
    pub fn dispose(&mut self) {
        if self.status != SimulationStatus::Disposed {
            tracing::debug!(ticks = self.ticks, "layout simulation disposed");
        }
        self.status = SimulationStatus::Disposed;
        self.forces.clear();
    }

    /// Sum of free body speeds.
    pub fn total_velocity(&self) -> f64 {
        self.bodies.iter().filter(|b| !b.is_pinned()).map(Body::speed).sum()
    }

    pub fn is_settled(&self) -> bool {
        self.total_velocity() < self.settle_threshold
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SimulationStatus::Running
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn geometry(&self) -> &RingGeometry {
        &self.geometry
    }

    pub fn phase_count(&self) -> usize {
        self.phase_count
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    /// The edge set the forces act on. Fixed for the simulation's lifetime.
    pub fn edges(&self) -> &[LayoutEdge] {
        &self.adjacency.edges
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn node_id(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(|n| n.id.as_str())
    }

    pub fn position(&self, id: &str) -> Option<PointF> {
        self.index.get(id).map(|&i| self.bodies[i].position())
    }

    pub fn position_at(&self, index: usize) -> Option<PointF> {
        self.bodies.get(index).map(Body::position)
    }

    /// Read-only copy of every node position, in node order.
    pub fn snapshot(&self) -> Vec<NodePosition> {
        self.nodes
            .iter()
            .zip(&self.bodies)
            .map(|(n, b)| NodePosition { id: n.id.clone(), x: b.x, y: b.y })
            .collect()
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.adjacency.edges.len())
            .field("forces", &self.forces.iter().map(|force| force.name()).collect::<Vec<_>>())
            .field("alpha", &self.alpha)
            .field("alpha_target", &self.alpha_target)
            .field("status", &self.status)
            .field("ticks", &self.ticks)
            .finish()
    }
}
