// Force contributions for the radial simulation.
//
// Each force reads the current bodies and adds to their velocities (center is
// the exception: it translates positions directly). Forces are applied in a
// fixed order and then integrated once per tick by the simulation.
//
// Pinned bodies still push and pull on others; the integrator discards any
// velocity they receive.

use super::adjacency::LayoutEdge;
use super::spatial_grid::SpatialGrid;
use super::PointF;

/// Minimum squared distance used by the many-body force.
const DISTANCE_MIN2: f64 = 1.0;

/// Kinematic state of one node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Pinned position; overrides integration while set.
    pub pin: Option<PointF>,
}

impl Body {
    pub fn at(p: PointF) -> Self {
        Self { x: p.x, y: p.y, vx: 0.0, vy: 0.0, pin: None }
    }

    pub fn position(&self) -> PointF {
        PointF { x: self.x, y: self.y }
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

/// Tiny deterministic offset used when two points coincide.
fn jiggle(seed: usize) -> f64 {
    ((seed as f64 * 0.618_033_988_749_895).fract() - 0.5) * 1e-6
}

pub trait Force {
    fn name(&self) -> &'static str;
    fn apply(&mut self, bodies: &mut [Body], alpha: f64);
}

// ============================================================================
// Link
// ============================================================================

/// Spring along every retained edge toward `distance`.
#[derive(Debug, Clone)]
pub struct LinkForce {
    links: Vec<(usize, usize)>,
    /// Share of the correction taken by the target, per link.
    bias: Vec<f64>,
    distance: f64,
    strength: f64,
}

impl LinkForce {
    pub fn new(edges: &[LayoutEdge], degree: &[usize], distance: f64, strength: f64) -> Self {
        let links: Vec<(usize, usize)> = edges
            .iter()
            .filter(|e| e.source != e.target)
            .map(|e| (e.source, e.target))
            .collect();
        let bias = links
            .iter()
            .map(|&(s, t)| {
                let ds = degree.get(s).copied().unwrap_or(1) as f64;
                let dt = degree.get(t).copied().unwrap_or(1) as f64;
                if ds + dt > 0.0 { ds / (ds + dt) } else { 0.5 }
            })
            .collect();
        Self { links, bias, distance, strength }
    }
}

impl Force for LinkForce {
    fn name(&self) -> &'static str {
        "link"
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f64) {
        for (k, &(s, t)) in self.links.iter().enumerate() {
            let (src, dst) = (bodies[s], bodies[t]);
            let mut dx = dst.x + dst.vx - src.x - src.vx;
            let mut dy = dst.y + dst.vy - src.y - src.vy;
            if dx == 0.0 && dy == 0.0 {
                dx = jiggle(k);
                dy = jiggle(k + 1);
            }
            let len = dx.hypot(dy);
            let l = (len - self.distance) / len * alpha * self.strength;
            dx *= l;
            dy *= l;
            let b = self.bias[k];
            bodies[t].vx -= dx * b;
            bodies[t].vy -= dy * b;
            bodies[s].vx += dx * (1.0 - b);
            bodies[s].vy += dy * (1.0 - b);
        }
    }
}

// ============================================================================
// Many-body (charge)
// ============================================================================

/// Pairwise inverse-distance force; negative strength repels.
#[derive(Debug, Clone)]
pub struct ManyBodyForce {
    strength: f64,
}

impl ManyBodyForce {
    pub fn new(strength: f64) -> Self {
        Self { strength }
    }
}

impl Force for ManyBodyForce {
    fn name(&self) -> &'static str {
        "charge"
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f64) {
        let n = bodies.len();
        for i in 0..n {
            let (xi, yi) = (bodies[i].x, bodies[i].y);
            let (mut ax, mut ay) = (0.0, 0.0);
            for (j, other) in bodies.iter().enumerate() {
                if i == j {
                    continue;
                }
                let mut dx = other.x - xi;
                let mut dy = other.y - yi;
                if dx == 0.0 && dy == 0.0 {
                    dx = jiggle(i * n + j);
                    dy = jiggle(j * n + i);
                }
                let mut l = dx * dx + dy * dy;
                if l < DISTANCE_MIN2 {
                    l = (DISTANCE_MIN2 * l).sqrt();
                }
                let w = self.strength * alpha / l;
                ax += dx * w;
                ay += dy * w;
            }
            bodies[i].vx += ax;
            bodies[i].vy += ay;
        }
    }
}

// ============================================================================
// Center
// ============================================================================

/// Translates free bodies so their mean drifts toward `center`.
#[derive(Debug, Clone)]
pub struct CenterForce {
    center: PointF,
    strength: f64,
}

impl CenterForce {
    pub fn new(center: PointF, strength: f64) -> Self {
        Self { center, strength }
    }
}

impl Force for CenterForce {
    fn name(&self) -> &'static str {
        "center"
    }

    fn apply(&mut self, bodies: &mut [Body], _alpha: f64) {
        if bodies.is_empty() {
            return;
        }
        let n = bodies.len() as f64;
        let (sx, sy) = bodies.iter().fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
        let shift_x = (sx / n - self.center.x) * self.strength;
        let shift_y = (sy / n - self.center.y) * self.strength;
        for b in bodies.iter_mut().filter(|b| !b.is_pinned()) {
            b.x -= shift_x;
            b.y -= shift_y;
        }
    }
}

// ============================================================================
// Radial
// ============================================================================

/// Pulls every body toward the circle of `radius` around `center`.
#[derive(Debug, Clone)]
pub struct RadialForce {
    center: PointF,
    radius: f64,
    strength: f64,
}

impl RadialForce {
    pub fn new(center: PointF, radius: f64, strength: f64) -> Self {
        Self { center, radius, strength }
    }
}

impl Force for RadialForce {
    fn name(&self) -> &'static str {
        "radial"
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f64) {
        for b in bodies.iter_mut() {
            let mut dx = b.x - self.center.x;
            let dy = b.y - self.center.y;
            if dx == 0.0 && dy == 0.0 {
                dx = 1e-6;
            }
            let r = dx.hypot(dy);
            let k = (self.radius - r) * self.strength * alpha / r;
            b.vx += dx * k;
            b.vy += dy * k;
        }
    }
}

// ============================================================================
// Angular (one per axis)
// ============================================================================

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Pulls each body along one axis toward a per-body coordinate. Two of these
/// (X and Y) aimed at the ring point of each body's target angle hold the
/// phase sectors in place.
#[derive(Debug, Clone)]
pub struct AxisForce {
    axis: Axis,
    targets: Vec<f64>,
    strength: f64,
}

impl AxisForce {
    pub fn new(axis: Axis, targets: Vec<f64>, strength: f64) -> Self {
        Self { axis, targets, strength }
    }

    /// Angular force component toward `points` on `axis`.
    pub fn toward(axis: Axis, points: &[PointF], strength: f64) -> Self {
        let targets = points
            .iter()
            .map(|p| match axis {
                Axis::X => p.x,
                Axis::Y => p.y,
            })
            .collect();
        Self::new(axis, targets, strength)
    }
}

impl Force for AxisForce {
    fn name(&self) -> &'static str {
        match self.axis {
            Axis::X => "angular",
            Axis::Y => "angular_y",
        }
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f64) {
        for (b, &target) in bodies.iter_mut().zip(&self.targets) {
            match self.axis {
                Axis::X => b.vx += (target - b.x) * self.strength * alpha,
                Axis::Y => b.vy += (target - b.y) * self.strength * alpha,
            }
        }
    }
}

// ============================================================================
// Collision
// ============================================================================

/// Separates any two bodies closer than `2 * radius`. Works on predicted
/// positions (position + velocity) and does not scale with alpha, so overlap
/// keeps being resolved after the other forces have cooled down.
#[derive(Debug, Clone)]
pub struct CollisionForce {
    radius: f64,
    strength: f64,
    grid: SpatialGrid,
}

impl CollisionForce {
    pub fn new(radius: f64) -> Self {
        Self { radius, strength: 1.0, grid: SpatialGrid::new(radius * 2.0) }
    }
}

impl Force for CollisionForce {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn apply(&mut self, bodies: &mut [Body], _alpha: f64) {
        let predicted: Vec<PointF> = bodies
            .iter()
            .map(|b| PointF { x: b.x + b.vx, y: b.y + b.vy })
            .collect();

        self.grid.clear();
        for (i, p) in predicted.iter().enumerate() {
            self.grid.insert(i, *p);
        }

        let min_dist = self.radius * 2.0;
        let min_dist2 = min_dist * min_dist;
        for i in 0..bodies.len() {
            let pi = predicted[i];
            let mut near: Vec<usize> = self.grid.near(pi).filter(|&j| j > i).collect();
            near.sort_unstable();
            for j in near {
                let pj = predicted[j];
                let mut dx = pi.x - pj.x;
                let mut dy = pi.y - pj.y;
                let mut l = dx * dx + dy * dy;
                if l >= min_dist2 {
                    continue;
                }
                if dx == 0.0 && dy == 0.0 {
                    dx = jiggle(i * 31 + j);
                    dy = jiggle(j * 31 + i);
                    l = dx * dx + dy * dy;
                }
                let len = l.sqrt();
                let k = (min_dist - len) / len * self.strength;
                dx *= k;
                dy *= k;
                // equal radii: the correction is split evenly
                bodies[i].vx += dx * 0.5;
                bodies[i].vy += dy * 0.5;
                bodies[j].vx -= dx * 0.5;
                bodies[j].vy -= dy * 0.5;
            }
        }
    }
}
