// Layout engine: one per mounted diagram.
//
// Owns the node topology, the current viewport and at most one live
// simulation. Every rebuild disposes the previous simulation first, so two
// tick loops never drive the same surface.

use super::{build_layout, LayoutConfig, PointF, Simulation, Topology, Viewport};
use crate::ontology::{OntologyStore, RelationRecord};

#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    topology: Topology,
    relations: Vec<RelationRecord>,
    viewport: Option<Viewport>,
    simulation: Option<Simulation>,
}

impl LayoutEngine {
    pub fn new(store: &OntologyStore, config: LayoutConfig) -> Self {
        Self::from_parts(Topology::from_store(store), store.all_relations().to_vec(), config)
    }

    pub fn from_parts(topology: Topology, relations: Vec<RelationRecord>, config: LayoutConfig) -> Self {
        Self { config, topology, relations, viewport: None, simulation: None }
    }

    /// Rebuild from scratch for `viewport`. Positions are not carried over.
    /// Returns whether a simulation is live afterwards.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.dispose();
        self.viewport = Some(viewport);
        self.simulation = build_layout(&self.topology, &self.relations, viewport, &self.config);
        if self.simulation.is_some() {
            tracing::debug!(width = viewport.width, height = viewport.height, "layout rebuilt");
        }
        self.simulation.is_some()
    }

    /// Rebuild for the last known viewport.
    pub fn rebuild(&mut self) -> bool {
        match self.viewport {
            Some(viewport) => self.resize(viewport),
            None => false,
        }
    }

    /// Swap the configuration and rebuild.
    pub fn set_config(&mut self, config: LayoutConfig) -> bool {
        self.config = config;
        self.rebuild()
    }

    /// Advance the tick loop once. `false` when there is nothing left to do.
    pub fn tick(&mut self) -> bool {
        self.simulation.as_mut().is_some_and(Simulation::advance)
    }

    pub fn is_running(&self) -> bool {
        self.simulation.as_ref().is_some_and(Simulation::is_running)
    }

    /// Pin `id` at `p` and hold the simulation warm while it is dragged.
    pub fn begin_drag(&mut self, id: &str, p: PointF) -> bool {
        let target = self.config.drag_alpha_target;
        let Some(sim) = self.simulation.as_mut() else {
            return false;
        };
        if !sim.pin(id, p) {
            return false;
        }
        sim.reheat(target);
        tracing::debug!(node = id, x = p.x, y = p.y, "drag started");
        true
    }

    /// Release `id` where it is and let the layout cool down.
    pub fn end_drag(&mut self, id: &str) -> bool {
        let Some(sim) = self.simulation.as_mut() else {
            return false;
        };
        sim.release();
        let released = sim.unpin(id);
        tracing::debug!(node = id, "drag ended");
        released
    }

    pub fn pin(&mut self, id: &str, p: PointF) -> bool {
        self.simulation.as_mut().is_some_and(|sim| sim.pin(id, p))
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        self.simulation.as_mut().is_some_and(|sim| sim.unpin(id))
    }

    /// Stop the live simulation, if any. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if let Some(mut sim) = self.simulation.take() {
            sim.dispose();
        }
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    pub fn simulation_mut(&mut self) -> Option<&mut Simulation> {
        self.simulation.as_mut()
    }

    pub fn position(&self, id: &str) -> Option<PointF> {
        self.simulation.as_ref().and_then(|sim| sim.position(id))
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

impl Drop for LayoutEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_engine() -> LayoutEngine {
        let store = OntologyStore::bundled().unwrap();
        LayoutEngine::new(&store, LayoutConfig::default())
    }

    #[test]
    fn test_no_simulation_before_resize() {
        let mut engine = make_engine();
        assert!(engine.simulation().is_none());
        assert!(!engine.tick());
        assert!(!engine.rebuild());
    }

    #[test]
    fn test_resize_builds_simulation() {
        let mut engine = make_engine();
        assert!(engine.resize(Viewport::new(1000.0, 800.0)));
        let sim = engine.simulation().unwrap();
        assert_eq!(sim.nodes().len(), 45);
        assert_eq!(sim.geometry().radius, 800.0 * 0.34);
        assert!(engine.tick());
    }

    #[test]
    fn test_invalid_viewport_is_a_no_op() {
        let mut engine = make_engine();
        assert!(engine.resize(Viewport::new(800.0, 600.0)));
        assert!(!engine.resize(Viewport::new(0.0, 600.0)));
        assert!(engine.simulation().is_none());
        assert!(!engine.tick());
        assert!(engine.resize(Viewport::new(800.0, 600.0)));
    }

    #[test]
    fn test_resize_restarts_from_initial_placement() {
        let mut engine = make_engine();
        engine.resize(Viewport::new(900.0, 900.0));
        let initial = engine.simulation().unwrap().snapshot();
        for _ in 0..30 {
            engine.tick();
        }
        assert_ne!(engine.simulation().unwrap().snapshot(), initial);
        engine.resize(Viewport::new(900.0, 900.0));
        assert_eq!(engine.simulation().unwrap().snapshot(), initial);
        assert_eq!(engine.simulation().unwrap().ticks(), 0);
    }

    #[test]
    fn test_drag_reheats_and_release_cools() {
        let mut engine = make_engine();
        engine.resize(Viewport::new(900.0, 900.0));
        let p = PointF::new(100.0, 100.0);
        assert!(engine.begin_drag("L2_01_01", p));
        assert_eq!(engine.simulation().unwrap().alpha_target(), 0.3);
        engine.tick();
        assert_eq!(engine.position("L2_01_01"), Some(p));
        assert!(engine.end_drag("L2_01_01"));
        assert_eq!(engine.simulation().unwrap().alpha_target(), 0.0);
        assert!(!engine.simulation().unwrap().is_pinned("L2_01_01"));
    }

    #[test]
    fn test_set_config_rebuilds_for_last_viewport() {
        let mut engine = make_engine();
        assert!(!engine.set_config(LayoutConfig { ring_ratio: 0.3, ..LayoutConfig::default() }));
        assert_eq!(engine.viewport(), None);

        assert!(engine.resize(Viewport::new(1000.0, 1000.0)));
        assert!(engine.set_config(LayoutConfig { ring_ratio: 0.4, ..LayoutConfig::default() }));
        assert_eq!(engine.config().ring_ratio, 0.4);
        assert_eq!(engine.viewport(), Some(Viewport::new(1000.0, 1000.0)));
        assert!((engine.simulation().unwrap().geometry().radius - 400.0).abs() < 1e-9);
        assert_eq!(engine.topology().nodes.len(), 45);
    }

    #[test]
    fn test_drag_unknown_node_is_ignored() {
        let mut engine = make_engine();
        engine.resize(Viewport::new(900.0, 900.0));
        assert!(!engine.begin_drag("L2_99_99", PointF::new(0.0, 0.0)));
        assert_eq!(engine.simulation().unwrap().alpha_target(), 0.0);
    }

    #[test]
    fn test_dispose_drops_simulation() {
        let mut engine = make_engine();
        engine.resize(Viewport::new(900.0, 900.0));
        engine.dispose();
        engine.dispose();
        assert!(engine.simulation().is_none());
        assert!(!engine.is_running());
        assert!(engine.rebuild());
    }
}
