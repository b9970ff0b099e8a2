// One mounted diagram and the JSON it exchanges with the host.
//
// `DiagramView` owns the store, the layout engine and the pointer state, and
// keeps them consistent across teardown: anything that rebuilds or disposes
// the simulation first drops the hover and drag state that pointed into it.
// The wasm layer only forwards calls and logs errors.

use serde::Serialize;
use thiserror::Error;

use crate::interaction::{InteractionController, SelectionChange};
use crate::layout::{LayoutConfig, LayoutEngine, PointF, Viewport};
use crate::ontology::{
    relation_def_by_id, DatasetError, OntologyStore, RelationKind, CONTENT_FORMATS,
    CONTENT_FUNCTIONS, RELATION_REGISTRY, SIGNAL_TYPES,
};
use crate::output::{compose_frame, FrameOutput};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("error loading ontology: {0}")]
    Dataset(#[from] DatasetError),

    #[error("error parsing layout config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("error parsing filter: {0}")]
    Filter(#[source] serde_json::Error),

    #[error("unknown relation type '{0}'")]
    UnknownRelationType(String),

    #[error("error serializing output: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type ViewResult<T> = Result<T, ViewError>;

fn to_json<T: Serialize + ?Sized>(value: &T) -> ViewResult<String> {
    serde_json::to_string(value).map_err(ViewError::Serialize)
}

/// `null` when there is no category to report.
fn selection_json(change: Option<SelectionChange>) -> ViewResult<String> {
    to_json(&change.as_ref().and_then(SelectionChange::category))
}

pub struct DiagramView {
    store: OntologyStore,
    engine: LayoutEngine,
    controller: InteractionController,
}

impl DiagramView {
    /// Lay out `store` for `viewport`. An unusable viewport leaves the view
    /// empty until the next `resize`.
    pub fn new(store: OntologyStore, config: LayoutConfig, viewport: Viewport) -> Self {
        let mut engine = LayoutEngine::new(&store, config);
        engine.resize(viewport);
        Self { store, engine, controller: InteractionController::new() }
    }

    /// View over the bundled ontology.
    pub fn bundled(width: f64, height: f64) -> ViewResult<Self> {
        let store = OntologyStore::bundled()?;
        Ok(Self::new(store, LayoutConfig::default(), Viewport::new(width, height)))
    }

    /// Like `bundled`, with a partial JSON override of the layout config.
    pub fn bundled_with_config(width: f64, height: f64, config_json: &str) -> ViewResult<Self> {
        let config: LayoutConfig = serde_json::from_str(config_json).map_err(ViewError::Config)?;
        let store = OntologyStore::bundled()?;
        Ok(Self::new(store, config, Viewport::new(width, height)))
    }

    pub fn store(&self) -> &OntologyStore {
        &self.store
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    // ===========================================
    // Frames
    // ===========================================

    pub fn tick(&mut self) -> bool {
        self.engine.tick()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Current frame; empty while there is no live layout.
    pub fn frame(&self) -> FrameOutput {
        match self.engine.simulation() {
            Some(sim) => compose_frame(&self.store, sim, &self.controller),
            None => FrameOutput::default(),
        }
    }

    pub fn frame_json(&self) -> ViewResult<String> {
        to_json(&self.frame())
    }

    // ===========================================
    // Lifecycle
    // ===========================================

    /// Full rebuild for a new drawing area.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.controller.reset_pointer();
        self.engine.resize(Viewport::new(width, height))
    }

    /// Replace the layout config with a partial JSON override and rebuild.
    /// A config that fails to parse leaves the current layout running.
    pub fn set_config_json(&mut self, config_json: &str) -> ViewResult<bool> {
        let config: LayoutConfig = serde_json::from_str(config_json).map_err(ViewError::Config)?;
        self.controller.reset_pointer();
        Ok(self.engine.set_config(config))
    }

    /// Stop the tick loop. The view renders nothing until resized again.
    pub fn dispose(&mut self) {
        self.controller.reset_pointer();
        self.engine.dispose();
    }

    // ===========================================
    // Pointer
    // ===========================================

    pub fn pointer_enter(&mut self, id: &str) {
        self.controller.pointer_enter(&self.store, id);
    }

    pub fn pointer_leave(&mut self) {
        self.controller.pointer_leave();
    }

    pub fn pointer_down(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.controller.pointer_down(&mut self.engine, id, PointF::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.controller.pointer_move(&mut self.engine, PointF::new(x, y))
    }

    pub fn pointer_up(&mut self) -> bool {
        self.controller.pointer_up(&mut self.engine)
    }

    // ===========================================
    // Selection
    // ===========================================

    /// Selected category as JSON, or `null` for an unknown id.
    pub fn click_json(&self, id: &str) -> ViewResult<String> {
        selection_json(self.controller.click(&self.store, id))
    }

    pub fn navigate_json(&self, id: &str) -> ViewResult<String> {
        selection_json(self.controller.navigate(&self.store, id))
    }

    /// Drop the mirrored selection. Always `null`.
    pub fn clear_selection_json(&mut self) -> ViewResult<String> {
        self.controller.set_selected(None);
        selection_json(Some(self.controller.clear_selection()))
    }

    pub fn set_selected(&mut self, id: Option<&str>) {
        self.controller.set_selected(id);
    }

    // ===========================================
    // Filter
    // ===========================================

    /// Toggle one relation kind by id. Returns whether it is now active.
    pub fn toggle_filter(&mut self, id: &str) -> ViewResult<bool> {
        let def =
            relation_def_by_id(id).ok_or_else(|| ViewError::UnknownRelationType(id.to_string()))?;
        Ok(self.controller.toggle_filter(def.kind))
    }

    /// Replace the active filter with a JSON array of relation type ids.
    pub fn set_filter_json(&mut self, kinds_json: &str) -> ViewResult<()> {
        let kinds: Vec<RelationKind> =
            serde_json::from_str(kinds_json).map_err(ViewError::Filter)?;
        self.controller.set_filter(kinds);
        Ok(())
    }

    pub fn clear_filter(&mut self) {
        self.controller.clear_filter();
    }

    /// Active relation types; empty means all visible.
    pub fn filter_json(&self) -> ViewResult<String> {
        to_json(self.controller.filter())
    }
}

// ============================================================================
// Read-only store queries
// ============================================================================

pub fn phases_json(store: &OntologyStore) -> ViewResult<String> {
    to_json(store.phases())
}

/// Category as JSON, or `null` when the id is unknown.
pub fn category_json(store: &OntologyStore, id: &str) -> ViewResult<String> {
    to_json(&store.category_by_id(id))
}

pub fn all_relations_json(store: &OntologyStore) -> ViewResult<String> {
    to_json(store.all_relations())
}

pub fn incoming_relations_json(store: &OntologyStore, id: &str) -> ViewResult<String> {
    to_json(&store.incoming_relations(id).collect::<Vec<_>>())
}

pub fn compound_rules_json(store: &OntologyStore) -> ViewResult<String> {
    to_json(store.compound_rules())
}

pub fn relation_types_json() -> ViewResult<String> {
    to_json(RELATION_REGISTRY)
}

pub fn signal_types_json() -> ViewResult<String> {
    to_json(SIGNAL_TYPES)
}

pub fn content_formats_json() -> ViewResult<String> {
    to_json(CONTENT_FORMATS)
}

pub fn content_functions_json() -> ViewResult<String> {
    to_json(CONTENT_FUNCTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const EMPTY_FRAME: &str = r#"{"nodes":[],"edges":[],"sectors":[]}"#;

    fn make_view() -> DiagramView {
        DiagramView::bundled(900.0, 900.0).unwrap()
    }

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    fn is_pinned(view: &DiagramView, id: &str) -> bool {
        view.engine().simulation().is_some_and(|sim| sim.is_pinned(id))
    }

    #[test]
    fn test_resize_during_drag_drops_gesture() {
        let mut view = make_view();
        view.pointer_enter("L2_01_01");
        assert!(view.pointer_down("L2_01_01", 200.0, 200.0));

        assert!(view.resize(700.0, 700.0));
        assert!(view.controller().dragging().is_none());
        assert!(view.controller().hovered().is_none());
        assert!(!is_pinned(&view, "L2_01_01"));
        assert!(!view.pointer_move(300.0, 300.0));
        assert!(!view.pointer_up());

        assert!(view.pointer_down("L2_02_01", 150.0, 150.0));
        assert!(is_pinned(&view, "L2_02_01"));
        assert!(view.pointer_up());
    }

    #[test]
    fn test_dispose_during_drag_drops_gesture() {
        let mut view = make_view();
        assert!(view.pointer_down("L2_01_01", 200.0, 200.0));

        view.dispose();
        assert!(view.controller().dragging().is_none());
        assert!(!view.is_running());
        assert_eq!(view.frame_json().unwrap(), EMPTY_FRAME);
        assert!(!view.pointer_down("L2_01_01", 200.0, 200.0));

        assert!(view.resize(900.0, 900.0));
        assert!(view.pointer_down("L2_01_01", 200.0, 200.0));
    }

    #[test]
    fn test_set_config_rebuilds_and_drops_gesture() {
        let mut view = make_view();
        assert!(view.pointer_down("L2_03_01", 100.0, 100.0));

        assert!(matches!(view.set_config_json("{\"collision_radius\": "), Err(ViewError::Config(_))));
        assert!(view.controller().dragging().is_some());

        assert!(view.set_config_json("{}").unwrap());
        assert!(view.controller().dragging().is_none());
        assert!(!is_pinned(&view, "L2_03_01"));
        assert!(view.is_running());
    }

    #[test]
    fn test_non_finite_pointer_move_is_refused() {
        let mut view = make_view();
        assert!(view.pointer_down("L2_04_01", 120.0, 80.0));
        assert!(!view.pointer_move(f64::NAN, 10.0));
        view.tick();

        let frame = parse(&view.frame_json().unwrap());
        for node in frame["nodes"].as_array().unwrap() {
            assert!(node["x"].is_f64() && node["y"].is_f64(), "{}", node["id"]);
        }
    }

    #[test]
    fn test_frame_json_shape() {
        let view = make_view();
        let frame = parse(&view.frame_json().unwrap());
        assert_eq!(frame["nodes"].as_array().unwrap().len(), 45);
        assert_eq!(frame["sectors"].as_array().unwrap().len(), 10);
        let edge = &frame["edges"][0];
        assert!(edge["type"].is_string());
        assert_eq!(edge["emphasis"], "neutral");
        assert_eq!(frame["nodes"][0]["id"], "L2_01_01");
    }

    #[test]
    fn test_selection_json() {
        let mut view = make_view();
        assert_eq!(view.click_json("nope").unwrap(), "null");
        assert_eq!(view.navigate_json("L2_99_99").unwrap(), "null");
        assert_eq!(parse(&view.click_json("L2_02_03").unwrap())["id"], "L2_02_03");

        view.set_selected(Some("L2_02_03"));
        assert_eq!(view.clear_selection_json().unwrap(), "null");
        assert_eq!(view.controller().selected(), None);
    }

    #[test]
    fn test_filter_json() {
        let mut view = make_view();
        assert_eq!(view.filter_json().unwrap(), "[]");
        assert!(view.toggle_filter("triggers").unwrap());
        assert_eq!(view.filter_json().unwrap(), r#"["triggers"]"#);

        assert!(matches!(
            view.toggle_filter("blocks"),
            Err(ViewError::UnknownRelationType(id)) if id == "blocks"
        ));
        assert!(matches!(view.set_filter_json("[\"blocks\"]"), Err(ViewError::Filter(_))));
        assert!(matches!(view.set_filter_json("not json"), Err(ViewError::Filter(_))));
        assert_eq!(view.filter_json().unwrap(), r#"["triggers"]"#);

        view.set_filter_json(r#"["inhibits", "enables"]"#).unwrap();
        assert_eq!(view.filter_json().unwrap(), r#"["enables","inhibits"]"#);
        view.clear_filter();
        assert_eq!(view.filter_json().unwrap(), "[]");
    }

    #[test]
    fn test_bundled_with_bad_config() {
        assert!(matches!(
            DiagramView::bundled_with_config(800.0, 600.0, "\"wide\""),
            Err(ViewError::Config(_))
        ));
        let view = DiagramView::bundled_with_config(800.0, 600.0, "{}").unwrap();
        assert!(view.is_running());
    }

    #[test]
    fn test_store_query_json() {
        let store = OntologyStore::bundled().unwrap();

        assert_eq!(parse(&phases_json(&store).unwrap()).as_array().unwrap().len(), 10);
        assert_eq!(category_json(&store, "nope").unwrap(), "null");
        assert_eq!(parse(&category_json(&store, "L2_01_01").unwrap())["id"], "L2_01_01");
        assert_eq!(parse(&all_relations_json(&store).unwrap()).as_array().unwrap().len(), 60);
        assert_eq!(incoming_relations_json(&store, "nope").unwrap(), "[]");

        let rules = parse(&compound_rules_json(&store).unwrap());
        assert_eq!(rules.as_array().unwrap().len(), 7);
        assert!(rules[0]["conditions"]["type"].is_string());

        let relation_types = parse(&relation_types_json().unwrap());
        assert_eq!(relation_types.as_array().unwrap().len(), 5);
        assert_eq!(relation_types[1]["id"], "triggers");

        let signals = parse(&signal_types_json().unwrap());
        assert_eq!(signals[0]["id"], "verbal");
        assert!(signals[0]["icon"].is_string());
        assert_eq!(parse(&content_formats_json().unwrap()).as_array().unwrap().len(), 5);
        assert_eq!(parse(&content_functions_json().unwrap())[5]["id"], "motivational");
    }
}
