// Pointer interaction over one diagram.
//
// Three independent pieces of state:
// - hover: Idle or Hovering(focus + its one-hop neighborhood)
// - drag: the node currently pinned under the pointer, if any
// - selected: the host-owned selection, mirrored only for highlighting
//
// Click and navigate never touch hover or drag; they produce a selection
// event for the host, which decides what is selected and may pass it back
// through `set_selected`.

use std::collections::HashSet;

use serde::Serialize;

use super::RelationFilter;
use crate::layout::{LayoutEngine, PointF};
use crate::ontology::{Category, OntologyStore, RelationKind};

/// The hovered node and every node one edge away from it, in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub focus: String,
    /// Includes `focus`.
    pub connected: HashSet<String>,
}

impl Highlight {
    fn compute(store: &OntologyStore, focus: &str) -> Self {
        let mut connected: HashSet<String> = HashSet::new();
        connected.insert(focus.to_string());
        for rel in store.outgoing_relations(focus) {
            if store.contains(&rel.target) {
                connected.insert(rel.target.clone());
            }
        }
        for rel in store.incoming_relations(focus) {
            connected.insert(rel.source.clone());
        }
        Self { focus: focus.to_string(), connected }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(Highlight),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeEmphasis {
    Focused,
    Connected,
    Dimmed,
    Neutral,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeEmphasis {
    Emphasized,
    Dimmed,
    Neutral,
}

/// Selection event for the host view.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionChange {
    Selected(Category),
    Cleared,
}

impl SelectionChange {
    pub fn category(&self) -> Option<&Category> {
        match self {
            SelectionChange::Selected(c) => Some(c),
            SelectionChange::Cleared => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub node: String,
    pub last: PointF,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    hover: HoverState,
    drag: Option<DragGesture>,
    selected: Option<String>,
    filter: RelationFilter,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    // ===========================================
    // Hover
    // ===========================================

    /// Enter `id`. Entering another node while hovering is leave-then-enter.
    /// Unknown ids leave hover.
    pub fn pointer_enter(&mut self, store: &OntologyStore, id: &str) {
        if self.hovered() == Some(id) {
            return;
        }
        self.pointer_leave();
        if store.contains(id) {
            self.hover = HoverState::Hovering(Highlight::compute(store, id));
        }
    }

    pub fn pointer_leave(&mut self) {
        self.hover = HoverState::Idle;
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn hovered(&self) -> Option<&str> {
        match &self.hover {
            HoverState::Hovering(h) => Some(h.focus.as_str()),
            HoverState::Idle => None,
        }
    }

    pub fn node_emphasis(&self, id: &str) -> NodeEmphasis {
        match &self.hover {
            HoverState::Idle => NodeEmphasis::Neutral,
            HoverState::Hovering(h) if h.focus == id => NodeEmphasis::Focused,
            HoverState::Hovering(h) if h.connected.contains(id) => NodeEmphasis::Connected,
            HoverState::Hovering(_) => NodeEmphasis::Dimmed,
        }
    }

    /// Edges touching the hovered node are emphasized, every other edge dimmed.
    pub fn edge_emphasis(&self, source: &str, target: &str) -> EdgeEmphasis {
        match &self.hover {
            HoverState::Idle => EdgeEmphasis::Neutral,
            HoverState::Hovering(h) if h.focus == source || h.focus == target => {
                EdgeEmphasis::Emphasized
            }
            HoverState::Hovering(_) => EdgeEmphasis::Dimmed,
        }
    }

    // ===========================================
    // Selection
    // ===========================================

    /// A click on `id`. Hover and drag are left as they are.
    pub fn click(&self, store: &OntologyStore, id: &str) -> Option<SelectionChange> {
        self.navigate(store, id)
    }

    /// Resolve `id` into a selection event; unknown ids yield nothing.
    pub fn navigate(&self, store: &OntologyStore, id: &str) -> Option<SelectionChange> {
        match store.category_by_id(id) {
            Some(cat) => Some(SelectionChange::Selected(cat.clone())),
            None => {
                tracing::debug!(id, "selection target not found");
                None
            }
        }
    }

    pub fn clear_selection(&self) -> SelectionChange {
        SelectionChange::Cleared
    }

    /// Mirror the host's current selection.
    pub fn set_selected(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    // ===========================================
    // Drag
    // ===========================================

    /// Start dragging `id` at `p`. Ignored for unknown nodes or while
    /// another drag is active.
    pub fn pointer_down(&mut self, engine: &mut LayoutEngine, id: &str, p: PointF) -> bool {
        if self.drag.is_some() || !engine.begin_drag(id, p) {
            return false;
        }
        self.drag = Some(DragGesture { node: id.to_string(), last: p });
        true
    }

    /// Move the pin of the active drag to `p`. A refused point (non-finite,
    /// or no live layout) leaves the gesture at its last accepted position.
    pub fn pointer_move(&mut self, engine: &mut LayoutEngine, p: PointF) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        if !engine.pin(&drag.node, p) {
            return false;
        }
        drag.last = p;
        true
    }

    /// End the active drag; the node stays at its last position.
    pub fn pointer_up(&mut self, engine: &mut LayoutEngine) -> bool {
        match self.drag.take() {
            Some(drag) => {
                engine.end_drag(&drag.node);
                true
            }
            None => false,
        }
    }

    /// Forget the active drag without touching the layout. Used when the
    /// simulation it pinned into has been torn down.
    pub fn cancel_drag(&mut self) -> Option<DragGesture> {
        let drag = self.drag.take();
        if let Some(d) = &drag {
            tracing::debug!(node = %d.node, "drag cancelled");
        }
        drag
    }

    /// Drop hover and drag state. Selection and filter are kept.
    pub fn reset_pointer(&mut self) {
        self.cancel_drag();
        self.pointer_leave();
    }

    pub fn dragging(&self) -> Option<&DragGesture> {
        self.drag.as_ref()
    }

    // ===========================================
    // Filter
    // ===========================================

    pub fn filter(&self) -> &RelationFilter {
        &self.filter
    }

    pub fn toggle_filter(&mut self, kind: RelationKind) -> bool {
        self.filter.toggle(kind)
    }

    pub fn set_filter(&mut self, kinds: impl IntoIterator<Item = RelationKind>) {
        self.filter.set(kinds);
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    pub fn is_edge_visible(&self, kind: RelationKind) -> bool {
        self.filter.is_visible(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutConfig, Viewport};
    use crate::ontology::Dataset;

    const ABC: &str = r#"{"phases": [
        {"id": "P1", "name": "one", "categories": [
            {"id": "A", "name": "a", "relations": [{"type": "triggers", "target": "B"}]},
            {"id": "B", "name": "b"}
        ]},
        {"id": "P2", "name": "two", "categories": [
            {"id": "C", "name": "c"},
            {"id": "D", "name": "d", "relations": [{"type": "enables", "target": "B"}]}
        ]}
    ]}"#;

    fn make_store() -> OntologyStore {
        OntologyStore::new(Dataset::from_json(ABC).unwrap()).unwrap()
    }

    #[test]
    fn test_hover_emphasizes_neighbors() {
        let store = make_store();
        let mut ctl = InteractionController::new();
        ctl.pointer_enter(&store, "A");

        assert_eq!(ctl.node_emphasis("A"), NodeEmphasis::Focused);
        assert_eq!(ctl.node_emphasis("B"), NodeEmphasis::Connected);
        assert_eq!(ctl.node_emphasis("C"), NodeEmphasis::Dimmed);
        assert_eq!(ctl.edge_emphasis("A", "B"), EdgeEmphasis::Emphasized);
        assert_eq!(ctl.edge_emphasis("D", "B"), EdgeEmphasis::Dimmed);

        ctl.pointer_leave();
        assert_eq!(ctl.hover(), &HoverState::Idle);
        assert_eq!(ctl.node_emphasis("B"), NodeEmphasis::Neutral);
        assert_eq!(ctl.node_emphasis("C"), NodeEmphasis::Neutral);
        assert_eq!(ctl.edge_emphasis("A", "B"), EdgeEmphasis::Neutral);
    }

    #[test]
    fn test_hover_includes_incoming() {
        let store = make_store();
        let mut ctl = InteractionController::new();
        ctl.pointer_enter(&store, "B");
        assert_eq!(ctl.node_emphasis("A"), NodeEmphasis::Connected);
        assert_eq!(ctl.node_emphasis("D"), NodeEmphasis::Connected);
        assert_eq!(ctl.node_emphasis("C"), NodeEmphasis::Dimmed);
    }

    #[test]
    fn test_hover_switch_recomputes() {
        let store = make_store();
        let mut ctl = InteractionController::new();
        ctl.pointer_enter(&store, "A");
        ctl.pointer_enter(&store, "C");
        assert_eq!(ctl.hovered(), Some("C"));
        assert_eq!(ctl.node_emphasis("A"), NodeEmphasis::Dimmed);
        assert_eq!(ctl.node_emphasis("B"), NodeEmphasis::Dimmed);
    }

    #[test]
    fn test_hover_unknown_node_goes_idle() {
        let store = make_store();
        let mut ctl = InteractionController::new();
        ctl.pointer_enter(&store, "A");
        ctl.pointer_enter(&store, "nope");
        assert_eq!(ctl.hover(), &HoverState::Idle);
    }

    #[test]
    fn test_click_does_not_change_hover() {
        let store = make_store();
        let mut ctl = InteractionController::new();
        ctl.pointer_enter(&store, "A");
        let change = ctl.click(&store, "C").unwrap();
        assert_eq!(change.category().map(|c| c.id.as_str()), Some("C"));
        assert_eq!(ctl.hovered(), Some("A"));
        assert!(ctl.click(&store, "nope").is_none());
        assert_eq!(ctl.clear_selection(), SelectionChange::Cleared);
    }

    #[test]
    fn test_selected_mirror() {
        let mut ctl = InteractionController::new();
        ctl.set_selected(Some("A"));
        assert!(ctl.is_selected("A"));
        assert!(!ctl.is_selected("B"));
        ctl.set_selected(None);
        assert_eq!(ctl.selected(), None);
    }

    #[test]
    fn test_drag_lifecycle() {
        let store = make_store();
        let mut engine = LayoutEngine::new(&store, LayoutConfig::default());
        engine.resize(Viewport::new(600.0, 600.0));
        let mut ctl = InteractionController::new();

        assert!(!ctl.pointer_move(&mut engine, PointF::new(1.0, 1.0)));
        assert!(!ctl.pointer_up(&mut engine));

        assert!(ctl.pointer_down(&mut engine, "A", PointF::new(50.0, 60.0)));
        assert!(!ctl.pointer_down(&mut engine, "B", PointF::new(0.0, 0.0)));
        assert_eq!(engine.position("A"), Some(PointF::new(50.0, 60.0)));

        assert!(ctl.pointer_move(&mut engine, PointF::new(70.0, 80.0)));
        assert_eq!(engine.position("A"), Some(PointF::new(70.0, 80.0)));

        assert!(ctl.pointer_up(&mut engine));
        assert!(ctl.dragging().is_none());
        assert_eq!(engine.position("A"), Some(PointF::new(70.0, 80.0)));
        assert!(!engine.simulation().unwrap().is_pinned("A"));
    }

    #[test]
    fn test_drag_unknown_node_is_ignored() {
        let store = make_store();
        let mut engine = LayoutEngine::new(&store, LayoutConfig::default());
        engine.resize(Viewport::new(600.0, 600.0));
        let mut ctl = InteractionController::new();
        assert!(!ctl.pointer_down(&mut engine, "nope", PointF::new(0.0, 0.0)));
        assert!(ctl.dragging().is_none());
    }

    #[test]
    fn test_hover_skips_unresolved_targets() {
        let store = OntologyStore::new(
            Dataset::from_json(
                r#"{"phases": [{"id": "P1", "name": "one", "categories": [
                    {"id": "A", "name": "a", "relations": [
                        {"type": "triggers", "target": "B"},
                        {"type": "enables", "target": "GHOST"}
                    ]},
                    {"id": "B", "name": "b"}
                ]}]}"#,
            )
            .unwrap(),
        )
        .unwrap();
        let mut ctl = InteractionController::new();
        ctl.pointer_enter(&store, "A");
        let HoverState::Hovering(h) = ctl.hover() else {
            panic!("expected hover");
        };
        let mut connected: Vec<&str> = h.connected.iter().map(String::as_str).collect();
        connected.sort();
        assert_eq!(connected, vec!["A", "B"]);
    }

    #[test]
    fn test_non_finite_move_keeps_last_point() {
        let store = make_store();
        let mut engine = LayoutEngine::new(&store, LayoutConfig::default());
        engine.resize(Viewport::new(600.0, 600.0));
        let mut ctl = InteractionController::new();

        let start = PointF::new(40.0, 40.0);
        assert!(ctl.pointer_down(&mut engine, "A", start));
        assert!(!ctl.pointer_move(&mut engine, PointF::new(f64::NAN, f64::NAN)));
        assert_eq!(ctl.dragging().map(|d| d.last), Some(start));

        engine.tick();
        let sim = engine.simulation().unwrap();
        assert!(sim.snapshot().iter().all(|n| n.x.is_finite() && n.y.is_finite()));
        assert_eq!(engine.position("A"), Some(start));
    }

    #[test]
    fn test_cancel_drag_allows_new_gesture_after_rebuild() {
        let store = make_store();
        let mut engine = LayoutEngine::new(&store, LayoutConfig::default());
        engine.resize(Viewport::new(600.0, 600.0));
        let mut ctl = InteractionController::new();
        ctl.pointer_enter(&store, "A");

        assert!(ctl.pointer_down(&mut engine, "A", PointF::new(10.0, 10.0)));
        ctl.reset_pointer();
        engine.resize(Viewport::new(500.0, 500.0));

        assert!(ctl.dragging().is_none());
        assert_eq!(ctl.hover(), &HoverState::Idle);
        assert!(ctl.cancel_drag().is_none());
        assert!(!engine.simulation().unwrap().is_pinned("A"));
        assert!(ctl.pointer_down(&mut engine, "B", PointF::new(20.0, 20.0)));
        assert_eq!(ctl.dragging().map(|d| d.node.as_str()), Some("B"));
    }

    #[test]
    fn test_filter_is_edge_visibility_only() {
        let mut ctl = InteractionController::new();
        assert!(ctl.is_edge_visible(RelationKind::Enables));
        ctl.toggle_filter(RelationKind::Triggers);
        assert!(!ctl.is_edge_visible(RelationKind::Enables));
        assert!(ctl.is_edge_visible(RelationKind::Triggers));
        ctl.clear_filter();
        assert!(ctl.filter().is_all());
    }
}
