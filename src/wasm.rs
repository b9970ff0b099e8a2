//! WASM bindings for the ontograph-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Every call returns JSON (or a plain value); failures are reported through
//! `console.error` and degrade to empty output.

use std::sync::OnceLock;

use wasm_bindgen::prelude::*;

use crate::ontology::OntologyStore;
use crate::view::{self, DiagramView, ViewResult};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

/// Unwrap `result`, logging the error and substituting `fallback`.
fn or_log<T>(result: ViewResult<T>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            console_error(&e.to_string());
            fallback
        }
    }
}

fn json_or(result: ViewResult<String>, fallback: &str) -> String {
    or_log(result, fallback.to_string())
}

/// The bundled store, loaded once for the read-only free functions.
fn shared_store() -> Option<&'static OntologyStore> {
    static STORE: OnceLock<Result<OntologyStore, String>> = OnceLock::new();
    match STORE.get_or_init(|| OntologyStore::bundled().map_err(|e| e.to_string())) {
        Ok(store) => Some(store),
        Err(e) => {
            console_error(&format!("Error loading ontology: {}", e));
            None
        }
    }
}

fn with_store(query: impl FnOnce(&OntologyStore) -> ViewResult<String>, fallback: &str) -> String {
    match shared_store() {
        Some(store) => json_or(query(store), fallback),
        None => fallback.to_string(),
    }
}

// ============================================================================
// Diagram handle
// ============================================================================

/// One mounted radial diagram. Call `dispose` on teardown.
#[wasm_bindgen]
pub struct OntologyView {
    view: DiagramView,
}

#[wasm_bindgen]
impl OntologyView {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Result<OntologyView, JsValue> {
        DiagramView::bundled(width, height).map(|view| OntologyView { view }).map_err(|e| {
            console_error(&e.to_string());
            JsValue::from_str(&e.to_string())
        })
    }

    /// Like `new`, with a (partial) JSON override of the layout config.
    pub fn with_config(width: f64, height: f64, config_json: &str) -> Result<OntologyView, JsValue> {
        DiagramView::bundled_with_config(width, height, config_json)
            .map(|view| OntologyView { view })
            .map_err(|e| {
                console_error(&e.to_string());
                JsValue::from_str(&e.to_string())
            })
    }

    /// Advance one tick. Returns the new frame, or `undefined` once settled.
    pub fn tick(&mut self) -> Option<String> {
        if self.view.tick() {
            Some(self.frame())
        } else {
            None
        }
    }

    /// Current frame without advancing.
    pub fn frame(&self) -> String {
        json_or(self.view.frame_json(), "{}")
    }

    pub fn is_running(&self) -> bool {
        self.view.is_running()
    }

    /// Full rebuild for a new drawing area. An active drag is dropped.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.view.resize(width, height)
    }

    pub fn resize_to_element(&mut self, element: &web_sys::Element) -> bool {
        self.resize(element.client_width() as f64, element.client_height() as f64)
    }

    /// Rebuild with a (partial) JSON override of the layout config.
    pub fn set_config(&mut self, config_json: &str) -> bool {
        or_log(self.view.set_config_json(config_json), false)
    }

    pub fn pointer_enter(&mut self, id: &str) {
        self.view.pointer_enter(id);
    }

    pub fn pointer_leave(&mut self) {
        self.view.pointer_leave();
    }

    pub fn pointer_down(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.view.pointer_down(id, x, y)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.view.pointer_move(x, y)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.view.pointer_up()
    }

    /// Selected category as JSON, or `null` for an unknown id.
    pub fn click(&self, id: &str) -> String {
        json_or(self.view.click_json(id), "null")
    }

    pub fn navigate(&self, id: &str) -> String {
        json_or(self.view.navigate_json(id), "null")
    }

    /// Background click: drop the highlight. Always `null`.
    pub fn clear_selection(&mut self) -> String {
        json_or(self.view.clear_selection_json(), "null")
    }

    /// Mirror the host's selection for highlighting. `undefined` clears it.
    pub fn set_selected(&mut self, id: Option<String>) {
        self.view.set_selected(id.as_deref());
    }

    /// Toggle one relation kind. Returns whether it is now active.
    pub fn toggle_filter(&mut self, kind: &str) -> bool {
        or_log(self.view.toggle_filter(kind), false)
    }

    /// Replace the active filter with a JSON array of relation type ids.
    pub fn set_filter(&mut self, kinds_json: &str) -> bool {
        or_log(self.view.set_filter_json(kinds_json).map(|()| true), false)
    }

    pub fn clear_filter(&mut self) {
        self.view.clear_filter();
    }

    /// Active relation types as a JSON array; empty means all visible.
    pub fn filter(&self) -> String {
        json_or(self.view.filter_json(), "[]")
    }

    /// Stop the tick loop. The view renders nothing until resized again.
    pub fn dispose(&mut self) {
        self.view.dispose();
    }
}

// ============================================================================
// Read-only store queries for the other views
// ============================================================================

#[wasm_bindgen]
pub fn get_phases() -> String {
    with_store(view::phases_json, "[]")
}

/// Category as JSON, or `null` when the id is unknown.
#[wasm_bindgen]
pub fn get_category(id: &str) -> String {
    with_store(|store| view::category_json(store, id), "null")
}

#[wasm_bindgen]
pub fn get_all_relations() -> String {
    with_store(view::all_relations_json, "[]")
}

#[wasm_bindgen]
pub fn get_incoming_relations(id: &str) -> String {
    with_store(|store| view::incoming_relations_json(store, id), "[]")
}

#[wasm_bindgen]
pub fn get_compound_rules() -> String {
    with_store(view::compound_rules_json, "[]")
}

#[wasm_bindgen]
pub fn get_relation_types() -> String {
    json_or(view::relation_types_json(), "[]")
}

#[wasm_bindgen]
pub fn get_signal_types() -> String {
    json_or(view::signal_types_json(), "[]")
}

#[wasm_bindgen]
pub fn get_content_formats() -> String {
    json_or(view::content_formats_json(), "[]")
}

#[wasm_bindgen]
pub fn get_content_functions() -> String {
    json_or(view::content_functions_json(), "[]")
}
