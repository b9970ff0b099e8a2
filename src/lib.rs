// Ontograph core: the ontology graph behind the radial behavior map.
//
// - ontology: dataset model, bundled data and the indexed read-only store
// - layout: radial force-directed layout and its tick loop
// - interaction: hover, selection events, drag pinning and relation filters
// - output: render frame composed from the three above
// - view: one mounted diagram and its JSON surface
// - wasm: JavaScript bindings over `view`

pub mod interaction;
pub mod layout;
pub mod ontology;
pub mod output;
pub mod view;
pub mod wasm;

pub use interaction::{InteractionController, RelationFilter, SelectionChange};
pub use layout::{build_layout, LayoutConfig, LayoutEngine, Simulation, Viewport};
pub use ontology::{Category, Dataset, DatasetError, OntologyStore, Phase, RelationKind, RelationRecord};
pub use output::{compose_frame, FrameOutput};
pub use view::{DiagramView, ViewError};
