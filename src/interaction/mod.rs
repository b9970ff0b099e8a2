// Hover, selection, drag and relation filtering for one diagram.
//
// Submodules:
// - controller: the hover state machine, drag gesture and selection events
// - filter: relation-type visibility

mod controller;
mod filter;

pub use controller::{
    DragGesture, EdgeEmphasis, Highlight, HoverState, InteractionController, NodeEmphasis,
    SelectionChange,
};
pub use filter::RelationFilter;
