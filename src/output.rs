//! Output types for the host render surface.
//!
//! A frame is rebuilt from the live simulation on every tick and serialized
//! to JSON for the page to draw. Nothing here mutates layout or interaction
//! state.

use std::f64::consts::PI;

use serde::Serialize;

use crate::interaction::{EdgeEmphasis, InteractionController, NodeEmphasis};
use crate::layout::{sector_bands, PointF, RingGeometry, SectorBand, Simulation};
use crate::ontology::{phase_color, relation_def, OntologyStore, RelationKind};

const NODE_RADIUS: f64 = 14.0;
const NODE_RADIUS_HOVERED: f64 = 18.0;
const NODE_OPACITY_DIMMED: f64 = 0.15;

const STROKE_DEFAULT: &str = "#fff";
const STROKE_SELECTED: &str = "#fbbf24";

const EDGE_OPACITY: f64 = 0.4;
const EDGE_OPACITY_EMPHASIZED: f64 = 0.9;
const EDGE_OPACITY_DIMMED: f64 = 0.05;

/// Link endpoints stop this far from node centers.
const LINK_INSET: f64 = 16.0;
const LINK_CURVATURE: f64 = 0.2;

/// A category node ready to draw
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    pub id: String,
    /// Id without the `L2_` prefix, drawn inside the circle.
    pub label: String,
    pub name: String,
    pub name_en: String,
    pub phase_id: String,
    pub color: &'static str,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub opacity: f64,
    pub stroke: &'static str,
    pub stroke_width: f64,
    pub show_label: bool,
    pub emphasis: NodeEmphasis,
    pub selected: bool,
}

/// A relation between two laid-out nodes
#[derive(Debug, Clone, Serialize)]
pub struct EdgeOutput {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    pub color: &'static str,
    /// Empty for a solid stroke.
    pub dash: &'static str,
    pub width: f64,
    pub opacity: f64,
    pub visible: bool,
    /// SVG path data; empty when the endpoints coincide.
    pub path: String,
    pub emphasis: EdgeEmphasis,
}

/// Background band and label for one phase
#[derive(Debug, Clone, Serialize)]
pub struct SectorOutput {
    pub phase_id: String,
    pub name: String,
    pub color: &'static str,
    /// SVG path data of the annular band.
    pub path: String,
    pub label_x: f64,
    pub label_y: f64,
    pub label_rotation: f64,
}

/// The combined output sent to the host
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameOutput {
    pub nodes: Vec<NodeOutput>,
    pub edges: Vec<EdgeOutput>,
    pub sectors: Vec<SectorOutput>,
}

pub fn compose_frame(
    store: &OntologyStore,
    sim: &Simulation,
    controller: &InteractionController,
) -> FrameOutput {
    let phases = store.phases();
    let hovered = controller.hovered();

    let nodes = sim
        .nodes()
        .iter()
        .enumerate()
        .filter_map(|(i, node)| {
            let cat = store.category_by_id(&node.id)?;
            let p = sim.position_at(i)?;
            let emphasis = controller.node_emphasis(&node.id);
            let is_hovered = hovered == Some(node.id.as_str());
            let selected = controller.is_selected(&node.id);
            Some(NodeOutput {
                id: node.id.clone(),
                label: node.id.strip_prefix("L2_").unwrap_or(&node.id).to_string(),
                name: cat.name.clone(),
                name_en: cat.name_en.clone(),
                phase_id: phases.get(node.phase_index).map(|ph| ph.id.clone()).unwrap_or_default(),
                color: phase_color(node.phase_index),
                x: p.x,
                y: p.y,
                radius: if is_hovered { NODE_RADIUS_HOVERED } else { NODE_RADIUS },
                opacity: if emphasis == NodeEmphasis::Dimmed { NODE_OPACITY_DIMMED } else { 1.0 },
                stroke: if selected { STROKE_SELECTED } else { STROKE_DEFAULT },
                stroke_width: if selected || is_hovered { 3.0 } else { 2.0 },
                show_label: selected || is_hovered,
                emphasis,
                selected,
            })
        })
        .collect();

    let edges = sim
        .edges()
        .iter()
        .filter_map(|edge| {
            let source = sim.node_id(edge.source)?;
            let target = sim.node_id(edge.target)?;
            let sp = sim.position_at(edge.source)?;
            let tp = sim.position_at(edge.target)?;
            let def = relation_def(edge.kind);
            let emphasis = controller.edge_emphasis(source, target);
            Some(EdgeOutput {
                source: source.to_string(),
                target: target.to_string(),
                kind: edge.kind,
                color: def.color,
                dash: def.dash,
                width: def.stroke_width(emphasis == EdgeEmphasis::Emphasized),
                opacity: match emphasis {
                    EdgeEmphasis::Neutral => EDGE_OPACITY,
                    EdgeEmphasis::Emphasized => EDGE_OPACITY_EMPHASIZED,
                    EdgeEmphasis::Dimmed => EDGE_OPACITY_DIMMED,
                },
                visible: controller.is_edge_visible(edge.kind),
                path: link_path(sp, tp),
                emphasis,
            })
        })
        .collect();

    let sectors = sector_bands(sim.phase_count(), sim.geometry())
        .iter()
        .map(|band| {
            let phase = phases.get(band.phase_index);
            SectorOutput {
                phase_id: phase.map(|p| p.id.clone()).unwrap_or_default(),
                name: phase.map(|p| p.name.clone()).unwrap_or_default(),
                color: phase_color(band.phase_index),
                path: sector_path(sim.geometry(), band),
                label_x: band.label.x,
                label_y: band.label.y,
                label_rotation: band.label_rotation,
            }
        })
        .collect();

    FrameOutput { nodes, edges, sectors }
}

/// Quadratic curve from `s` to `t`, inset by the node radius at both ends and
/// bowed to the left of the direction of travel.
pub fn link_path(s: PointF, t: PointF) -> String {
    let dx = t.x - s.x;
    let dy = t.y - s.y;
    let dist = dx.hypot(dy);
    if dist == 0.0 || !dist.is_finite() {
        return String::new();
    }

    let sx = s.x + dx / dist * LINK_INSET;
    let sy = s.y + dy / dist * LINK_INSET;
    let tx = t.x - dx / dist * LINK_INSET;
    let ty = t.y - dy / dist * LINK_INSET;

    let mx = (sx + tx) / 2.0 + dy * LINK_CURVATURE;
    let my = (sy + ty) / 2.0 - dx * LINK_CURVATURE;

    format!("M{:.2},{:.2} Q{:.2},{:.2} {:.2},{:.2}", sx, sy, mx, my, tx, ty)
}

/// Annular band between the band's inner and outer radius over its sector.
fn sector_path(geometry: &RingGeometry, band: &SectorBand) -> String {
    let (a0, a1) = (band.sector.start, band.sector.end);
    let (r0, r1) = (band.inner_radius, band.outer_radius);
    let large = if band.sector.span() > PI { 1 } else { 0 };

    let o0 = geometry.point_at(a0, r1);
    let o1 = geometry.point_at(a1, r1);
    let i1 = geometry.point_at(a1, r0);
    let i0 = geometry.point_at(a0, r0);

    format!(
        "M{:.2},{:.2} A{:.2},{:.2} 0 {} 1 {:.2},{:.2} L{:.2},{:.2} A{:.2},{:.2} 0 {} 0 {:.2},{:.2} Z",
        o0.x, o0.y, r1, r1, large, o1.x, o1.y, i1.x, i1.y, r0, r0, large, i0.x, i0.y
    )
}
