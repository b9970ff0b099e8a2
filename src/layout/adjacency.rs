// Edge set for the force model.
//
// Relations are resolved against the node index once, when a simulation is
// built. Anything whose source or target is not a node (dangling targets,
// nodes filtered out of the diagram) is dropped here and never reaches the
// forces. The retained set is fixed for the lifetime of the simulation;
// visibility filters act on rendering only.

use std::collections::HashMap;

use serde::Serialize;

use crate::ontology::{RelationKind, RelationRecord};

/// A retained edge, endpoints as node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutEdge {
    pub source: usize,
    pub target: usize,
    pub kind: RelationKind,
}

/// Adjacency information for layout.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    /// Retained edges, in relation order.
    pub edges: Vec<LayoutEdge>,

    /// Edge count per node index, both directions. Drives link bias.
    pub degree: Vec<usize>,

    /// Relations dropped because an endpoint is not a node.
    pub dropped: usize,
}

impl Adjacency {
    /// Resolve `relations` against `index` (node id -> node index).
    pub fn from_relations(index: &HashMap<String, usize>, relations: &[RelationRecord]) -> Self {
        let mut edges = Vec::with_capacity(relations.len());
        let mut degree = vec![0; index.len()];
        let mut dropped = 0;

        for rel in relations {
            match (index.get(&rel.source), index.get(&rel.target)) {
                (Some(&s), Some(&t)) => {
                    edges.push(LayoutEdge { source: s, target: t, kind: rel.kind });
                    degree[s] += 1;
                    degree[t] += 1;
                }
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::debug!(dropped, retained = edges.len(), "unresolved relations left out of layout");
        }

        Self { edges, degree, dropped }
    }

    /// Get total degree (edge count) for a node.
    pub fn get_degree(&self, node: usize) -> usize {
        self.degree.get(node).copied().unwrap_or(0)
    }
}
