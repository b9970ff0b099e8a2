// Read-only ontology store.
//
// All indices are built once in `OntologyStore::new`:
// - `slots`: category id -> (phase index, category index)
// - `relations`: flattened forward list, grouped by source in dataset order
// - `outgoing`: source id -> range into `relations`
// - `incoming`: target id -> indices into `relations`
//
// Queries never rescan the dataset.

use std::collections::HashMap;
use std::ops::Range;

use serde::Serialize;

use super::error::{DatasetError, DatasetResult};
use super::{Category, CompoundRule, Dataset, Phase, RelationKind};

/// A relation flattened with its source id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationRecord {
    pub source: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub phases: usize,
    pub categories: usize,
    pub relations: usize,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    phase: usize,
    category: usize,
}

#[derive(Debug, Clone)]
pub struct OntologyStore {
    dataset: Dataset,
    slots: HashMap<String, Slot>,
    relations: Vec<RelationRecord>,
    outgoing: HashMap<String, Range<usize>>,
    incoming: HashMap<String, Vec<usize>>,
    dangling: Vec<usize>,
}

impl OntologyStore {
    /// Build the store and its indices. Fails on duplicate phase or category ids.
    pub fn new(dataset: Dataset) -> DatasetResult<Self> {
        let mut slots: HashMap<String, Slot> = HashMap::new();
        let mut phase_ids: HashMap<&str, usize> = HashMap::new();

        for (pi, phase) in dataset.phases.iter().enumerate() {
            if phase_ids.insert(phase.id.as_str(), pi).is_some() {
                return Err(DatasetError::DuplicatePhase { id: phase.id.clone() });
            }
            for (ci, cat) in phase.categories.iter().enumerate() {
                let slot = Slot { phase: pi, category: ci };
                if let Some(prev) = slots.insert(cat.id.clone(), slot) {
                    return Err(DatasetError::DuplicateCategory {
                        id: cat.id.clone(),
                        first_phase: dataset.phases[prev.phase].id.clone(),
                        second_phase: phase.id.clone(),
                    });
                }
            }
        }

        let mut relations: Vec<RelationRecord> = Vec::new();
        let mut outgoing: HashMap<String, Range<usize>> = HashMap::new();
        let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();
        let mut dangling: Vec<usize> = Vec::new();

        for cat in dataset.categories() {
            let start = relations.len();
            for rel in &cat.relations {
                let idx = relations.len();
                if !slots.contains_key(&rel.target) {
                    tracing::warn!(
                        source = %cat.id,
                        target = %rel.target,
                        kind = rel.kind.as_str(),
                        "relation target does not resolve to a category"
                    );
                    dangling.push(idx);
                }
                incoming.entry(rel.target.clone()).or_default().push(idx);
                relations.push(RelationRecord {
                    source: cat.id.clone(),
                    kind: rel.kind,
                    target: rel.target.clone(),
                    condition: rel.condition.clone(),
                });
            }
            outgoing.insert(cat.id.clone(), start..relations.len());
        }

        for rule in &dataset.compound_rules {
            for behavior in rule.conditions.behaviors() {
                if !slots.contains_key(behavior) {
                    tracing::warn!(
                        rule = %rule.id,
                        behavior,
                        "compound rule refers to an unknown category"
                    );
                }
            }
        }

        tracing::info!(
            phases = dataset.phases.len(),
            categories = slots.len(),
            relations = relations.len(),
            dangling = dangling.len(),
            rules = dataset.compound_rules.len(),
            "ontology store built"
        );

        Ok(Self { dataset, slots, relations, outgoing, incoming, dangling })
    }

    /// Store over the dataset compiled into the crate.
    pub fn bundled() -> DatasetResult<Self> {
        Self::new(Dataset::bundled()?)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn phases(&self) -> &[Phase] {
        &self.dataset.phases
    }

    /// All categories, phase order then category order.
    pub fn all_categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.dataset.categories()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    pub fn category_by_id(&self, id: &str) -> Option<&Category> {
        let slot = self.slots.get(id)?;
        self.dataset.phases.get(slot.phase)?.categories.get(slot.category)
    }

    pub fn phase_of(&self, category_id: &str) -> Option<&Phase> {
        let slot = self.slots.get(category_id)?;
        self.dataset.phases.get(slot.phase)
    }

    /// Index of the owning phase in phase order.
    pub fn phase_index_of(&self, category_id: &str) -> Option<usize> {
        self.slots.get(category_id).map(|s| s.phase)
    }

    /// Every outgoing edge of every category, including unresolved targets.
    pub fn all_relations(&self) -> &[RelationRecord] {
        &self.relations
    }

    pub fn outgoing_relations(&self, category_id: &str) -> &[RelationRecord] {
        match self.outgoing.get(category_id) {
            Some(range) => &self.relations[range.clone()],
            None => &[],
        }
    }

    /// Relations whose target is `category_id`, in forward-list order.
    pub fn incoming_relations(&self, category_id: &str) -> impl Iterator<Item = &RelationRecord> + '_ {
        self.incoming
            .get(category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&i| &self.relations[i])
    }

    /// Relations whose target has no matching category.
    pub fn dangling_relations(&self) -> impl Iterator<Item = &RelationRecord> + '_ {
        self.dangling.iter().map(|&i| &self.relations[i])
    }

    pub fn compound_rules(&self) -> &[CompoundRule] {
        &self.dataset.compound_rules
    }

    pub fn compound_rule_by_id(&self, id: &str) -> Option<&CompoundRule> {
        self.dataset.compound_rules.iter().find(|r| r.id == id)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            phases: self.dataset.phases.len(),
            categories: self.slots.len(),
            relations: self.relations.len(),
        }
    }
}
