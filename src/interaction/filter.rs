// Relation-type visibility filter.
//
// An empty active set means every kind is visible. The filter only decides
// edge visibility at render time; it never reaches the layout.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::ontology::RelationKind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RelationFilter {
    active: BTreeSet<RelationKind>,
}

impl RelationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `kind` if absent, remove it if present. Returns whether it is now active.
    pub fn toggle(&mut self, kind: RelationKind) -> bool {
        if self.active.remove(&kind) {
            false
        } else {
            self.active.insert(kind);
            true
        }
    }

    pub fn set(&mut self, kinds: impl IntoIterator<Item = RelationKind>) {
        self.active = kinds.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn is_all(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_visible(&self, kind: RelationKind) -> bool {
        self.is_all() || self.active.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_shows_everything() {
        let filter = RelationFilter::new();
        assert!(filter.is_all());
        assert!(RelationKind::ALL.iter().all(|&k| filter.is_visible(k)));
    }

    #[test]
    fn test_toggle() {
        let mut filter = RelationFilter::new();
        assert!(filter.toggle(RelationKind::Inhibits));
        assert!(filter.is_visible(RelationKind::Inhibits));
        assert!(!filter.is_visible(RelationKind::Precedes));

        assert!(!filter.toggle(RelationKind::Inhibits));
        assert!(filter.is_all());
        assert!(filter.is_visible(RelationKind::Precedes));
    }

    #[test]
    fn test_set_and_clear() {
        let mut filter = RelationFilter::new();
        filter.set([RelationKind::Triggers, RelationKind::Enables, RelationKind::Triggers]);
        assert_eq!(serde_json::to_string(&filter).unwrap(), r#"["triggers","enables"]"#);
        filter.clear();
        assert!(filter.is_all());
    }

    #[test]
    fn test_serializes_as_list() {
        let mut filter = RelationFilter::new();
        filter.set([RelationKind::Improves]);
        assert_eq!(serde_json::to_string(&filter).unwrap(), r#"["improves"]"#);
    }
}
