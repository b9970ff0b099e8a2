//! Ontology data model and the read-only store built over it.
//!
//! The dataset is a fixed list of phases, each owning an ordered list of
//! categories; categories carry typed outgoing relations. Nothing in this
//! module mutates the model after it is loaded.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

mod dataset;
mod error;
mod registry;
mod store;

pub use dataset::Dataset;
pub use error::DatasetError;
pub use registry::{
    content_format_def, content_function_def, phase_color, relation_def, relation_def_by_id,
    signal_def, LabelDef, RelationDef, SignalDef, CONTENT_FORMATS, CONTENT_FUNCTIONS,
    PHASE_PALETTE, RELATION_REGISTRY, SIGNAL_TYPES,
};
pub use store::{OntologyStore, RelationRecord, StoreStats};

/// Relation kinds. Closed set; unknown ids fail to deserialize.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Precedes,
    Triggers,
    Enables,
    Improves,
    Inhibits,
}

impl RelationKind {
    pub const ALL: [RelationKind; 5] = [
        RelationKind::Precedes,
        RelationKind::Triggers,
        RelationKind::Enables,
        RelationKind::Improves,
        RelationKind::Inhibits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Precedes => "precedes",
            RelationKind::Triggers => "triggers",
            RelationKind::Enables => "enables",
            RelationKind::Improves => "improves",
            RelationKind::Inhibits => "inhibits",
        }
    }

    pub fn from_id(id: &str) -> Option<RelationKind> {
        Self::ALL.iter().copied().find(|k| k.as_str() == id)
    }
}

/// How a state signal is observed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Verbal,
    Behavioral,
    /// An output artifact (worksheet, list, schedule...).
    Output,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Text,
    Image,
    Video,
    Audio,
    Interactive,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFunction {
    Expository,
    Exemplary,
    Evaluative,
    Corrective,
    Referential,
    Motivational,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub indicator: String,
}

/// An outgoing edge as written on its source category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "type")]
    pub kind: RelationKind,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentIo {
    pub format: Vec<ContentFormat>,
    /// Written either as a single id or a list in the source data.
    #[serde(deserialize_with = "one_or_many")]
    pub function: Vec<ContentFunction>,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub consumes: Option<Vec<ContentIo>>,
    #[serde(default)]
    pub produces: Option<Vec<ContentIo>>,
}

/// A single behavior node of the ontology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub state_signals: BTreeMap<String, Vec<Signal>>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub content: Content,
}

/// Top-level group. Category order is significant: it drives angular placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description: String,
    pub categories: Vec<Category>,
}

/// How the children of a condition group combine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionOp {
    And,
    Or,
    /// All children, in order.
    Sequence,
}

/// A single observation: a category in some state, with free-form detail.
/// Any part may be missing (e.g. a pure duration check).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionLeaf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Condition tree of a compound rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Group {
        #[serde(rename = "type")]
        op: ConditionOp,
        children: Vec<Condition>,
    },
    Leaf(ConditionLeaf),
}

impl Condition {
    /// Every `behavior` id in the tree, depth first.
    pub fn behaviors(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_behaviors(&mut out);
        out
    }

    fn collect_behaviors<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::Group { children, .. } => {
                for child in children {
                    child.collect_behaviors(out);
                }
            }
            Condition::Leaf(leaf) => {
                if let Some(b) = &leaf.behavior {
                    out.push(b);
                }
            }
        }
    }
}

/// A judgment combining several category observations, with follow-up actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRule {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub conditions: Condition,
    /// Category ids, or a free-form strategy keyword such as
    /// `maintain_current_strategy`.
    #[serde(default)]
    pub recommended_action: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<ContentFunction>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ContentFunction),
        Many(Vec<ContentFunction>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(f) => vec![f],
        OneOrMany::Many(fs) => fs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_tree_nests_groups_and_leaves() {
        let c: Condition = serde_json::from_str(
            r#"{"type": "OR", "children": [
                {"behavior": "A", "state": "low", "detail": "consecutive: 3"},
                {"type": "AND", "children": [{"behavior": "B"}, {"detail": "duration: 10m"}]}
            ]}"#,
        )
        .unwrap();
        let Condition::Group { op, children } = &c else {
            panic!("expected a group");
        };
        assert_eq!(*op, ConditionOp::Or);
        assert_eq!(children.len(), 2);
        assert_eq!(c.behaviors(), vec!["A", "B"]);
    }

    #[test]
    fn test_compound_rule_optional_fields() {
        let rule: CompoundRule = serde_json::from_str(
            r#"{"id": "r", "name": "rule", "conditions": {"type": "SEQUENCE", "children": []}}"#,
        )
        .unwrap();
        assert!(rule.recommended_action.is_empty());
        assert!(rule.confidence.is_none());
        assert!(matches!(rule.conditions, Condition::Group { op: ConditionOp::Sequence, .. }));
    }

    #[test]
    fn test_relation_kind_ids_round_trip() {
        for kind in RelationKind::ALL {
            assert_eq!(RelationKind::from_id(kind.as_str()), Some(kind));
        }
        assert_eq!(RelationKind::from_id("blocks"), None);
    }

    #[test]
    fn test_content_function_accepts_single_value() {
        let io: ContentIo =
            serde_json::from_str(r#"{"format": ["text"], "function": "referential"}"#).unwrap();
        assert_eq!(io.function, vec![ContentFunction::Referential]);
        assert!(io.examples.is_empty());
    }

    #[test]
    fn test_content_function_accepts_list() {
        let io: ContentIo = serde_json::from_str(
            r#"{"format": ["video", "text"], "function": ["expository", "exemplary"]}"#,
        )
        .unwrap();
        assert_eq!(io.format, vec![ContentFormat::Video, ContentFormat::Text]);
        assert_eq!(io.function.len(), 2);
    }

    #[test]
    fn test_signal_uses_type_key() {
        let s: Signal =
            serde_json::from_str(r#"{"type": "output", "indicator": "checklist exists"}"#).unwrap();
        assert_eq!(s.kind, SignalKind::Output);
    }

    #[test]
    fn test_unknown_relation_type_is_rejected() {
        let r = serde_json::from_str::<Relation>(r#"{"type": "blocks", "target": "X"}"#);
        assert!(r.is_err());
    }
}
