// ============================================================================
// Relation Registry - visual encoding per relation kind
// ============================================================================
//
// Consumed only by the render layer. The store and layout never look at colors.

use serde::Serialize;

use super::{ContentFormat, ContentFunction, RelationKind, SignalKind};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RelationDef {
    pub kind: RelationKind,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    /// SVG dash array, empty for a solid stroke.
    pub dash: &'static str,
}

pub const RELATION_REGISTRY: &[RelationDef] = &[
    RelationDef {
        kind: RelationKind::Precedes,
        id: "precedes",
        name: "선행",
        description: "A가 B보다 시간적으로 먼저 발생",
        color: "#94a3b8",
        dash: "",
    },
    RelationDef {
        kind: RelationKind::Triggers,
        id: "triggers",
        name: "트리거",
        description: "A가 발생하면 B가 유발됨",
        color: "#f97316",
        dash: "6,3",
    },
    RelationDef {
        kind: RelationKind::Enables,
        id: "enables",
        name: "가능조건",
        description: "A가 있어야 B가 가능",
        color: "#22c55e",
        dash: "",
    },
    RelationDef {
        kind: RelationKind::Improves,
        id: "improves",
        name: "강화",
        description: "A가 B의 효과를 높임",
        color: "#3b82f6",
        dash: "8,4",
    },
    RelationDef {
        kind: RelationKind::Inhibits,
        id: "inhibits",
        name: "저해",
        description: "A가 B를 방해함",
        color: "#ef4444",
        dash: "",
    },
];

/// Phase colors by phase order.
pub const PHASE_PALETTE: &[&str] = &[
    "#8b5cf6", // purple
    "#06b6d4", // cyan
    "#10b981", // emerald
    "#f59e0b", // amber
    "#ef4444", // red
    "#ec4899", // pink
    "#6366f1", // indigo
    "#14b8a6", // teal
    "#84cc16", // lime
    "#f97316", // orange
];

/// Every kind has a row, so this never misses.
pub fn relation_def(kind: RelationKind) -> &'static RelationDef {
    RELATION_REGISTRY
        .iter()
        .find(|d| d.kind == kind)
        .unwrap_or(&RELATION_REGISTRY[0])
}

pub fn relation_def_by_id(id: &str) -> Option<&'static RelationDef> {
    RELATION_REGISTRY.iter().find(|d| d.id == id)
}

/// Cycles when a dataset has more phases than palette entries.
pub fn phase_color(phase_index: usize) -> &'static str {
    PHASE_PALETTE[phase_index % PHASE_PALETTE.len()]
}

// ============================================================================
// Label tables - display names for the closed enums
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SignalDef {
    pub kind: SignalKind,
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

/// Display label for a content format or function.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LabelDef<K: 'static> {
    pub kind: K,
    pub id: &'static str,
    pub name: &'static str,
}

pub const SIGNAL_TYPES: &[SignalDef] = &[
    SignalDef { kind: SignalKind::Verbal, id: "verbal", name: "언어적", icon: "💬" },
    SignalDef { kind: SignalKind::Behavioral, id: "behavioral", name: "행동적", icon: "👁" },
    SignalDef { kind: SignalKind::Output, id: "output", name: "산출물", icon: "📊" },
];

pub const CONTENT_FORMATS: &[LabelDef<ContentFormat>] = &[
    LabelDef { kind: ContentFormat::Text, id: "text", name: "텍스트" },
    LabelDef { kind: ContentFormat::Image, id: "image", name: "이미지" },
    LabelDef { kind: ContentFormat::Video, id: "video", name: "영상" },
    LabelDef { kind: ContentFormat::Audio, id: "audio", name: "오디오" },
    LabelDef { kind: ContentFormat::Interactive, id: "interactive", name: "인터랙티브" },
];

pub const CONTENT_FUNCTIONS: &[LabelDef<ContentFunction>] = &[
    LabelDef { kind: ContentFunction::Expository, id: "expository", name: "개념전달" },
    LabelDef { kind: ContentFunction::Exemplary, id: "exemplary", name: "예시제공" },
    LabelDef { kind: ContentFunction::Evaluative, id: "evaluative", name: "평가측정" },
    LabelDef { kind: ContentFunction::Corrective, id: "corrective", name: "교정피드백" },
    LabelDef { kind: ContentFunction::Referential, id: "referential", name: "참조용" },
    LabelDef { kind: ContentFunction::Motivational, id: "motivational", name: "동기부여" },
];

pub fn signal_def(kind: SignalKind) -> Option<&'static SignalDef> {
    SIGNAL_TYPES.iter().find(|d| d.kind == kind)
}

pub fn content_format_def(kind: ContentFormat) -> Option<&'static LabelDef<ContentFormat>> {
    CONTENT_FORMATS.iter().find(|d| d.kind == kind)
}

pub fn content_function_def(kind: ContentFunction) -> Option<&'static LabelDef<ContentFunction>> {
    CONTENT_FUNCTIONS.iter().find(|d| d.kind == kind)
}

impl RelationDef {
    pub fn stroke_width(&self, emphasized: bool) -> f64 {
        let base = if self.kind == RelationKind::Inhibits { 2.5 } else { 1.5 };
        if emphasized { base + 1.0 } else { base }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_definition() {
        for kind in RelationKind::ALL {
            let def = relation_def(kind);
            assert_eq!(def.kind, kind);
            assert_eq!(def.id, kind.as_str());
        }
    }

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(relation_def_by_id("triggers").map(|d| d.dash), Some("6,3"));
        assert!(relation_def_by_id("unknown").is_none());
    }

    #[test]
    fn test_inhibits_is_thicker() {
        assert_eq!(relation_def(RelationKind::Inhibits).stroke_width(false), 2.5);
        assert_eq!(relation_def(RelationKind::Precedes).stroke_width(false), 1.5);
        assert_eq!(relation_def(RelationKind::Precedes).stroke_width(true), 2.5);
    }

    #[test]
    fn test_label_ids_match_serde_names() {
        for def in SIGNAL_TYPES {
            assert_eq!(serde_json::to_value(def.kind).unwrap(), def.id);
            assert_eq!(signal_def(def.kind).map(|d| d.icon), Some(def.icon));
        }
        for def in CONTENT_FORMATS {
            assert_eq!(serde_json::to_value(def.kind).unwrap(), def.id);
        }
        for def in CONTENT_FUNCTIONS {
            assert_eq!(serde_json::to_value(def.kind).unwrap(), def.id);
        }
        assert_eq!(CONTENT_FORMATS.len(), 5);
        assert_eq!(CONTENT_FUNCTIONS.len(), 6);
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(signal_def(SignalKind::Output).map(|d| d.name), Some("산출물"));
        assert_eq!(content_format_def(ContentFormat::Video).map(|d| d.name), Some("영상"));
        assert_eq!(
            content_function_def(ContentFunction::Corrective).map(|d| d.name),
            Some("교정피드백")
        );
    }

    #[test]
    fn test_phase_color_cycles() {
        assert_eq!(phase_color(0), "#8b5cf6");
        assert_eq!(phase_color(PHASE_PALETTE.len()), phase_color(0));
    }
}
