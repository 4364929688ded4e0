use serde::{Deserialize, Serialize};

/// Entity categories the pipeline accepts. Labels are burned structurally
/// into Cypher statements, so anything outside this set is rejected before
/// query construction.
pub const KNOWN_LABELS: &[&str] = &[
    "Concept",
    "Algorithm",
    "Technology",
    "Application",
    "Chapter",
    "DataSource",
    "Metric",
    "Scholar",
    "Person",
    "Organization",
    "Location",
];

/// Labels eligible for near-duplicate clustering. Open NLP categories such
/// as Person or Location never participate; they pass through resolution
/// untouched and are only deduplicated by identity.
pub const FUSABLE_LABELS: &[&str] = &[
    "Concept",
    "Algorithm",
    "Technology",
    "Application",
    "Metric",
    "Scholar",
];

pub fn is_known_label(label: &str) -> bool {
    KNOWN_LABELS.contains(&label)
}

pub fn is_fusable_label(label: &str) -> bool {
    FUSABLE_LABELS.contains(&label)
}

/// An entity surface form as produced by the extraction stage.
///
/// Identity is `(name, label)`; after resolution the name is the canonical
/// spelling of its cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Entity {
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_char: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_char: Option<usize>,
}

impl Entity {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            start_char: None,
            end_char: None,
        }
    }

    pub fn identity(&self) -> (&str, &str) {
        (&self.name, &self.label)
    }
}
