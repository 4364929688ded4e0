use serde::{Deserialize, Serialize};

/// A directed, typed edge between two entity identities.
///
/// Identity is `(head, type, tail)`; the endpoint labels are carried through
/// loading (they select the node labels to match on) but are not part of the
/// deduplication key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Relation {
    pub head: String,
    pub head_label: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub tail: String,
    pub tail_label: String,
}

impl Relation {
    pub fn new(
        head: impl Into<String>,
        head_label: impl Into<String>,
        rel_type: impl Into<String>,
        tail: impl Into<String>,
        tail_label: impl Into<String>,
    ) -> Self {
        Self {
            head: head.into(),
            head_label: head_label.into(),
            rel_type: rel_type.into(),
            tail: tail.into(),
            tail_label: tail_label.into(),
        }
    }

    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.head, &self.rel_type, &self.tail)
    }
}
