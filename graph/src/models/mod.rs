pub mod entity;
pub mod relationship;

pub use entity::{is_fusable_label, is_known_label, Entity, FUSABLE_LABELS, KNOWN_LABELS};
pub use relationship::Relation;
