//! Entity alignment: filtering, clustering of near-duplicate surface forms,
//! and rewriting of entities and relations through the canonical mapping.

pub mod clusterer;
pub mod entity_filter;
pub mod normalizer;
pub mod resolver;

pub use clusterer::{create_canonical_map, CanonicalMap};
pub use entity_filter::filter_entities;
pub use normalizer::normalize_name;
pub use resolver::{resolve_entities, resolve_relations};
