use std::collections::HashSet;

use tracing::info;

use super::clusterer::CanonicalMap;
use super::normalizer::normalize_name;
use crate::models::{Entity, Relation};

/// Rewrite entities through the canonical map, deduplicating by
/// `(canonical name, label)`.
///
/// Names whose normalized key is absent from the map pass through unchanged;
/// non-fusable labels take that path by construction.
pub fn resolve_entities(entities: &[Entity], canonical_map: &CanonicalMap) -> Vec<Entity> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut resolved = Vec::new();

    for ent in entities {
        let key = normalize_name(&ent.name);
        let name = canonical_map
            .canonical_for(&key)
            .unwrap_or(&ent.name)
            .to_string();

        if seen.insert((name.clone(), ent.label.clone())) {
            resolved.push(Entity {
                name,
                label: ent.label.clone(),
                start_char: ent.start_char,
                end_char: ent.end_char,
            });
        }
    }

    info!("Resolved {} entities down to {}", entities.len(), resolved.len());
    resolved
}

/// Rewrite relation endpoints through the canonical map, deduplicating by
/// `(head, type, tail)`.
///
/// Head and tail are substituted independently; the map is a partial
/// function and missing keys leave the original string untouched. Endpoint
/// labels are carried through unchanged from the input relation.
pub fn resolve_relations(relations: &[Relation], canonical_map: &CanonicalMap) -> Vec<Relation> {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    let mut resolved = Vec::new();

    for rel in relations {
        let head = canonical_map
            .canonical_for(&normalize_name(&rel.head))
            .unwrap_or(&rel.head)
            .to_string();
        let tail = canonical_map
            .canonical_for(&normalize_name(&rel.tail))
            .unwrap_or(&rel.tail)
            .to_string();

        if seen.insert((head.clone(), rel.rel_type.clone(), tail.clone())) {
            resolved.push(Relation {
                head,
                head_label: rel.head_label.clone(),
                rel_type: rel.rel_type.clone(),
                tail,
                tail_label: rel.tail_label.clone(),
            });
        }
    }

    info!("Resolved {} relations down to {}", relations.len(), resolved.len());
    resolved
}
