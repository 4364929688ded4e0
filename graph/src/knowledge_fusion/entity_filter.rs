use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::Entity;

/// Labels that survive the pre-clustering quality gate. Overlaps with, but
/// is not identical to, the fusable set used by the clusterer.
pub const ALLOWED_LABELS: &[&str] = &[
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
];

/// Surface forms that are grammar, not course terminology.
const STOP_WORDS: &[&str] = &[
    "的", "是", "和", "与", "或", "在", "中", "了", "等", "这", "那", "其", "各",
    "the", "a", "an", "of", "to", "in", "for", "with", "on", "and", "or", "is", "are",
];

lazy_static! {
    static ref VALID_NAME: Regex =
        Regex::new(r"^[\p{Han}A-Za-z0-9_-]+$").expect("valid entity name pattern");
    static ref STOP_WORD_SET: HashSet<&'static str> = STOP_WORDS.iter().copied().collect();
}

/// Quality gate applied before clustering.
///
/// An entity is kept only if, in order: its trimmed name is at least
/// `min_len` characters, it is not a stop word, its exact raw surface form
/// occurs at least `min_freq` times in the batch, it contains only CJK
/// ideographs, ASCII alphanumerics, `_` or `-`, and its label is in the
/// allowlist. Frequency is counted on raw names before any clustering.
///
/// Input order is preserved and nothing is deduplicated here; that is the
/// resolver's job.
pub fn filter_entities(entities: &[Entity], min_len: usize, min_freq: usize) -> Vec<Entity> {
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for ent in entities {
        *frequency.entry(ent.name.as_str()).or_insert(0) += 1;
    }

    let kept: Vec<Entity> = entities
        .iter()
        .filter(|ent| {
            let trimmed = ent.name.trim();
            trimmed.chars().count() >= min_len
                && !STOP_WORD_SET.contains(trimmed)
                && frequency[ent.name.as_str()] >= min_freq
                && VALID_NAME.is_match(&ent.name)
                && ALLOWED_LABELS.contains(&ent.label.as_str())
        })
        .cloned()
        .collect();

    debug!("Entity filter kept {}/{} entities", kept.len(), entities.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names_and_stop_words_dropped() {
        let entities = vec![
            Entity::new("X", "Concept"),
            Entity::new("的", "Concept"),
            Entity::new("the", "Concept"),
            Entity::new("RDF", "Concept"),
        ];
        let kept = filter_entities(&entities, 2, 1);
        assert_eq!(kept, vec![Entity::new("RDF", "Concept")]);
    }

    #[test]
    fn test_frequency_counts_raw_surface_forms() {
        let entities = vec![
            Entity::new("RDF", "Concept"),
            Entity::new("RDF", "Concept"),
            // Normalizes to the same key as RDF, but frequency is raw.
            Entity::new("R-D-F", "Concept"),
        ];
        let kept = filter_entities(&entities, 2, 2);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.name == "RDF"));
    }

    #[test]
    fn test_character_class_gate() {
        let entities = vec![
            Entity::new("知识图谱", "Concept"),
            Entity::new("BERT-base", "Algorithm"),
            Entity::new("a b", "Concept"),
            Entity::new("f(x)", "Concept"),
        ];
        let kept = filter_entities(&entities, 2, 1);
        let names: Vec<&str> = kept.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["知识图谱", "BERT-base"]);
    }

    #[test]
    fn test_label_allowlist() {
        let entities = vec![
            Entity::new("Neo4j", "Technology"),
            Entity::new("something", "Unknown"),
        ];
        let kept = filter_entities(&entities, 2, 1);
        assert_eq!(kept, vec![Entity::new("Neo4j", "Technology")]);
    }

    #[test]
    fn test_order_preserved_no_dedup() {
        let entities = vec![
            Entity::new("RDF", "Concept"),
            Entity::new("OWL", "Concept"),
            Entity::new("RDF", "Concept"),
        ];
        let kept = filter_entities(&entities, 2, 1);
        assert_eq!(kept, entities);
    }
}
