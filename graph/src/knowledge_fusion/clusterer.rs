use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::normalizer::normalize_name;
use crate::models::{is_fusable_label, Entity};

/// Mapping from normalized entity key to canonical display name.
///
/// Built once per extraction batch and immutable afterwards. Lookups are
/// scoped by label at the call sites; the map itself stores no labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalMap {
    entries: HashMap<String, String>,
}

impl CanonicalMap {
    pub fn canonical_for(&self, normalized_key: &str) -> Option<&str> {
        self.entries.get(normalized_key).map(String::as_str)
    }

    pub fn contains(&self, normalized_key: &str) -> bool {
        self.entries.contains_key(normalized_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct canonical names across all rules.
    pub fn canonical_count(&self) -> usize {
        self.entries.values().collect::<HashSet<_>>().len()
    }

    fn insert(&mut self, key: String, canonical: String) {
        self.entries.insert(key, canonical);
    }
}

/// Cluster near-duplicate entity names and derive alias -> canonical rules.
///
/// Names are partitioned per fusable label, deduplicated, and visited
/// shortest-first so every cluster adopts the shortest spelling as its
/// canonical form (ties keep first-seen order; the sort is stable).
/// Matching is greedy first-match against the representatives in creation
/// order, not best-match; membership therefore depends on insertion order,
/// which keeps the result deterministic for a given input.
///
/// An out-of-range threshold degrades rather than fails: 0.0 collapses each
/// label group onto its shortest name, 1.0 clusters exact normalized
/// matches only.
pub fn create_canonical_map(entities: &[Entity], similarity_threshold: f64) -> CanonicalMap {
    // Partition fusable names per label, preserving first-seen order.
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for ent in entities {
        if !is_fusable_label(&ent.label) {
            continue;
        }
        match grouped.iter_mut().find(|(label, _)| *label == ent.label) {
            Some((_, names)) => names.push(ent.name.clone()),
            None => grouped.push((ent.label.clone(), vec![ent.name.clone()])),
        }
    }

    let mut map = CanonicalMap::default();

    for (label, names) in grouped {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique_names: Vec<&String> = Vec::new();
        for name in &names {
            if seen.insert(name.as_str()) {
                unique_names.push(name);
            }
        }
        // Shortest first biases canonical forms toward the most generic spelling.
        unique_names.sort_by_key(|n| n.chars().count());

        // (canonical name, normalized key), in creation order.
        let mut representatives: Vec<(String, String)> = Vec::new();

        for name in unique_names {
            let key = normalize_name(name);
            if map.contains(&key) {
                continue;
            }

            let matched = representatives.iter().position(|(_, rep_key)| {
                strsim::normalized_levenshtein(&key, rep_key) >= similarity_threshold
            });

            match matched {
                Some(idx) => {
                    let canonical = representatives[idx].0.clone();
                    debug!("Aligned '{}' -> '{}' ({})", name, canonical, label);
                    map.insert(key, canonical);
                }
                None => {
                    representatives.push((name.clone(), key.clone()));
                    map.insert(key, name.clone());
                }
            }
        }
    }

    info!("Entity fusion produced {} canonicalization rules", map.len());
    map
}
