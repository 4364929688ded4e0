use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use super::store::{GraphStore, Params};
use super::validate_identifier;
use crate::errors::{GraphError, GraphResult};
use crate::models::{is_known_label, Entity, Relation};

/// Batched, idempotent writer for resolved entities and relations.
///
/// Node labels and relation types are structural in Cypher and cannot be
/// parameterized, so writes are grouped one batch per label (entities) or
/// per `(head_label, type, tail_label)` triple (relations), each batch
/// executed as a single managed write transaction.
pub struct GraphLoader<S: GraphStore> {
    store: Arc<S>,
}

impl<S: GraphStore> GraphLoader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Merge entities by `(label, name)`. `created_at` is stamped on first
    /// creation only, so re-loading the same batch leaves the store
    /// observably unchanged.
    pub async fn load_entities(&self, entities: &[Entity]) -> GraphResult<()> {
        let groups = group_entities(entities)?;

        for (label, batch) in &groups {
            let statement = format!(
                "UNWIND $batch AS entity \
                 MERGE (n:{} {{name: entity.name}}) \
                 ON CREATE SET n.created_at = timestamp()",
                label
            );

            let rows: Vec<_> = batch.iter().map(|e| json!({ "name": e.name })).collect();
            let mut params = Params::new();
            params.insert("batch".to_string(), json!(rows));

            self.store.execute_write(&statement, params).await?;
            debug!("Merged {} {} entities", batch.len(), label);
        }

        info!(
            "Loaded {} entities across {} label groups",
            entities.len(),
            groups.len()
        );
        Ok(())
    }

    /// Merge relations by `(head, type, tail)` between already-loaded nodes.
    /// A relation whose head or tail node is missing from the store produces
    /// no edge; that is logged, never raised, and the caller satisfies the
    /// precondition by loading all entities first.
    pub async fn load_relations(&self, relations: &[Relation]) -> GraphResult<()> {
        let groups = group_relations(relations)?;

        for ((head_label, rel_type, tail_label), batch) in &groups {
            let statement = format!(
                "UNWIND $batch AS rel \
                 MATCH (h:{head_label} {{name: rel.head}}) \
                 MATCH (t:{tail_label} {{name: rel.tail}}) \
                 MERGE (h)-[r:{rel_type}]->(t) \
                 ON CREATE SET r.created_at = timestamp()"
            );

            let rows: Vec<_> = batch
                .iter()
                .map(|r| json!({ "head": r.head, "tail": r.tail }))
                .collect();
            let mut params = Params::new();
            params.insert("batch".to_string(), json!(rows));

            self.store.execute_write(&statement, params.clone()).await?;
            debug!(
                "Merged {} ({})-[:{}]->({}) relations",
                batch.len(),
                head_label,
                rel_type,
                tail_label
            );

            self.check_group_consistency(head_label, rel_type, tail_label, batch.len(), params)
                .await?;
        }

        info!(
            "Loaded {} relations across {} type groups",
            relations.len(),
            groups.len()
        );
        Ok(())
    }

    /// Count the edges actually present for a batch; fewer edges than batch
    /// entries means some endpoints were never loaded.
    async fn check_group_consistency(
        &self,
        head_label: &str,
        rel_type: &str,
        tail_label: &str,
        expected: usize,
        params: Params,
    ) -> GraphResult<()> {
        let statement = format!(
            "UNWIND $batch AS rel \
             MATCH (h:{head_label} {{name: rel.head}})-[:{rel_type}]->(t:{tail_label} {{name: rel.tail}}) \
             RETURN count(*) AS matched"
        );

        let records = self.store.run(&statement, params).await?;
        let matched = records
            .first()
            .and_then(|record| record.get("matched"))
            .and_then(|value| value.as_u64())
            .map(|value| value as usize);

        if let Some(matched) = matched {
            if matched < expected {
                warn!(
                    "{} ({})-[:{}]->({}) relation(s) reference nodes missing from the store and were dropped",
                    expected - matched,
                    head_label,
                    rel_type,
                    tail_label
                );
            }
        }
        Ok(())
    }
}

fn group_entities(entities: &[Entity]) -> GraphResult<Vec<(String, Vec<&Entity>)>> {
    let mut groups: Vec<(String, Vec<&Entity>)> = Vec::new();
    for ent in entities {
        if !is_known_label(&ent.label) {
            return Err(GraphError::InvalidLabel(ent.label.clone()));
        }
        match groups.iter_mut().find(|(label, _)| *label == ent.label) {
            Some((_, batch)) => batch.push(ent),
            None => groups.push((ent.label.clone(), vec![ent])),
        }
    }
    Ok(groups)
}

type RelationKey = (String, String, String);

fn group_relations(relations: &[Relation]) -> GraphResult<Vec<(RelationKey, Vec<&Relation>)>> {
    let mut groups: Vec<(RelationKey, Vec<&Relation>)> = Vec::new();
    for rel in relations {
        if !is_known_label(&rel.head_label) {
            return Err(GraphError::InvalidLabel(rel.head_label.clone()));
        }
        if !is_known_label(&rel.tail_label) {
            return Err(GraphError::InvalidLabel(rel.tail_label.clone()));
        }
        validate_identifier(&rel.rel_type)?;

        let key = (
            rel.head_label.clone(),
            rel.rel_type.clone(),
            rel.tail_label.clone(),
        );
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, batch)) => batch.push(rel),
            None => groups.push((key, vec![rel])),
        }
    }
    Ok(groups)
}
