use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::FusionConfig;
use crate::errors::GraphResult;
use crate::graph_db::{GraphLoader, GraphStore, SchemaManager};
use crate::knowledge_fusion::{
    create_canonical_map, filter_entities, resolve_entities, resolve_relations,
};
use crate::models::{Entity, Relation};

/// Outcome summary of one ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub entities_in: usize,
    pub entities_loaded: usize,
    pub relations_in: usize,
    pub relations_loaded: usize,
    pub canonical_rules: usize,
}

/// Sequences one pipeline invocation: filter, cluster, resolve, then load
/// entities strictly before relations.
pub struct IngestService<S: GraphStore> {
    schema_manager: SchemaManager<S>,
    loader: GraphLoader<S>,
    fusion: FusionConfig,
}

impl<S: GraphStore> IngestService<S> {
    pub fn new(store: Arc<S>, fusion: FusionConfig) -> Self {
        Self {
            schema_manager: SchemaManager::new(Arc::clone(&store)),
            loader: GraphLoader::new(store),
            fusion,
        }
    }

    pub fn schema_manager(&self) -> &SchemaManager<S> {
        &self.schema_manager
    }

    pub fn loader(&self) -> &GraphLoader<S> {
        &self.loader
    }

    /// Apply the declared schema and block until it reports online. Run once
    /// per fresh store, before any ingest; a timeout here must abort the run.
    pub async fn prepare_schema(
        &self,
        schema_path: impl AsRef<Path>,
        timeout_seconds: u64,
    ) -> GraphResult<()> {
        self.schema_manager
            .apply_schema_from_yaml(schema_path)
            .await?;
        self.schema_manager
            .await_indexes_online(timeout_seconds)
            .await
    }

    /// Fuse and load one extraction batch.
    ///
    /// The canonical map is a pure function of this batch's entity list and
    /// is dropped afterwards; reusing it across batches would yield stale
    /// canonicalizations.
    pub async fn ingest(
        &self,
        entities: &[Entity],
        relations: &[Relation],
    ) -> GraphResult<IngestReport> {
        let filtered = filter_entities(entities, self.fusion.min_name_len, self.fusion.min_frequency);
        let canonical_map = create_canonical_map(&filtered, self.fusion.similarity_threshold);

        let resolved_entities = resolve_entities(&filtered, &canonical_map);
        let resolved_relations = resolve_relations(relations, &canonical_map);

        // Relation batches match on endpoint nodes, so every entity batch
        // must commit first.
        self.loader.load_entities(&resolved_entities).await?;
        self.loader.load_relations(&resolved_relations).await?;

        let report = IngestReport {
            entities_in: entities.len(),
            entities_loaded: resolved_entities.len(),
            relations_in: relations.len(),
            relations_loaded: resolved_relations.len(),
            canonical_rules: canonical_map.len(),
        };
        info!(
            "Ingest complete: {} entities, {} relations",
            report.entities_loaded, report.relations_loaded
        );
        Ok(report)
    }
}
