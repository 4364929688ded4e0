use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{info, warn};

use super::store::{GraphStore, Params};
use super::validate_identifier;
use crate::errors::{GraphError, GraphResult};
use crate::models::is_known_label;

/// Poll interval for the schema-online wait.
const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Declarative schema descriptor, read from YAML. Unknown fields are
/// ignored so newer descriptors keep working against older builds.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDescriptor {
    #[serde(default)]
    pub nodes: Vec<NodeSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeSchema {
    pub label: String,
    #[serde(default)]
    pub properties: Vec<PropertySchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertySchema {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<ConstraintKind>,
    #[serde(default)]
    pub index: Option<IndexKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Unique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Simple,
    Fulltext,
}

impl SchemaDescriptor {
    pub fn from_yaml(raw: &str) -> GraphResult<Self> {
        serde_yaml::from_str(raw)
            .map_err(|e| GraphError::Configuration(format!("invalid schema descriptor: {}", e)))
    }
}

/// Applies and tears down uniqueness constraints and indexes, and gates
/// bulk loading on the schema reporting online.
pub struct SchemaManager<S: GraphStore> {
    store: Arc<S>,
}

impl<S: GraphStore> SchemaManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Delete every node and edge. Refuses to run without `confirm`;
    /// clearing an already-empty store succeeds silently.
    pub async fn clear_database(&self, confirm: bool) -> GraphResult<()> {
        if !confirm {
            return Err(GraphError::ConfirmationRequired(
                "clear_database deletes all nodes and relationships; pass confirm = true".to_string(),
            ));
        }

        warn!("Clearing graph database");
        self.store
            .execute_write("MATCH (n) DETACH DELETE n", Params::new())
            .await
    }

    /// Best-effort teardown of every existing constraint and index. A drop
    /// failure on a single item is logged and skipped, not fatal.
    pub async fn drop_all_schema(&self) -> GraphResult<()> {
        for constraint in self.store.constraints().await? {
            let statement = format!("DROP CONSTRAINT `{}` IF EXISTS", constraint.name);
            if let Err(e) = self.store.execute_write(&statement, Params::new()).await {
                warn!("Failed to drop constraint '{}': {}", constraint.name, e);
            }
        }

        for index in self.store.indexes().await? {
            // Lookup indexes are store-managed.
            if index.entry_type.eq_ignore_ascii_case("lookup") {
                continue;
            }
            let statement = format!("DROP INDEX `{}` IF EXISTS", index.name);
            if let Err(e) = self.store.execute_write(&statement, Params::new()).await {
                warn!("Failed to drop index '{}': {}", index.name, e);
            }
        }

        Ok(())
    }

    /// Read a YAML schema descriptor from disk and apply it.
    pub async fn apply_schema_from_yaml(&self, schema_path: impl AsRef<Path>) -> GraphResult<()> {
        let raw = std::fs::read_to_string(schema_path.as_ref())?;
        let descriptor = SchemaDescriptor::from_yaml(&raw)?;
        self.apply_schema(&descriptor).await
    }

    /// Issue an idempotent `IF NOT EXISTS` statement for each declared
    /// constraint and index. Fulltext failures are downgraded to warnings
    /// since fulltext support may be absent or misconfigured; plain
    /// constraint and index failures propagate.
    pub async fn apply_schema(&self, descriptor: &SchemaDescriptor) -> GraphResult<()> {
        for node in &descriptor.nodes {
            if !is_known_label(&node.label) {
                return Err(GraphError::Configuration(format!(
                    "unknown node label '{}' in schema descriptor",
                    node.label
                )));
            }
            validate_identifier(&node.label)?;

            for property in &node.properties {
                validate_identifier(&property.name)?;

                if property.constraint == Some(ConstraintKind::Unique) {
                    let statement = format!(
                        "CREATE CONSTRAINT {label}_{prop}_unique IF NOT EXISTS \
                         FOR (n:{label}) REQUIRE n.{prop} IS UNIQUE",
                        label = node.label,
                        prop = property.name
                    );
                    self.store.execute_write(&statement, Params::new()).await?;
                    info!("Applied uniqueness constraint on {}.{}", node.label, property.name);
                }

                match property.index {
                    Some(IndexKind::Simple) => {
                        let statement = format!(
                            "CREATE INDEX {label}_{prop}_idx IF NOT EXISTS \
                             FOR (n:{label}) ON (n.{prop})",
                            label = node.label,
                            prop = property.name
                        );
                        self.store.execute_write(&statement, Params::new()).await?;
                        info!("Applied index on {}.{}", node.label, property.name);
                    }
                    Some(IndexKind::Fulltext) => {
                        let statement = format!(
                            "CREATE FULLTEXT INDEX {label}_{prop}_fulltext IF NOT EXISTS \
                             FOR (n:{label}) ON EACH [n.{prop}]",
                            label = node.label,
                            prop = property.name
                        );
                        if let Err(e) = self.store.execute_write(&statement, Params::new()).await {
                            warn!(
                                "Fulltext index on {}.{} not created: {}",
                                node.label, property.name, e
                            );
                        }
                    }
                    None => {}
                }
            }
        }

        Ok(())
    }

    /// Block until every index reports online, or fail with
    /// [`GraphError::SchemaTimeout`]. Mandatory before bulk loading: merging
    /// against a uniqueness constraint that is still building can miss
    /// duplicates.
    pub async fn await_indexes_online(&self, timeout_seconds: u64) -> GraphResult<()> {
        let deadline = Instant::now() + Duration::from_secs(timeout_seconds);

        loop {
            let indexes = self.store.indexes().await?;
            let pending: Vec<&str> = indexes
                .iter()
                .filter(|idx| !idx.is_online())
                .map(|idx| idx.name.as_str())
                .collect();

            if pending.is_empty() {
                info!("All {} indexes online", indexes.len());
                return Ok(());
            }

            if Instant::now() >= deadline {
                warn!(
                    "Indexes still building after {}s: {}",
                    timeout_seconds,
                    pending.join(", ")
                );
                return Err(GraphError::SchemaTimeout(timeout_seconds));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_db::test_store::MockStore;

    const SCHEMA_YAML: &str = r#"
nodes:
  - label: Concept
    properties:
      - name: name
        constraint: unique
      - name: description
        index: fulltext
  - label: Technology
    properties:
      - name: name
        constraint: unique
        index: simple
"#;

    fn manager(store: MockStore) -> (SchemaManager<MockStore>, Arc<MockStore>) {
        let store = Arc::new(store);
        (SchemaManager::new(Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let (manager, store) = manager(MockStore::default());

        let err = manager.clear_database(false).await.unwrap_err();
        assert!(matches!(err, GraphError::ConfirmationRequired(_)));
        assert!(store.write_statements().is_empty());
    }

    #[tokio::test]
    async fn test_clear_detach_deletes() {
        let (manager, store) = manager(MockStore::default());

        manager.clear_database(true).await.unwrap();
        assert_eq!(store.write_statements(), vec!["MATCH (n) DETACH DELETE n"]);
    }

    #[tokio::test]
    async fn test_apply_schema_is_idempotent() {
        let (manager, store) = manager(MockStore::default());
        let descriptor = SchemaDescriptor::from_yaml(SCHEMA_YAML).unwrap();

        manager.apply_schema(&descriptor).await.unwrap();
        let first_run = store.write_statements();
        assert!(first_run.iter().all(|s| s.contains("IF NOT EXISTS")));

        manager.apply_schema(&descriptor).await.unwrap();
        let both_runs = store.write_statements();
        assert_eq!(&both_runs[..first_run.len()], &first_run[..]);
        assert_eq!(&both_runs[first_run.len()..], &first_run[..]);
    }

    #[tokio::test]
    async fn test_fulltext_failure_is_downgraded() {
        let (manager, store) = manager(MockStore {
            fail_writes_containing: Some("FULLTEXT".to_string()),
            ..MockStore::default()
        });
        let descriptor = SchemaDescriptor::from_yaml(SCHEMA_YAML).unwrap();

        manager.apply_schema(&descriptor).await.unwrap();
        // The uniqueness constraints still went through.
        assert!(store
            .write_statements()
            .iter()
            .any(|s| s.contains("Concept_name_unique")));
    }

    #[tokio::test]
    async fn test_plain_constraint_failure_propagates() {
        let (manager, _) = manager(MockStore {
            fail_writes_containing: Some("CREATE CONSTRAINT".to_string()),
            ..MockStore::default()
        });
        let descriptor = SchemaDescriptor::from_yaml(SCHEMA_YAML).unwrap();

        let err = manager.apply_schema(&descriptor).await.unwrap_err();
        assert!(matches!(err, GraphError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unknown_label_rejected_before_interpolation() {
        let (manager, store) = manager(MockStore::default());
        let descriptor = SchemaDescriptor::from_yaml(
            "nodes:\n  - label: Movie\n    properties:\n      - name: name\n        constraint: unique\n",
        )
        .unwrap();

        let err = manager.apply_schema(&descriptor).await.unwrap_err();
        assert!(matches!(err, GraphError::Configuration(_)));
        assert!(store.write_statements().is_empty());
    }

    #[test]
    fn test_descriptor_ignores_unknown_fields() {
        let descriptor = SchemaDescriptor::from_yaml(
            "version: 3\nnodes:\n  - label: Concept\n    color: red\n    properties:\n      - name: name\n        constraint: unique\n        comment: ignored\n",
        )
        .unwrap();
        assert_eq!(descriptor.nodes.len(), 1);
        assert_eq!(descriptor.nodes[0].properties[0].constraint, Some(ConstraintKind::Unique));
    }

    #[test]
    fn test_malformed_descriptor_is_configuration_error() {
        let err = SchemaDescriptor::from_yaml("nodes: {not: a list}").unwrap_err();
        assert!(matches!(err, GraphError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_await_online_returns_when_all_online() {
        let (manager, _) = manager(MockStore::with_indexes(vec![
            MockStore::online_index("Concept_name_unique"),
            MockStore::online_index("Technology_name_idx"),
        ]));

        manager.await_indexes_online(0).await.unwrap();
    }

    #[tokio::test]
    async fn test_await_online_times_out_immediately_at_zero() {
        let (manager, _) = manager(MockStore::with_indexes(vec![
            MockStore::online_index("Concept_name_unique"),
            MockStore::building_index("Technology_name_idx"),
        ]));

        let started = Instant::now();
        let err = manager.await_indexes_online(0).await.unwrap_err();
        assert!(matches!(err, GraphError::SchemaTimeout(0)));
        // Never slept through a poll interval.
        assert!(started.elapsed() < POLL_INTERVAL);
    }

    #[tokio::test]
    async fn test_drop_all_schema_is_best_effort() {
        let store = MockStore::with_indexes(vec![
            MockStore::online_index("Concept_name_idx"),
            MockStore::lookup_index("node_label_lookup"),
        ]);
        *store.constraint_entries.lock().unwrap() = vec![MockStore::constraint("Concept_name_unique")];
        let (manager, store) = manager(MockStore {
            fail_writes_containing: Some("DROP CONSTRAINT".to_string()),
            ..store
        });

        manager.drop_all_schema().await.unwrap();

        let statements = store.write_statements();
        // The failed constraint drop was skipped, the index drop still ran,
        // and the lookup index was left alone.
        assert_eq!(statements, vec!["DROP INDEX `Concept_name_idx` IF EXISTS"]);
    }
}
