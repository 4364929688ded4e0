use std::sync::Arc;

use async_trait::async_trait;
use neo4rs::{
    query, BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltNull, BoltString, BoltType,
    ConfigBuilder, Graph, Query,
};
use serde_json::Value;
use tracing::info;

use super::store::{GraphStore, Params, SchemaEntry};
use crate::config::GraphStoreConfig;
use crate::errors::{GraphError, GraphResult};

/// Neo4j-backed [`GraphStore`], compatible with both local Neo4j and AuraDB.
pub struct Neo4jClient {
    graph: Arc<Graph>,
    uri: String,
}

impl Neo4jClient {
    pub async fn connect(config: &GraphStoreConfig) -> GraphResult<Self> {
        info!("Connecting to Neo4j at {}", config.uri);

        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .fetch_size(config.fetch_size)
            .max_connections(config.max_connections)
            .build()
            .map_err(|e| GraphError::StoreUnavailable(format!("invalid Neo4j config: {}", e)))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| GraphError::StoreUnavailable(format!("failed to connect: {}", e)))?;

        // Round-trip a trivial statement so a bad endpoint fails here, not mid-load.
        let mut result = graph.execute(query("RETURN 1 AS ok")).await.map_err(store_err)?;
        if result.next().await.map_err(store_err)?.is_some() {
            info!("Neo4j connection established");
        }

        Ok(Self {
            graph: Arc::new(graph),
            uri: config.uri.clone(),
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    fn build_query(statement: &str, params: Params) -> Query {
        let mut q = query(statement);
        for (key, value) in params {
            q = q.param(&key, json_to_bolt(&value));
        }
        q
    }

    async fn show_schema(&self, statement: &str) -> GraphResult<Vec<SchemaEntry>> {
        let mut result = self.graph.execute(query(statement)).await.map_err(store_err)?;

        let mut entries = Vec::new();
        while let Some(row) = result.next().await.map_err(store_err)? {
            entries.push(SchemaEntry {
                name: row.get::<String>("name").map_err(de_err)?,
                entry_type: row.get::<String>("type").map_err(de_err)?,
                state: row.get::<String>("state").unwrap_or_default(),
            });
        }

        Ok(entries)
    }
}

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn run(&self, statement: &str, params: Params) -> GraphResult<Vec<Value>> {
        let mut result = self
            .graph
            .execute(Self::build_query(statement, params))
            .await
            .map_err(store_err)?;

        let mut records = Vec::new();
        while let Some(row) = result.next().await.map_err(store_err)? {
            records.push(row.to::<Value>().map_err(de_err)?);
        }

        Ok(records)
    }

    async fn execute_write(&self, statement: &str, params: Params) -> GraphResult<()> {
        let mut txn = self.graph.start_txn().await.map_err(store_err)?;
        txn.run(Self::build_query(statement, params))
            .await
            .map_err(store_err)?;
        txn.commit().await.map_err(store_err)?;
        Ok(())
    }

    async fn constraints(&self) -> GraphResult<Vec<SchemaEntry>> {
        self.show_schema("SHOW CONSTRAINTS YIELD name, type RETURN name, type")
            .await
    }

    async fn indexes(&self) -> GraphResult<Vec<SchemaEntry>> {
        self.show_schema("SHOW INDEXES YIELD name, type, state RETURN name, type, state")
            .await
    }
}

fn store_err(e: neo4rs::Error) -> GraphError {
    GraphError::StoreUnavailable(e.to_string())
}

fn de_err(e: impl std::fmt::Display) -> GraphError {
    GraphError::StoreUnavailable(format!("unexpected record shape: {}", e))
}

/// Statement parameters are built as plain JSON by the loader and schema
/// code; neo4rs wants Bolt-typed values, so convert recursively.
fn json_to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::Boolean(BoltBoolean::new(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::Integer(BoltInteger::new(i)),
            None => BoltType::Float(BoltFloat::new(n.as_f64().unwrap_or(0.0))),
        },
        Value::String(s) => BoltType::String(BoltString::new(s)),
        Value::Array(items) => {
            let mut list = BoltList::default();
            for item in items {
                list.push(json_to_bolt(item));
            }
            BoltType::List(list)
        }
        Value::Object(map) => {
            let mut bolt_map = BoltMap::default();
            for (key, item) in map {
                bolt_map.put(BoltString::new(key), json_to_bolt(item));
            }
            BoltType::Map(bolt_map)
        }
    }
}
