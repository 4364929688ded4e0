use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::store::{GraphStore, Params, SchemaEntry};
use crate::errors::{GraphError, GraphResult};

/// In-memory store double that records statements and serves canned
/// introspection results.
#[derive(Default)]
pub struct MockStore {
    pub writes: Mutex<Vec<(String, Params)>>,
    pub reads: Mutex<Vec<(String, Params)>>,
    pub constraint_entries: Mutex<Vec<SchemaEntry>>,
    pub index_entries: Mutex<Vec<SchemaEntry>>,
    pub run_responses: Mutex<VecDeque<Vec<serde_json::Value>>>,
    /// Writes whose statement contains this substring fail with `StoreUnavailable`.
    pub fail_writes_containing: Option<String>,
}

impl MockStore {
    pub fn with_indexes(indexes: Vec<SchemaEntry>) -> Self {
        Self {
            index_entries: Mutex::new(indexes),
            ..Self::default()
        }
    }

    pub fn online_index(name: &str) -> SchemaEntry {
        SchemaEntry {
            name: name.to_string(),
            entry_type: "RANGE".to_string(),
            state: "ONLINE".to_string(),
        }
    }

    pub fn building_index(name: &str) -> SchemaEntry {
        SchemaEntry {
            name: name.to_string(),
            entry_type: "RANGE".to_string(),
            state: "POPULATING".to_string(),
        }
    }

    pub fn lookup_index(name: &str) -> SchemaEntry {
        SchemaEntry {
            name: name.to_string(),
            entry_type: "LOOKUP".to_string(),
            state: "ONLINE".to_string(),
        }
    }

    pub fn constraint(name: &str) -> SchemaEntry {
        SchemaEntry {
            name: name.to_string(),
            entry_type: "UNIQUENESS".to_string(),
            state: String::new(),
        }
    }

    pub fn write_statements(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(statement, _)| statement.clone())
            .collect()
    }
}

#[async_trait]
impl GraphStore for MockStore {
    async fn run(&self, statement: &str, params: Params) -> GraphResult<Vec<serde_json::Value>> {
        self.reads
            .lock()
            .unwrap()
            .push((statement.to_string(), params));
        Ok(self
            .run_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn execute_write(&self, statement: &str, params: Params) -> GraphResult<()> {
        if let Some(needle) = &self.fail_writes_containing {
            if statement.contains(needle.as_str()) {
                return Err(GraphError::StoreUnavailable(format!(
                    "injected failure for statements containing '{}'",
                    needle
                )));
            }
        }
        self.writes
            .lock()
            .unwrap()
            .push((statement.to_string(), params));
        Ok(())
    }

    async fn constraints(&self) -> GraphResult<Vec<SchemaEntry>> {
        Ok(self.constraint_entries.lock().unwrap().clone())
    }

    async fn indexes(&self) -> GraphResult<Vec<SchemaEntry>> {
        Ok(self.index_entries.lock().unwrap().clone())
    }
}
