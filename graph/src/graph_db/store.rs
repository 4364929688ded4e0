use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::GraphResult;

/// Named parameters for a Cypher statement.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// A constraint or index as reported by the store's schema introspection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub state: String,
}

impl SchemaEntry {
    pub fn is_online(&self) -> bool {
        self.state.eq_ignore_ascii_case("online")
    }
}

/// Capability boundary toward the labeled-property graph store.
///
/// `SchemaManager` and `GraphLoader` are written purely against this trait;
/// any transactional store with a declarative pattern-match/merge language
/// and schema introspection can stand behind it.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a read/write statement and collect the resulting records.
    async fn run(&self, statement: &str, params: Params) -> GraphResult<Vec<serde_json::Value>>;

    /// Run a statement inside a managed write transaction.
    async fn execute_write(&self, statement: &str, params: Params) -> GraphResult<()>;

    /// Current constraints, with name and type.
    async fn constraints(&self) -> GraphResult<Vec<SchemaEntry>>;

    /// Current indexes, with name, type, and build state.
    async fn indexes(&self) -> GraphResult<Vec<SchemaEntry>>;
}
