pub mod data_loader;
pub mod neo4j_client;
pub mod schema_manager;
pub mod store;

pub use data_loader::GraphLoader;
pub use neo4j_client::Neo4jClient;
pub use schema_manager::{SchemaDescriptor, SchemaManager};
pub use store::{GraphStore, Params, SchemaEntry};

use crate::errors::{GraphError, GraphResult};

/// Labels and relation types are interpolated structurally into Cypher and
/// cannot be parameterized, so restrict them to identifier characters.
pub(crate) fn validate_identifier(name: &str) -> GraphResult<()> {
    let mut chars = name.chars();
    let ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if ok {
        Ok(())
    } else {
        Err(GraphError::InvalidLabel(name.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod test_store;
