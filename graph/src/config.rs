use serde::Deserialize;
use std::env;

/// Connection settings for the Neo4j-backed graph store.
#[derive(Debug, Clone)]
pub struct GraphStoreConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub fetch_size: usize,
    pub max_connections: usize,
}

impl Default for GraphStoreConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
            fetch_size: 500,
            max_connections: 10,
        }
    }
}

impl GraphStoreConfig {
    /// Read connection settings from the environment (`.env` supported).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        Self {
            uri: env::var("NEO4J_URI").unwrap_or(defaults.uri),
            user: env::var("NEO4J_USER").unwrap_or(defaults.user),
            password: env::var("NEO4J_PASSWORD").unwrap_or(defaults.password),
            database: env::var("NEO4J_DATABASE").unwrap_or(defaults.database),
            fetch_size: defaults.fetch_size,
            max_connections: defaults.max_connections,
        }
    }
}

/// Tuning knobs for the fusion stage.
#[derive(Debug, Clone, Deserialize)]
pub struct FusionConfig {
    /// Normalized edit-distance similarity threshold for clustering, in `[0, 1]`.
    pub similarity_threshold: f64,
    /// Minimum trimmed length of an entity name, in characters.
    pub min_name_len: usize,
    /// Minimum occurrences of the exact surface form within a batch.
    pub min_frequency: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            min_name_len: 2,
            min_frequency: 1,
        }
    }
}
