//! Entity resolution and idempotent graph ingestion for a course
//! knowledge graph.
//!
//! The pipeline takes noisy extracted entities and relations, clusters
//! near-duplicate surface forms into canonical identities, rewrites the
//! input through that mapping, and loads the result into a
//! labeled-property graph store with merge semantics. Schema application
//! and bulk loading are both safe to re-run.

pub mod config;
pub mod errors;
pub mod graph_db;
pub mod knowledge_fusion;
pub mod models;
pub mod services;

pub use config::{FusionConfig, GraphStoreConfig};
pub use errors::{GraphError, GraphResult};
pub use graph_db::{GraphLoader, GraphStore, Neo4jClient, SchemaManager};
pub use knowledge_fusion::CanonicalMap;
pub use models::{Entity, Relation};
pub use services::IngestService;
