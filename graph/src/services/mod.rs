//! Pipeline orchestration over fusion and loading.

pub mod ingest_service;

pub use ingest_service::{IngestReport, IngestService};
