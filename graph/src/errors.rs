use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Destructive operation requires confirmation: {0}")]
    ConfirmationRequired(String),

    #[error("Schema did not report online within {0}s")]
    SchemaTimeout(u64),

    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid label or relation type: {0}")]
    InvalidLabel(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
