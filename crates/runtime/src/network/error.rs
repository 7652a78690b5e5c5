use thiserror::Error;

/// Failures at the network boundary: encoding requests and persisting them.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("request log already exists: {0}")]
    LogAlreadyExists(String),

    #[error("corrupted request log at line {line}: {source}")]
    CorruptedLog {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, NetworkError>;
