// File: src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GestureError>;

#[derive(Error, Debug)]
pub enum GestureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The snapshot on disk was built for a different layout or sampling setup.
    #[error("Stale index snapshot: {0}")]
    StaleSnapshot(String),
}
