//! Error types for graphwalk-vis.

use thiserror::Error;

/// Result type for session and server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or serving a session.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad environment variable or command line argument
    #[error("Config error: {0}")]
    Config(String),

    /// The graph could not be built
    #[error("Graph error: {0}")]
    Graph(#[from] graphwalk_graph::Error),

    /// A run request was rejected
    #[error("Invalid request: {0}")]
    Request(#[from] graphwalk_algorithms::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// WebSocket send or receive failed
    #[error("WebSocket error: {0}")]
    Socket(#[from] axum::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
