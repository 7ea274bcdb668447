//! Error types for the propagation engine and its I/O adapters.

use crate::domain::NodeKey;
use std::io;
use thiserror::Error;

/// The error type for cmdb-graph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A node key was resolved against a snapshot that does not contain it.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeKey),

    /// A connection record does not name exactly one source and one target.
    #[error("Malformed connection: {0}")]
    MalformedConnection(String),

    /// A string could not be parsed as a node key.
    #[error("Invalid node key '{0}': expected '<id>' or 'group-<id>'")]
    InvalidNodeKey(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A snapshot document could not be decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

/// A specialized Result type for cmdb-graph operations.
pub type Result<T> = std::result::Result<T, Error>;
