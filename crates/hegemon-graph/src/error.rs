//! Error types for the `hegemon-graph` crate.

use hegemon_types::NodeId;

/// Errors that can occur during working-graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A social-class node required by the caller is missing.
    #[error("entity not found: {0}")]
    EntityNotFound(NodeId),

    /// A territory node required by the caller is missing.
    #[error("territory not found: {0}")]
    TerritoryNotFound(NodeId),

    /// The graph could not be encoded or decoded as JSON.
    #[error("graph serialization failed: {source}")]
    Json {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },
}
