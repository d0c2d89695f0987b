//! Error types for type introspection

use std::path::PathBuf;

use thiserror::Error;

use crate::document::NodeId;

/// Result type for introspection operations
pub type Result<T> = std::result::Result<T, TypeError>;

/// Type introspection errors
#[derive(Error, Debug)]
pub enum TypeError {
    #[error("Could not write introspection output to {path:?}: {source}. Does the path exist?")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Type name collision: '{name}' is already registered by {existing}, cannot register {incoming}")]
    NameCollision {
        name: String,
        existing: &'static str,
        incoming: &'static str,
    },

    #[error("Node {0:?} does not belong to this document")]
    UnknownNode(NodeId),

    #[error("Attribute '{key}' is already set on this node")]
    AttributeExists { key: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
