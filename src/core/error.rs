//! Error types for imgbatch.
//!
//! Uses thiserror for structured errors with context. Node-level errors name
//! the node and parameter involved; per-file load errors name the file.

use crate::core::types::PortType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a node instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Top-level error type.
#[derive(Error, Debug)]
pub enum ImgbatchError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the validation phase.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: PortType, got: PortType },

    #[error("Missing required parameter '{parameter}' on node {node_id}")]
    MissingRequiredParameter { node_id: NodeId, parameter: String },

    #[error("Constraint violation on node {node_id}, parameter '{parameter}': {error}")]
    ConstraintViolation {
        node_id: NodeId,
        parameter: String,
        error: String,
    },
}

/// Errors during node execution.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Missing parameter '{parameter}' for node {node_id}")]
    MissingParameter { node_id: NodeId, parameter: String },

    #[error("Parameter '{parameter}' on node {node_id} has the wrong type: expected {expected}")]
    ParameterType {
        node_id: NodeId,
        parameter: String,
        expected: PortType,
    },
}

/// Failure to load a single file into the batch.
///
/// These never abort a batch: the loader logs them and moves on.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unexpected tensor shape for '{}': {source}", path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: ndarray::ShapeError,
    },
}

impl ExecutionError {
    /// Get the node ID that caused this error.
    pub fn node_id(&self) -> NodeId {
        match self {
            ExecutionError::MissingParameter { node_id, .. }
            | ExecutionError::ParameterType { node_id, .. } => *node_id,
        }
    }
}

impl LoadError {
    /// The file this error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Decode { path, .. }
            | LoadError::Shape { path, .. } => path,
        }
    }
}

/// Result type alias for imgbatch operations.
pub type ImgbatchResult<T> = Result<T, ImgbatchError>;
