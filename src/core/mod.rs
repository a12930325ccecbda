//! Core types and traits for imgbatch nodes.
//!
//! This module contains the foundational types a node is built from:
//! - Value types and normalized tensors
//! - Port and parameter definitions
//! - Node trait, metadata and change hints
//! - Error types
//! - Execution and validation contexts

pub mod types;
pub mod tensor;
pub mod port;
pub mod error;
pub mod context;
pub mod fingerprint;
pub mod node;

// Re-export commonly used types
pub use types::{Value, PortType};
pub use tensor::{ImageTensor, MaskTensor};
pub use port::{PortDefinition, ParameterDefinition, Constraint, UiHint};
pub use error::{ImgbatchError, ValidationError, ExecutionError, LoadError, NodeId};
pub use context::{ValidationContext, ExecutionContext};
pub use node::{FilterNode, NodeMetadata, Category, ChangeHint};
