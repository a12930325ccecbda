//! # imgbatch - Directory batch image loading
//!
//! imgbatch provides a node for graph-based image pipelines that loads every
//! supported image in a directory in one step. Each image is decoded into a
//! normalized `(1, H, W, 3)` tensor with an inverted-alpha mask, and returned
//! alongside its absolute path and base name.
//!
//! ## Features
//!
//! - **Sorting**: alphabetical, numerical (first digit run) or by modification time
//! - **Slicing**: start index with negative suffixes and an optional load cap
//! - **Fault tolerance**: unreadable files are logged and skipped
//! - **JPEG XL**: `.jxl` files are picked up when built with the `jxl` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imgbatch::prelude::*;
//!
//! let options = BatchLoadOptions::new("/path/to/images")
//!     .with_sort_method(SortMethod::NumericalAsc)
//!     .with_load_cap(10);
//!
//! let batch = load_batch(&options);
//! for (name, image) in batch.file_names().iter().zip(batch.images()) {
//!     println!("{}: {:?}", name, image.shape());
//! }
//! ```
//!
//! ## Host integration
//!
//! The host discovers nodes through a [`FilterRegistry`](filters::FilterRegistry):
//!
//! ```rust
//! use imgbatch::prelude::*;
//!
//! let registry = FilterRegistry::with_builtins();
//! let node = registry.create("BatchLoadImagesWithNames").unwrap();
//!
//! let mut ctx = ExecutionContext::new(NodeId::new());
//! ctx.add_parameter("directory", Value::String("/nonexistent".to_string()));
//! node.execute(&mut ctx).unwrap();
//! assert_eq!(ctx.outputs()["count"], Value::Integer(0));
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: values, tensors, node trait, contexts and errors
//! - [`loader`]: scanning, sorting, decoding and batch assembly
//! - [`filters`]: registry and the built-in node

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod filters;
pub mod loader;

/// Prelude module for convenient imports.
///
/// ```rust
/// use imgbatch::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::tensor::{ImageTensor, MaskTensor};
    pub use crate::core::types::{PortType, Value};

    // Node traits and types
    pub use crate::core::node::{Category, ChangeHint, FilterNode, NodeMetadata};

    // Port definitions
    pub use crate::core::port::{Constraint, ParameterDefinition, PortDefinition, UiHint};

    // Contexts
    pub use crate::core::context::{ExecutionContext, ValidationContext};

    // Errors
    pub use crate::core::error::{
        ExecutionError, ImgbatchError, ImgbatchResult, LoadError, NodeId, ValidationError,
    };

    // Loader
    pub use crate::loader::{
        load_batch, load_batch_with_progress, BatchLoadOptions, BatchResult, DecodedImage,
        EmptyReason, ImageRecord, SortMethod,
    };

    // Registry and nodes
    pub use crate::filters::builtin::BatchLoadImagesWithNames;
    pub use crate::filters::registry::{FilterFactory, FilterRegistry, RegistryEntry};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "imgbatch");
    }

    #[test]
    fn test_registry_with_builtins() {
        let registry = FilterRegistry::with_builtins();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(BatchLoadImagesWithNames::ID));
        assert_eq!(
            registry.filters_by_category(&Category::Input),
            vec![BatchLoadImagesWithNames::ID]
        );
    }
}
