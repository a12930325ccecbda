//! Node registry and built-in nodes.

pub mod registry;
pub mod builtin;

pub use registry::{FilterRegistry, FilterFactory, RegistryEntry};
