//! Built-in nodes.

mod batch_load;

use crate::filters::registry::FilterRegistry;

/// Register all built-in nodes.
pub fn register_all(registry: &mut FilterRegistry) {
    batch_load::register(registry);
}

pub use batch_load::BatchLoadImagesWithNames;
