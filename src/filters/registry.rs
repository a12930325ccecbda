//! Node registry consumed by the host.

use crate::core::error::ImgbatchResult;
use crate::core::node::{Category, FilterNode, NodeMetadata};
use indexmap::IndexMap;
use std::sync::Arc;

/// Factory function for creating node instances.
pub type FilterFactory = Arc<dyn Fn() -> Box<dyn FilterNode> + Send + Sync>;

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: FilterFactory,
    /// Cached metadata (avoids creating an instance just to read it).
    pub metadata: NodeMetadata,
}

/// Registry of the node types this crate exposes.
///
/// Keeps registration order, which is also the order the host lists nodes in.
pub struct FilterRegistry {
    filters: IndexMap<String, RegistryEntry>,
    categories: IndexMap<Category, Vec<String>>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in nodes.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register a node type. Re-registering an id replaces the entry.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn FilterNode> + Send + Sync + 'static,
    {
        let metadata = factory().metadata();
        let id = metadata.id.clone();
        let category = metadata.category;

        let entry = RegistryEntry {
            factory: Arc::new(factory),
            metadata,
        };

        if let Some(previous) = self.filters.insert(id.clone(), entry) {
            if let Some(ids) = self.categories.get_mut(&previous.metadata.category) {
                ids.retain(|i| i != &id);
            }
        }
        self.categories.entry(category).or_default().push(id);
    }

    /// Create a new instance of a node by id.
    pub fn create(&self, id: &str) -> Option<Box<dyn FilterNode>> {
        self.filters.get(id).map(|e| (e.factory)())
    }

    /// Get metadata for a node without creating an instance.
    pub fn get_metadata(&self, id: &str) -> Option<&NodeMetadata> {
        self.filters.get(id).map(|e| &e.metadata)
    }

    /// Check if a node is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.filters.contains_key(id)
    }

    /// Ids registered under `category`.
    pub fn filters_by_category(&self, category: &Category) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|ids| ids.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Node id to display name, the second table the host reads on load.
    pub fn display_name_mappings(&self) -> IndexMap<&str, &str> {
        self.filters
            .iter()
            .map(|(id, entry)| (id.as_str(), entry.metadata.name.as_str()))
            .collect()
    }

    /// All metadata as a JSON object keyed by node id.
    pub fn export_json(&self) -> ImgbatchResult<String> {
        let metadata: IndexMap<&str, &NodeMetadata> = self
            .filters
            .iter()
            .map(|(id, entry)| (id.as_str(), &entry.metadata))
            .collect();
        Ok(serde_json::to_string_pretty(&metadata)?)
    }

    /// Get the total number of registered nodes.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
