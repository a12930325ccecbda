//! FilterNode trait and node metadata.
//!
//! The FilterNode trait is the surface the host's node registry consumes.
//! It uses a two-phase design: validation (before execution) and execution,
//! plus an advisory change hint for the host's re-execution memo.

use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::fingerprint::fingerprint;
use crate::core::port::{ParameterDefinition, PortDefinition};
use serde::{Deserialize, Serialize};

/// Category for organizing nodes in the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Input nodes (load images, folders, etc.)
    Input,
    /// Custom/user-defined
    #[default]
    Custom,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Input => "Input",
            Category::Custom => "Custom",
        }
    }
}

/// Metadata describing a node type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Stable identifier the host registers the node under
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Category for UI organization
    pub category: Category,
    /// Detailed description
    pub description: String,
    /// Version string
    pub version: String,
    /// Author or source
    pub author: String,

    /// Output port definitions
    pub outputs: Vec<PortDefinition>,
    /// Parameter definitions
    pub parameters: Vec<ParameterDefinition>,

    /// Searchable tags
    pub tags: Vec<String>,
    /// Whether the same parameters always give the same outputs
    pub deterministic: bool,
}

impl NodeMetadata {
    /// Create a new metadata builder.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> NodeMetadataBuilder {
        NodeMetadataBuilder::new(id, name)
    }

    /// Get all output port names.
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|p| p.name.as_str()).collect()
    }

    /// Get all parameter names.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Find a parameter by name.
    pub fn get_parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Builder for NodeMetadata.
pub struct NodeMetadataBuilder {
    id: String,
    name: String,
    category: Category,
    description: String,
    version: String,
    author: String,
    outputs: Vec<PortDefinition>,
    parameters: Vec<ParameterDefinition>,
    tags: Vec<String>,
    deterministic: bool,
}

impl NodeMetadataBuilder {
    /// Create a new builder with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: Category::Custom,
            description: String::new(),
            version: "1.0.0".to_string(),
            author: "imgbatch".to_string(),
            outputs: Vec::new(),
            parameters: Vec::new(),
            tags: Vec::new(),
            deterministic: true,
        }
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Add an output port.
    pub fn output(mut self, port: PortDefinition) -> Self {
        self.outputs.push(port);
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, param: ParameterDefinition) -> Self {
        self.parameters.push(param);
        self
    }

    /// Add multiple tags.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Mark as non-deterministic.
    pub fn non_deterministic(mut self) -> Self {
        self.deterministic = false;
        self
    }

    /// Build the metadata.
    pub fn build(self) -> NodeMetadata {
        NodeMetadata {
            id: self.id,
            name: self.name,
            category: self.category,
            description: self.description,
            version: self.version,
            author: self.author,
            outputs: self.outputs,
            parameters: self.parameters,
            tags: self.tags,
            deterministic: self.deterministic,
        }
    }
}

/// Advisory signal for the host's re-execution memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ChangeHint {
    /// Always recompute; never equal to any previous hint.
    Always,
    /// Recompute only when the fingerprint differs from the previous one.
    Fingerprint(u64),
}

impl ChangeHint {
    /// Whether the host should recompute given the hint from its last run.
    pub fn differs_from(&self, previous: &ChangeHint) -> bool {
        match (self, previous) {
            (ChangeHint::Fingerprint(a), ChangeHint::Fingerprint(b)) => a != b,
            _ => true,
        }
    }
}

/// The core trait for nodes.
///
/// `Send + Sync` bounds let the host hold instances across its worker
/// threads; each `execute` call is still a single synchronous step.
pub trait FilterNode: Send + Sync {
    /// Get the metadata for this node.
    ///
    /// Called during registration and should return consistent values.
    fn metadata(&self) -> NodeMetadata;

    /// Validate the node configuration before execution.
    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError>;

    /// Execute the node, reading parameters from and writing outputs to `ctx`.
    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError>;

    /// Report whether the node's result may have changed.
    ///
    /// The default fingerprints the parameter values.
    fn is_changed(&self, ctx: &ValidationContext) -> ChangeHint {
        ChangeHint::Fingerprint(fingerprint(ctx.parameters()))
    }

    /// Clone this node into a boxed trait object.
    fn clone_box(&self) -> Box<dyn FilterNode>;
}

impl Clone for Box<dyn FilterNode> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
