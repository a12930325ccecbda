//! Port and parameter definitions.
//!
//! Output ports describe what a node produces.
//! Parameters are the node's configuration, edited in the host's property
//! panel rather than connected to other nodes.

use crate::core::types::{PortType, Value};
use serde::{Deserialize, Serialize};

/// Definition of a node output port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDefinition {
    /// Unique name within the node (used in code)
    pub name: String,
    /// Human-readable name (used in UI)
    pub display_name: String,
    /// Type of data this port produces
    pub port_type: PortType,
    /// Description for documentation and tooltips
    pub description: String,
    /// Whether the host should treat each element of an array value as a
    /// separate item rather than one combined value
    pub is_list: bool,
}

/// UI hints for parameter display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "widget", content = "options")]
pub enum UiHint {
    /// Default input widget based on type
    #[default]
    Default,
    /// Dropdown for selecting from options
    Dropdown {
        /// Available options
        options: Vec<String>,
    },
    /// Directory or file chooser dialog
    FileChooser {
        /// File type filters (e.g., ["*.png", "*.jpg"]); empty for directories
        filters: Vec<String>,
    },
    /// Checkbox for booleans
    Checkbox {
        /// Label shown when checked
        label_on: String,
        /// Label shown when unchecked
        label_off: String,
    },
    /// Spin box for integers
    SpinBox,
}

/// Definition of a node parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Unique name within the node
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Type of the parameter
    pub param_type: PortType,
    /// Default value used when the host does not supply one
    pub default_value: Value,
    /// Whether the host must supply a value
    pub required: bool,
    /// Description for documentation
    pub description: String,
    /// Constraints for validation
    pub constraints: Vec<Constraint>,
    /// UI widget hint
    pub ui_hint: UiHint,
}

/// Constraints that can be applied to parameter values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// Numeric value must be >= 0
    NonNegative,
    /// Value must equal one of the specified options
    OneOf(Vec<Value>),
}

// ============================================================================
// PortDefinition Builder Pattern
// ============================================================================

impl PortDefinition {
    /// Create a new output port definition.
    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        let name = name.into();
        Self {
            display_name: name_to_display(&name),
            name,
            port_type,
            description: String::new(),
            is_list: false,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark this port as producing a list of separate items.
    pub fn as_list(mut self) -> Self {
        self.is_list = true;
        self
    }
}

/// Convert snake_case name to Title Case display name.
fn name_to_display(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// ParameterDefinition Builder Pattern
// ============================================================================

impl ParameterDefinition {
    /// Create a new optional parameter definition.
    pub fn new(name: impl Into<String>, param_type: PortType, default_value: Value) -> Self {
        let name = name.into();
        Self {
            display_name: name_to_display(&name),
            name,
            param_type,
            default_value,
            required: false,
            description: String::new(),
            constraints: Vec::new(),
            ui_hint: UiHint::Default,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Set the UI hint.
    pub fn with_ui_hint(mut self, ui_hint: UiHint) -> Self {
        self.ui_hint = ui_hint;
        self
    }

    /// Validate a value against this parameter's type and constraints.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if !self.param_type.matches(value) {
            return Err(format!(
                "Type mismatch for parameter '{}': expected {}, got {}",
                self.name,
                self.param_type,
                value.get_type()
            ));
        }

        for constraint in &self.constraints {
            constraint.validate(value)?;
        }

        Ok(())
    }
}

// ============================================================================
// Constraint Validation
// ============================================================================

impl Constraint {
    /// Validate a value against this constraint.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            Constraint::NonNegative => {
                if let Some(num) = value.as_float() {
                    if num < 0.0 {
                        return Err(format!("Value {} must be non-negative", num));
                    }
                }
            }

            Constraint::OneOf(options) => {
                if !options.contains(value) {
                    return Err(format!("{} is not one of the allowed options", value));
                }
            }
        }

        Ok(())
    }
}
