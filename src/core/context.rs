//! Execution and validation contexts.
//!
//! Contexts carry the parameter values the host supplies for one node
//! invocation, and collect the outputs the node produces.

use crate::core::error::{ExecutionError, NodeId, ValidationError};
use crate::core::types::{PortType, Value};
use std::collections::HashMap;

/// Context provided during node validation.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// ID of the node being validated.
    pub node_id: NodeId,
    /// Parameter values.
    parameters: HashMap<String, Value>,
}

impl ValidationContext {
    /// Create a new validation context.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            parameters: HashMap::new(),
        }
    }

    /// Add a parameter value to the context.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: Value) {
        self.parameters.insert(name.into(), value);
    }

    /// Get all parameters.
    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }

    /// Get a parameter value by name.
    pub fn get_parameter(&self, name: &str) -> Result<&Value, ValidationError> {
        self.parameters
            .get(name)
            .ok_or_else(|| ValidationError::MissingRequiredParameter {
                node_id: self.node_id,
                parameter: name.to_string(),
            })
    }

    /// Get a parameter as a boolean, `None` if absent.
    pub fn get_optional_bool(&self, name: &str) -> Result<Option<bool>, ValidationError> {
        match self.parameters.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| ValidationError::TypeMismatch {
                    expected: PortType::Boolean,
                    got: value.get_type(),
                }),
        }
    }

    /// Check if a parameter exists.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }
}

/// Context provided during node execution.
#[derive(Debug)]
pub struct ExecutionContext {
    /// ID of the node being executed.
    pub node_id: NodeId,
    /// Parameter values.
    parameters: HashMap<String, Value>,
    /// Output values set by the node.
    outputs: HashMap<String, Value>,
    /// Current progress (0.0 to 1.0).
    progress: f32,
}

impl ExecutionContext {
    /// Create a new execution context.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            parameters: HashMap::new(),
            outputs: HashMap::new(),
            progress: 0.0,
        }
    }

    /// Add a parameter value to the context.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: Value) {
        self.parameters.insert(name.into(), value);
    }

    /// Get all parameters.
    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }

    /// Get all outputs.
    pub fn outputs(&self) -> &HashMap<String, Value> {
        &self.outputs
    }

    /// Take ownership of all outputs.
    pub fn take_outputs(self) -> HashMap<String, Value> {
        self.outputs
    }

    // ========================================================================
    // Parameter Getters
    // ========================================================================

    /// Get a parameter value by name.
    pub fn get_parameter(&self, name: &str) -> Result<&Value, ExecutionError> {
        self.parameters
            .get(name)
            .ok_or_else(|| ExecutionError::MissingParameter {
                node_id: self.node_id,
                parameter: name.to_string(),
            })
    }

    /// Get a parameter as a string.
    pub fn get_string(&self, name: &str) -> Result<&str, ExecutionError> {
        self.get_parameter(name)?
            .as_string()
            .ok_or_else(|| self.type_error(name, PortType::String))
    }

    /// Get a parameter as an integer, `None` if absent.
    pub fn get_optional_integer(&self, name: &str) -> Result<Option<i64>, ExecutionError> {
        match self.parameters.get(name) {
            None | Some(Value::None) => Ok(None),
            Some(value) => value
                .as_integer()
                .map(Some)
                .ok_or_else(|| self.type_error(name, PortType::Integer)),
        }
    }

    /// Get a parameter as a boolean, `None` if absent.
    pub fn get_optional_bool(&self, name: &str) -> Result<Option<bool>, ExecutionError> {
        match self.parameters.get(name) {
            None | Some(Value::None) => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.type_error(name, PortType::Boolean)),
        }
    }

    /// Get a parameter as a string, `None` if absent.
    pub fn get_optional_string(&self, name: &str) -> Result<Option<&str>, ExecutionError> {
        match self.parameters.get(name) {
            None | Some(Value::None) => Ok(None),
            Some(value) => value
                .as_string()
                .map(Some)
                .ok_or_else(|| self.type_error(name, PortType::String)),
        }
    }

    fn type_error(&self, name: &str, expected: PortType) -> ExecutionError {
        ExecutionError::ParameterType {
            node_id: self.node_id,
            parameter: name.to_string(),
            expected,
        }
    }

    // ========================================================================
    // Output Setters
    // ========================================================================

    /// Set an output value.
    pub fn set_output(&mut self, name: impl Into<String>, value: Value) {
        self.outputs.insert(name.into(), value);
    }

    /// Check if an output has been set.
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    // ========================================================================
    // Progress
    // ========================================================================

    /// Set the current progress (0.0 to 1.0).
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    /// Get the current progress.
    pub fn progress(&self) -> f32 {
        self.progress
    }
}

/// Convert ValidationContext to ExecutionContext.
impl From<ValidationContext> for ExecutionContext {
    fn from(val_ctx: ValidationContext) -> Self {
        let mut exec_ctx = ExecutionContext::new(val_ctx.node_id);
        exec_ctx.parameters = val_ctx.parameters;
        exec_ctx
    }
}
