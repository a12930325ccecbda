//! Core value types that flow between nodes.
//!
//! Values are a closed enum so ports can be type-checked by pattern matching
//! and serialized with serde for the host.

use crate::core::tensor::{ImageTensor, MaskTensor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Values that can be passed into or out of a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Normalized RGB image tensor `(1, H, W, 3)`
    Image(ImageTensor),
    /// Normalized mask tensor `(H, W)`
    Mask(MaskTensor),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Homogeneous list of values
    Array(Vec<Value>),
    /// Represents absence of value
    None,
}

/// Port types for type checking connections and parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "inner")]
pub enum PortType {
    Image,
    Mask,
    Integer,
    Float,
    String,
    Boolean,
    /// List of a specific type
    Array(Box<PortType>),
    /// Accepts any type
    Any,
}

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Get the port type of this value.
    pub fn get_type(&self) -> PortType {
        match self {
            Value::Image(_) => PortType::Image,
            Value::Mask(_) => PortType::Mask,
            Value::Integer(_) => PortType::Integer,
            Value::Float(_) => PortType::Float,
            Value::String(_) => PortType::String,
            Value::Boolean(_) => PortType::Boolean,
            Value::Array(arr) => match arr.first() {
                Some(first) => PortType::Array(Box::new(first.get_type())),
                None => PortType::Array(Box::new(PortType::Any)),
            },
            Value::None => PortType::Any,
        }
    }

    /// Try to get this value as an image tensor.
    pub fn as_image(&self) -> Option<&ImageTensor> {
        if let Value::Image(img) = self {
            Some(img)
        } else {
            None
        }
    }

    /// Try to get this value as a mask tensor.
    pub fn as_mask(&self) -> Option<&MaskTensor> {
        if let Value::Mask(mask) = self {
            Some(mask)
        } else {
            None
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    /// Integers are automatically converted to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Try to get this value as an array reference.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        if let Value::Array(arr) = self {
            Some(arr)
        } else {
            None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Image(img) => write!(f, "Image({}x{})", img.width(), img.height()),
            Value::Mask(mask) => write!(f, "Mask({}x{})", mask.width(), mask.height()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{:.4}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Array(arr) => write!(f, "Array[{}]", arr.len()),
            Value::None => write!(f, "None"),
        }
    }
}

// ============================================================================
// PortType Implementation
// ============================================================================

impl PortType {
    /// Check if a value matches this port type.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (PortType::Any, _) => true,
            (PortType::Image, Value::Image(_)) => true,
            (PortType::Mask, Value::Mask(_)) => true,
            (PortType::Integer, Value::Integer(_)) => true,
            (PortType::Float, Value::Float(_)) => true,
            // Integer can be used where float is expected
            (PortType::Float, Value::Integer(_)) => true,
            (PortType::String, Value::String(_)) => true,
            (PortType::Boolean, Value::Boolean(_)) => true,
            (PortType::Array(inner), Value::Array(arr)) => arr.iter().all(|v| inner.matches(v)),
            _ => false,
        }
    }

    /// Get a human-readable name for this type.
    pub fn display_name(&self) -> String {
        match self {
            PortType::Image => "Image".to_string(),
            PortType::Mask => "Mask".to_string(),
            PortType::Integer => "Integer".to_string(),
            PortType::Float => "Float".to_string(),
            PortType::String => "String".to_string(),
            PortType::Boolean => "Boolean".to_string(),
            PortType::Array(inner) => format!("Array<{}>", inner.display_name()),
            PortType::Any => "Any".to_string(),
        }
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
