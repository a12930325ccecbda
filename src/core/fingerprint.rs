//! Structural hashing of parameter maps.
//!
//! Produces the fingerprint a node reports to the host's re-execution memo.
//! Keys are visited in sorted order so the result does not depend on
//! `HashMap` iteration order.

use crate::core::types::Value;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Hash a parameter map into a stable 64-bit fingerprint.
pub fn fingerprint(parameters: &HashMap<String, Value>) -> u64 {
    let mut hasher = DefaultHasher::new();

    let mut sorted_keys: Vec<_> = parameters.keys().collect();
    sorted_keys.sort();

    for key in sorted_keys {
        key.hash(&mut hasher);
        if let Some(value) = parameters.get(key) {
            hash_value(value, &mut hasher);
        }
    }

    hasher.finish()
}

fn hash_value<H: Hasher>(value: &Value, hasher: &mut H) {
    std::mem::discriminant(value).hash(hasher);

    match value {
        Value::Integer(i) => i.hash(hasher),
        Value::Float(f) => f.to_bits().hash(hasher),
        Value::String(s) => s.hash(hasher),
        Value::Boolean(b) => b.hash(hasher),
        Value::Array(arr) => {
            arr.len().hash(hasher);
            for v in arr {
                hash_value(v, hasher);
            }
        }
        // Tensors hash by shape only
        Value::Image(img) => img.shape().hash(hasher),
        Value::Mask(mask) => mask.shape().hash(hasher),
        Value::None => {}
    }
}
