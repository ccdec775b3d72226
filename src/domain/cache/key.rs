//! Cache key derivation

use std::fmt::Debug;

use serde_json::Value;

/// Separator between the request name and each field name/value
pub const KEY_DELIMITER: char = ':';

/// Trait for generating cache keys from key parameters
pub trait CacheKeyGenerator: Send + Sync + Debug {
    /// Generates a cache key from the given components
    fn generate(&self, params: &CacheKeyParams) -> String;
}

/// Parameters for cache key generation
///
/// Components keep insertion order, which for requests is the field
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKeyParams {
    /// Request type name
    pub primary: String,
    /// Field name/value pairs, in order
    pub components: Vec<(String, String)>,
}

impl CacheKeyParams {
    /// Creates new cache key parameters with a primary identifier
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            components: Vec::new(),
        }
    }

    /// Adds a component to the key parameters
    pub fn with_component(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.components.push((key.into(), value.into()));
        self
    }

    /// Builds parameters from a request name and its serialized fields
    ///
    /// `null` renders as an empty value. Arrays and nested objects are
    /// flattened to compact JSON.
    pub fn from_fields(primary: impl Into<String>, fields: &Value) -> Self {
        let mut params = Self::new(primary);

        match fields {
            Value::Null => {}
            Value::Object(map) => {
                for (name, value) in map {
                    params = params.with_component(name.as_str(), render_value(value));
                }
            }
            other => {
                params = params.with_component("value", render_value(other));
            }
        }

        params
    }

    /// Prefix shared by every key generated for this request name
    pub fn prefix(&self) -> String {
        key_prefix(&self.primary)
    }
}

/// Returns the prefix shared by every key of the named request
pub fn key_prefix(request_name: &str) -> String {
    format!("{}{}", escape(request_name), KEY_DELIMITER)
}

/// Default generator producing `Name:field1:value1:field2:value2`
#[derive(Debug, Clone, Default)]
pub struct DefaultKeyGenerator;

impl DefaultKeyGenerator {
    /// Creates a new default key generator
    pub fn new() -> Self {
        Self
    }
}

impl CacheKeyGenerator for DefaultKeyGenerator {
    fn generate(&self, params: &CacheKeyParams) -> String {
        let mut parts = Vec::with_capacity(params.components.len() * 2);

        for (k, v) in &params.components {
            parts.push(escape(k));
            parts.push(escape(v));
        }

        let separator = KEY_DELIMITER.to_string();
        format!("{}{}", params.prefix(), parts.join(separator.as_str()))
    }
}

/// Derives the cache key for a request from its name and serialized fields
pub fn derive_key(request_name: &str, fields: &Value) -> String {
    DefaultKeyGenerator.generate(&CacheKeyParams::from_fields(request_name, fields))
}

/// Renders a field value without its JSON type
///
/// Strings render bare and collections as compact JSON, so the string
/// `"[\"a\"]"` and the array `["a"]` render alike. Keys stay unambiguous
/// because a request type's fields have fixed types: one field never carries
/// a string in one request and a collection in another.
fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

// Keeps a value containing the delimiter from shifting the key structure.
fn escape(part: &str) -> String {
    if !part.contains(&['%', KEY_DELIMITER][..]) {
        return part.to_string();
    }

    part.replace('%', "%25").replace(KEY_DELIMITER, "%3A")
}
