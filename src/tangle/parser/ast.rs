//! Document tree definitions for the tangle format
//!
//! A parsed document is an ordered sequence of nodes; each node carries a
//! name, positional values, keyed properties, optional children, and a
//! parallel record of the `(type)` tags seen on its name and entries. The
//! tree is built bottom-up during a single parse call and handed to the
//! caller by value; nothing in the crate retains or mutates it afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A complete tangle document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Top-level nodes in source order
    pub nodes: Vec<Node>,
}

/// A named node with values, properties, children, and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node name, never empty
    pub name: String,
    /// Positional values in source order
    pub values: Vec<Value>,
    /// Keyed properties; a repeated key overwrites the earlier binding
    pub properties: HashMap<String, Value>,
    /// Child nodes from the `{ ... }` block, if any
    pub children: Vec<Node>,
    /// Tags attached to the name, values, and properties
    pub tags: Tags,
}

impl Node {
    /// Create an empty node with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            values: Vec::new(),
            properties: HashMap::new(),
            children: Vec::new(),
            tags: Tags::default(),
        }
    }

    /// Get the first child with the given name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Get a property value by key
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Tag annotations for one node, parallel to its other fields.
///
/// `values` is aligned index-for-index with [`Node::values`]; `properties`
/// holds one entry per property key (None when the value was untagged).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tags {
    /// Tag on the node name, e.g. `(author)node`
    pub name: Option<String>,
    /// Tag per positional value, e.g. `(u8)255`
    pub values: Vec<Option<String>>,
    /// Tag per property value, e.g. `key=(u8)255`
    pub properties: HashMap<String, Option<String>>,
}

/// A literal value carried by a node entry.
///
/// Numeric variants keep the source spelling alongside the parsed value so
/// bases, digit separators, and exponent form survive the round trip to a
/// downstream serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Integer { value: i64, repr: String },
    Float { value: f64, repr: String },
    Bool(bool),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The literal source spelling for numeric values
    pub fn repr(&self) -> Option<&str> {
        match self {
            Value::Integer { repr, .. } | Value::Float { repr, .. } => Some(repr),
            _ => None,
        }
    }
}
