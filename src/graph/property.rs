//! Property value types for nodes and relationships
//!
//! Values are tagged: every [`PropertyValue`] reports its [`ValueType`], and
//! property indexes use that tag to keep one value type per indexed key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Explicit type tag of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Integer,
    String,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Integer => write!(f, "Integer"),
            ValueType::String => write!(f, "String"),
        }
    }
}

/// Property value
///
/// Ordered (integers before strings) so it can key a `BTreeMap` index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Integer(i64),
    String(String),
}

impl PropertyValue {
    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            PropertyValue::Integer(_) => ValueType::Integer,
            PropertyValue::String(_) => ValueType::String,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<&PropertyValue> for PropertyValue {
    fn from(v: &PropertyValue) -> Self {
        v.clone()
    }
}

/// Key/value properties attached to a node or relationship
pub type PropertyBag = HashMap<String, PropertyValue>;
