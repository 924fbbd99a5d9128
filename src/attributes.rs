//! Typed attribute side-table keyed by entity id
//!
//! Attributes (labels, coordinates, categories) never influence the
//! statistical core; they travel next to it for reporting and downstream
//! consumers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

/// Entity id -> attribute name -> value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityAttributes {
    entries: HashMap<String, BTreeMap<String, AttributeValue>>,
}

impl EntityAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` on `entity`, returning the previous value
    pub fn set(
        &mut self,
        entity: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.entries
            .entry(entity.into())
            .or_default()
            .insert(name.into(), value.into())
    }

    pub fn get(&self, entity: &str, name: &str) -> Option<&AttributeValue> {
        self.entries.get(entity)?.get(name)
    }

    /// Remove `name` from `entity`; entities without attributes are dropped
    pub fn remove(&mut self, entity: &str, name: &str) -> Option<AttributeValue> {
        let attributes = self.entries.get_mut(entity)?;
        let removed = attributes.remove(name);
        if attributes.is_empty() {
            self.entries.remove(entity);
        }
        removed
    }

    /// All attributes of `entity`, sorted by name
    pub fn entity(&self, entity: &str) -> Option<&BTreeMap<String, AttributeValue>> {
        self.entries.get(entity)
    }

    /// Number of entities carrying at least one attribute
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
