//! Dynamically typed property values and override maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::EntityId;
use crate::error::{EcsError, Result};

/// A property value carried by a component, an override, or an event.
///
/// Values are hashable so they can key [`Manager`](crate::Manager) buckets.
/// Floats are deliberately absent for the same reason.
///
/// Serialized untagged. An entity reference is written as its UUID string,
/// so any UUID-shaped string reads back as [`Value::Entity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Reference to another entity (a relationship, not ownership).
    Entity(EntityId),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The string, if this is a `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The referenced entity, if this is an `Entity`.
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Value::Entity(id) => Some(*id),
            _ => None,
        }
    }

    /// The items, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Text(_) => "text",
            Value::Entity(_) => "entity",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
            Value::Entity(id) => write!(f, "{}", id),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<EntityId> for Value {
    fn from(value: EntityId) -> Self {
        Value::Entity(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// Named property values, ordered by name.
///
/// Used both for the overrides an [`Assemblage`](crate::Assemblage) stores and
/// for the ones a caller passes to `make`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, Value>);

impl Properties {
    /// Create an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name`, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Take `name` out of the map.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Property names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a bool, falling back to `default` when absent.
    pub fn bool_or(&self, component: &'static str, name: &str, default: bool) -> Result<bool> {
        self.typed(component, name, "bool", Value::as_bool)
            .map(|v| v.unwrap_or(default))
    }

    /// Read an integer, falling back to `default` when absent.
    pub fn int_or(&self, component: &'static str, name: &str, default: i64) -> Result<i64> {
        self.typed(component, name, "int", Value::as_int)
            .map(|v| v.unwrap_or(default))
    }

    /// Read a string, falling back to `default` when absent.
    pub fn text_or(&self, component: &'static str, name: &str, default: &str) -> Result<String> {
        self.typed(component, name, "text", |v| v.as_text().map(str::to_string))
            .map(|v| v.unwrap_or_else(|| default.to_string()))
    }

    /// Read an optional entity reference. `Null` reads as `None`.
    pub fn entity(&self, component: &'static str, name: &str) -> Result<Option<EntityId>> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.typed(component, name, "entity", Value::as_entity),
        }
    }

    /// Read a list of entity references; absent reads as empty.
    pub fn entity_list(&self, component: &'static str, name: &str) -> Result<Vec<EntityId>> {
        let Some(value) = self.get(name) else {
            return Ok(Vec::new());
        };
        let invalid = || EcsError::InvalidProperty {
            component,
            property: name.to_string(),
            expected: "list of entities",
        };
        value
            .as_list()
            .ok_or_else(invalid)?
            .iter()
            .map(|item| item.as_entity().ok_or_else(invalid))
            .collect()
    }

    fn typed<T>(
        &self,
        component: &'static str,
        name: &str,
        expected: &'static str,
        read: impl Fn(&Value) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => read(value).map(Some).ok_or_else(|| EcsError::InvalidProperty {
                component,
                property: name.to_string(),
                expected,
            }),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Properties {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
