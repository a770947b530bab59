//! The declarative record for one managed resource instance.
//!
//! A record holds an identity plus a flat map of string attributes. An empty
//! identity means "this resource does not exist"; handlers clear it to tell
//! the host that a resource vanished out-of-band and must be recreated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Locally persisted desired/actual state for one resource instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

impl ResourceData {
    /// Creates an empty record with no identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record with the given identity and no attributes.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the identity; empty when the resource does not exist.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns `true` when the record has an identity.
    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }

    /// Replaces the identity.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Clears the identity, marking the resource as absent.
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    /// Returns an attribute value, or `""` when unset.
    pub fn get(&self, key: &str) -> &str {
        self.attributes.get(key).map(String::as_str).unwrap_or("")
    }

    /// Returns `true` if the attribute has been set, even to `""`.
    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Sets an attribute value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Iterates over all attributes in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
