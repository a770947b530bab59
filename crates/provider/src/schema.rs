//! Attribute schemas for the managed resource types.
//!
//! A [`ResourceSchema`] declares which attributes a record carries, whether
//! the user must supply them, their defaults, and which values are allowed.
//! Handlers call [`ResourceSchema::apply_defaults`] and
//! [`ResourceSchema::validate`] before issuing any remote call, so a bad enum
//! value never reaches the API.

use crate::errors::{ProviderError, Result};
use crate::record::ResourceData;

/// How an attribute's value is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Must be supplied and non-empty.
    Required,
    /// May be omitted; `default` is used when it is.
    Optional {
        /// Value applied when the attribute is unset.
        default: Option<&'static str>,
    },
    /// Set only by the provider (e.g. `etag`).
    Computed,
}

/// Declaration of a single record attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as stored in the record.
    pub name: &'static str,
    /// Required / optional / computed.
    pub kind: AttributeKind,
    /// Any change to this attribute forces delete + recreate.
    pub force_new: bool,
    /// Closed set of accepted values, if constrained.
    pub allowed: Option<&'static [&'static str]>,
}

impl Attribute {
    /// A required string attribute.
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            kind: AttributeKind::Required,
            force_new: false,
            allowed: None,
        }
    }

    /// An optional string attribute with an optional default.
    pub const fn optional(name: &'static str, default: Option<&'static str>) -> Self {
        Self {
            name,
            kind: AttributeKind::Optional { default },
            force_new: false,
            allowed: None,
        }
    }

    /// A provider-computed, read-only attribute.
    pub const fn computed(name: &'static str) -> Self {
        Self {
            name,
            kind: AttributeKind::Computed,
            force_new: false,
            allowed: None,
        }
    }

    /// Marks the attribute as forcing replacement on change.
    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Restricts the attribute to a fixed set of values.
    pub const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = Some(values);
        self
    }
}

/// Attribute declarations for one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSchema {
    /// Resource type name, e.g. `github_team`.
    pub type_name: &'static str,
    /// Declared attributes.
    pub attributes: &'static [Attribute],
}

impl ResourceSchema {
    /// Looks up an attribute declaration by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Fills unset optional attributes with their defaults.
    pub fn apply_defaults(&self, d: &mut ResourceData) {
        for attr in self.attributes {
            if let AttributeKind::Optional { default } = attr.kind {
                if !d.contains(attr.name) {
                    d.set(attr.name, default.unwrap_or(""));
                }
            }
        }
    }

    /// Checks required attributes and enumerated values.
    ///
    /// Computed attributes are not checked; they are owned by the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingAttribute`] for an empty required
    /// attribute and [`ProviderError::InvalidAttribute`] for a value outside
    /// its allowed set.
    pub fn validate(&self, d: &ResourceData) -> Result<()> {
        for attr in self.attributes {
            let value = d.get(attr.name);
            match attr.kind {
                AttributeKind::Computed => continue,
                AttributeKind::Required if value.is_empty() => {
                    return Err(ProviderError::MissingAttribute {
                        attribute: attr.name.to_string(),
                    });
                }
                _ => {}
            }
            if let Some(allowed) = attr.allowed {
                if !allowed.contains(&value) {
                    return Err(ProviderError::InvalidAttribute {
                        attribute: attr.name.to_string(),
                        value: value.to_string(),
                        message: format!("expected one of {allowed:?}"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if every non-computed attribute forces replacement,
    /// i.e. the resource has no in-place update path.
    pub fn is_immutable(&self) -> bool {
        self.attributes
            .iter()
            .filter(|a| a.kind != AttributeKind::Computed)
            .all(|a| a.force_new)
    }
}
