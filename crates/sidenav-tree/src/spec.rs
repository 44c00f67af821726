//! Author-facing sidebar specifications.
//!
//! A specification is loosely typed plain data: sequences mixing bare
//! document-id strings with category objects. It is kept as
//! [`serde_json::Value`] until [`build`](crate::build) normalizes it, so that
//! malformed entries can be reported with their exact position instead of
//! failing the whole parse.
//!
//! A sidebars file maps sidebar ids to specifications:
//!
//! ```json
//! {
//!   "docs": [
//!     "intro/overview",
//!     {"type": "category", "label": "Guides", "items": ["guides/setup"]}
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::SpecError;

/// Specification of one sidebar: an ordered sequence of raw entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SidebarSpec {
    items: Vec<Value>,
}

impl SidebarSpec {
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    /// Wrap a parsed value, which must be a sequence.
    ///
    /// # Errors
    ///
    /// Returns `SpecError::Shape` if `value` is not an array.
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        match value {
            Value::Array(items) => Ok(Self { items }),
            other => Err(SpecError::Shape(format!(
                "expected a sequence of entries, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Parse a single sidebar from a JSON array.
    pub fn from_json_str(content: &str) -> Result<Self, SpecError> {
        Self::from_value(serde_json::from_str(content)?)
    }

    /// Raw entries in render order.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }
}

impl From<Vec<Value>> for SidebarSpec {
    fn from(items: Vec<Value>) -> Self {
        Self::new(items)
    }
}

/// Specifications of every sidebar in one documentation version.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SidebarsSpec {
    sidebars: BTreeMap<String, SidebarSpec>,
}

impl SidebarsSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a sidebar.
    pub fn insert(&mut self, name: impl Into<String>, spec: SidebarSpec) {
        self.sidebars.insert(name.into(), spec);
    }

    /// Wrap a parsed value, which must map sidebar ids to sequences.
    ///
    /// # Errors
    ///
    /// Returns `SpecError::Shape` if `value` is not a map or any sidebar
    /// is not a sequence.
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        let Value::Object(map) = value else {
            return Err(SpecError::Shape(format!(
                "expected a map of sidebar ids to entries, found {}",
                value_kind(&value)
            )));
        };

        let mut sidebars = BTreeMap::new();
        for (name, items) in map {
            let spec = SidebarSpec::from_value(items)
                .map_err(|e| SpecError::Shape(format!("sidebar `{name}`: {e}")))?;
            sidebars.insert(name, spec);
        }
        Ok(Self { sidebars })
    }

    /// Parse a sidebars map from JSON.
    pub fn from_json_str(content: &str) -> Result<Self, SpecError> {
        Self::from_value(serde_json::from_str(content)?)
    }

    /// Parse a sidebars map from YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, SpecError> {
        Self::from_value(serde_yaml::from_str(content)?)
    }

    /// Parse a sidebars map from TOML.
    ///
    /// Each top-level key is a sidebar; mixed arrays of strings and inline
    /// tables are allowed.
    pub fn from_toml_str(content: &str) -> Result<Self, SpecError> {
        Self::from_value(toml::from_str(content)?)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SidebarSpec> {
        self.sidebars.get(name)
    }

    /// Sidebars ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SidebarSpec)> {
        self.sidebars.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sidebars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sidebars.is_empty()
    }
}

/// Human-readable name of a JSON value's type.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "an object",
    }
}
