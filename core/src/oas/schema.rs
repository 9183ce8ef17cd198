#![deny(missing_docs)]

//! # JSON Schema Model
//!
//! The subset of the OpenAPI Schema Object the compiler reads.
//!
//! Deserialization is lenient: every keyword is read on its own, so a keyword
//! of an unexpected shape reads as absent instead of failing the document.
//! Boolean schemas (`true` / `false`) read as the empty schema.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The `type` keyword.
///
/// OAS 3.0 only allows a single string, OAS 3.1 also allows a list
/// such as `[string, "null"]`; a bare YAML `null` entry is kept as `None`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `type: string`
    Single(String),
    /// `type: [string, null]`
    Multiple(Vec<Option<String>>),
}

impl SchemaType {
    /// The effective type name: the single value, or the first non-null entry.
    pub fn primary(&self) -> Option<&str> {
        match self {
            SchemaType::Single(t) => Some(t.as_str()),
            SchemaType::Multiple(types) => types
                .iter()
                .flatten()
                .map(String::as_str)
                .find(|t| *t != "null"),
        }
    }
}

/// A (possibly partial) Schema Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    /// Reference to another schema, e.g. `#/components/schemas/User`.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Declared type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    /// Format hint (`date-time`, `email`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Allowed raw values.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// Object properties.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, JsonSchema>,

    /// Names of required properties.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Array element schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,

    /// Composition: every branch applies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<JsonSchema>,

    /// Polymorphism: exactly one branch applies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<JsonSchema>,

    /// Polymorphism: at least one branch applies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<JsonSchema>,

    /// Server-managed value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    /// Input-only value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,
}

impl<'de> Deserialize<'de> for JsonSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(JsonSchema::from_value)
    }
}

/// Removes `key` and reads it as `T`; a missing or ill-shaped value is `None`.
fn take<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = map.remove(key)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!(keyword = key, error = %e, "ignoring ill-shaped schema keyword");
            None
        }
    }
}

impl JsonSchema {
    /// Reads a schema node. Anything that is not an object (boolean schemas
    /// included) is the empty schema.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        Self {
            reference: take(&mut map, "$ref"),
            schema_type: take(&mut map, "type"),
            format: take(&mut map, "format"),
            enum_values: take(&mut map, "enum"),
            properties: take(&mut map, "properties").unwrap_or_default(),
            required: take(&mut map, "required").unwrap_or_default(),
            items: take(&mut map, "items"),
            all_of: take(&mut map, "allOf").unwrap_or_default(),
            one_of: take(&mut map, "oneOf").unwrap_or_default(),
            any_of: take(&mut map, "anyOf").unwrap_or_default(),
            read_only: take(&mut map, "readOnly"),
            write_only: take(&mut map, "writeOnly"),
        }
    }

    /// Builds a bare reference node.
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            ..Self::default()
        }
    }

    /// The effective `type` name, if declared.
    pub fn type_name(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(SchemaType::primary)
    }

    /// True for `type: array` or a schema that only declares `items`.
    pub fn is_array(&self) -> bool {
        self.type_name() == Some("array") || (self.schema_type.is_none() && self.items.is_some())
    }

    /// True for `type: object` or any schema declaring `properties`.
    pub fn is_object_shaped(&self) -> bool {
        self.type_name() == Some("object") || !self.properties.is_empty()
    }

    /// True when `oneOf` or `anyOf` is present.
    pub fn is_polymorphic(&self) -> bool {
        !self.one_of.is_empty() || !self.any_of.is_empty()
    }

    /// Unwraps one array level to its `items` schema.
    pub fn unwrap_array(&self) -> &JsonSchema {
        match &self.items {
            Some(items) if self.is_array() => items,
            _ => self,
        }
    }
}
