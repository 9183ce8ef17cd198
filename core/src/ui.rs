#![deny(missing_docs)]

//! # UI Schema Model
//!
//! The compiler's output: a JSON-serializable description of entities, their
//! fields, their CRUD endpoints and default view layouts.
//!
//! Maps are `BTreeMap`s so serialized output is sorted and byte-stable.

use crate::compiler::crud::CrudAction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version discriminator written into every UI schema.
pub const UI_SCHEMA_VERSION: u32 = 1;

/// The root output value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSchema {
    /// Always [`UI_SCHEMA_VERSION`].
    pub version: u32,
    /// Entities keyed by id.
    pub entities: BTreeMap<String, UiEntitySchema>,
}

impl Default for UiSchema {
    fn default() -> Self {
        Self {
            version: UI_SCHEMA_VERSION,
            entities: BTreeMap::new(),
        }
    }
}

impl UiSchema {
    /// Looks up an entity by id.
    pub fn entity(&self, id: &str) -> Option<&UiEntitySchema> {
        self.entities.get(id)
    }
}

/// One inferred CRUD resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiEntitySchema {
    /// Stable key (PascalCase singular).
    pub id: String,
    /// Human label.
    pub title: String,
    /// Most specific collection path seen.
    pub resource_path: String,
    /// Identifying field, if one could be inferred.
    pub primary_key: Option<String>,
    /// Fields sorted by name.
    pub fields: Vec<UiField>,
    /// Endpoints by action.
    pub endpoints: BTreeMap<CrudAction, UiEndpoint>,
    /// Default layouts.
    pub views: UiViews,
}

impl UiEntitySchema {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&UiField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True when the backend declares `action`.
    pub fn supports(&self, action: CrudAction) -> bool {
        self.endpoints.contains_key(&action)
    }
}

/// A concrete operation backing a CRUD action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiEndpoint {
    /// Upper-case HTTP method.
    pub method: String,
    /// Path template.
    pub path: String,
    /// The operation's `operationId`, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

/// Field type vocabulary understood by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiFieldType {
    /// Text.
    String,
    /// Floating point.
    Number,
    /// Whole number.
    Integer,
    /// True/false.
    Boolean,
    /// List value.
    Array,
    /// Nested object.
    Object,
    /// Anything the compiler could not classify.
    Unknown,
}

impl UiFieldType {
    /// Maps a JSON Schema `type` keyword, if it names a scalar or array.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(UiFieldType::String),
            "number" => Some(UiFieldType::Number),
            "integer" => Some(UiFieldType::Integer),
            "boolean" => Some(UiFieldType::Boolean),
            "array" => Some(UiFieldType::Array),
            _ => None,
        }
    }

    /// Objects and arrays do not fit in a table cell.
    pub fn is_composite(&self) -> bool {
        matches!(self, UiFieldType::Object | UiFieldType::Array)
    }
}

/// One property of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiField {
    /// Property name.
    pub name: String,
    /// Human label.
    pub label: String,
    /// Value kind.
    #[serde(rename = "type")]
    pub field_type: UiFieldType,
    /// Format hint, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Listed in the parent's `required`.
    pub required: bool,
    /// Server-managed, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// Input-only, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,
    /// Allowed values, stringified and sorted.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl UiField {
    /// True when flagged `readOnly: true`.
    pub fn is_read_only(&self) -> bool {
        self.read_only == Some(true)
    }

    /// True when flagged `writeOnly: true`.
    pub fn is_write_only(&self) -> bool {
        self.write_only == Some(true)
    }
}

/// Default list/detail/form projections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiViews {
    /// Table layout.
    pub list: ListView,
    /// Read-only pane layout.
    pub detail: FieldsView,
    /// Create/edit form layout.
    pub form: FieldsView,
}

/// Columns shown in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListView {
    /// Field names, primary key first.
    pub columns: Vec<String>,
}

/// Fields shown in a pane or form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsView {
    /// Field names in display order.
    pub fields: Vec<String>,
}
