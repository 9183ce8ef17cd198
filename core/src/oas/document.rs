#![deny(missing_docs)]

//! # Document Model
//!
//! Intermediate deserialization layer for OpenAPI v3 documents.
//! Only the parts the UI compiler reads are modelled; everything else
//! (servers, security, callbacks, links, parameters) is ignored.

use crate::error::{AppError, AppResult};
use crate::oas::refs::extract_component_name;
use crate::oas::schema::JsonSchema;
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// HTTP methods a Path Item can declare, in walk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either an inline object or a `$ref` to a reusable component.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `{ $ref: '#/components/...' }`
    Ref {
        /// The reference string.
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// Inline definition.
    T(T),
}

/// A root OpenAPI document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    /// Raw version marker. Kept untyped because unquoted YAML (`openapi: 3.0`)
    /// yields a number.
    #[serde(default)]
    pub openapi: Option<Value>,

    /// Path templates and their operations.
    #[serde(default)]
    pub paths: Paths,

    /// Reusable components.
    #[serde(default)]
    pub components: Components,
}

impl Document {
    /// Parses a YAML (or JSON, which is a YAML subset) document.
    pub fn from_yaml_str(text: &str) -> AppResult<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))
    }

    /// Parses a JSON document.
    pub fn from_json_str(text: &str) -> AppResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))
    }

    /// Converts an already-parsed JSON value.
    pub fn from_value(value: Value) -> AppResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| AppError::Parse(format!("Failed to read OpenAPI document: {}", e)))
    }

    /// Reads a document from disk; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    /// The version marker as text, if present.
    pub fn version(&self) -> Option<String> {
        match self.openapi.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// The Paths Object, in declaration order.
///
/// Specification extensions (`x-...`) are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths {
    /// Path items keyed by template.
    pub items: IndexMap<String, PathItem>,
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<IndexMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        let mut items = IndexMap::new();

        for (key, value) in raw {
            if key.starts_with("x-") {
                continue;
            }
            let path_item = serde_json::from_value::<PathItem>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse path item '{}': {}", key, e))
            })?;
            items.insert(key, path_item);
        }

        Ok(Self { items })
    }
}

/// A Path Item: the operations available on one path template.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PathItem {
    /// GET operation.
    pub get: Option<Operation>,
    /// PUT operation.
    pub put: Option<Operation>,
    /// POST operation.
    pub post: Option<Operation>,
    /// DELETE operation.
    pub delete: Option<Operation>,
    /// OPTIONS operation.
    pub options: Option<Operation>,
    /// HEAD operation.
    pub head: Option<Operation>,
    /// PATCH operation.
    pub patch: Option<Operation>,
    /// TRACE operation.
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Declared operations in walk order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }
}

/// An Operation Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique operation identifier.
    pub operation_id: Option<String>,
    /// Grouping tags; only the first one is used for naming.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Request payload.
    pub request_body: Option<RefOr<RequestBody>>,
    /// Responses keyed by status code (or range such as `2XX`).
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
}

/// A Request Body Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBody {
    /// Payloads keyed by media type.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A Response Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Response {
    /// Human description.
    pub description: Option<String>,
    /// Payloads keyed by media type.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A Media Type Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaType {
    /// Payload schema.
    pub schema: Option<JsonSchema>,
}

/// The Components Object (the sections the compiler follows references into).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Named schemas.
    #[serde(default)]
    pub schemas: IndexMap<String, JsonSchema>,
    /// Named responses.
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    /// Named request bodies.
    #[serde(default)]
    pub request_bodies: IndexMap<String, RequestBody>,
}

impl Components {
    /// Looks up a named schema.
    pub fn schema(&self, name: &str) -> Option<&JsonSchema> {
        self.schemas.get(name)
    }

    /// Follows a response reference one level into `components.responses`.
    pub fn response<'a>(&'a self, item: &'a RefOr<Response>) -> Option<&'a Response> {
        match item {
            RefOr::T(response) => Some(response),
            RefOr::Ref { reference } => {
                let name = extract_component_name(reference, "responses")?;
                self.responses.get(&name)
            }
        }
    }

    /// Follows a request body reference one level into `components.requestBodies`.
    pub fn request_body<'a>(&'a self, item: &'a RefOr<RequestBody>) -> Option<&'a RequestBody> {
        match item {
            RefOr::T(body) => Some(body),
            RefOr::Ref { reference } => {
                let name = extract_component_name(reference, "requestBodies")?;
                self.request_bodies.get(&name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths_in_declaration_order() {
        let yaml = r#"
openapi: 3.0.3
paths:
  /zebras: { get: {} }
  x-internal: { note: ignored }
  /apples:
    post: { operationId: createApple }
    get: { operationId: listApples, tags: [fruit] }
"#;
        let doc = Document::from_yaml_str(yaml).unwrap();
        let keys: Vec<&str> = doc.paths.items.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["/zebras", "/apples"]);

        let apples = &doc.paths.items["/apples"];
        let methods: Vec<HttpMethod> = apples.operations().map(|(m, _)| m).collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);
        assert_eq!(apples.get.as_ref().unwrap().tags, vec!["fruit".to_string()]);
    }

    #[test]
    fn test_version_marker_forms() {
        let quoted = Document::from_yaml_str("openapi: '3.1.0'\npaths: {}").unwrap();
        assert_eq!(quoted.version().as_deref(), Some("3.1.0"));

        let numeric = Document::from_yaml_str("openapi: 3.1\npaths: {}").unwrap();
        assert_eq!(numeric.version().as_deref(), Some("3.1"));

        let missing = Document::from_yaml_str("paths: {}").unwrap();
        assert!(missing.version().is_none());
    }

    #[test]
    fn test_json_document() {
        let json = r#"{"openapi":"3.0.0","paths":{"/a":{"delete":{}}}}"#;
        let doc = Document::from_json_str(json).unwrap();
        assert!(doc.paths.items["/a"].delete.is_some());
    }

    #[test]
    fn test_component_references_followed() {
        let yaml = r#"
openapi: 3.0.0
paths:
  /users:
    post:
      requestBody: { $ref: '#/components/requestBodies/NewUser' }
      responses:
        '201': { $ref: '#/components/responses/UserCreated' }
        '400': { $ref: '#/components/responses/Missing' }
components:
  requestBodies:
    NewUser:
      content:
        application/json: { schema: { type: object } }
  responses:
    UserCreated:
      description: Created
"#;
        let doc = Document::from_yaml_str(yaml).unwrap();
        let op = doc.paths.items["/users"].post.as_ref().unwrap();

        let body = doc.components.request_body(op.request_body.as_ref().unwrap());
        assert!(body.unwrap().content.contains_key("application/json"));

        let created = doc.components.response(&op.responses["201"]).unwrap();
        assert_eq!(created.description.as_deref(), Some("Created"));
        assert!(doc.components.response(&op.responses["400"]).is_none());
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let err = Document::from_yaml_str("paths: [1, 2]").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
