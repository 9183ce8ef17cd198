#![deny(missing_docs)]

//! # Entity Resolution
//!
//! Walks every `(path, method)` pair, classifies it, decides which entity it
//! belongs to and folds the observations into per-entity drafts.
//!
//! Entity identity is decided by [`IDENTITY_STRATEGIES`], an ordered list of
//! fallbacks evaluated until one produces a name.

use crate::compiler::crud::{classify, is_narrower, last_static_segment, resource_path, CrudAction};
use crate::compiler::naming::{singularize, to_pascal_case};
use crate::oas::document::{Components, Document, HttpMethod, MediaType, Operation, RefOr, Response};
use crate::oas::refs::extract_schema_name;
use crate::oas::schema::JsonSchema;
use crate::ui::UiEndpoint;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Entity id used when nothing else can name an operation.
pub const FALLBACK_ENTITY: &str = "Entity";

/// A classified operation together with the document it came from.
#[derive(Debug, Clone, Copy)]
pub struct OperationContext<'a> {
    /// Path template.
    pub path: &'a str,
    /// HTTP method.
    pub method: HttpMethod,
    /// CRUD action the pair maps to.
    pub action: CrudAction,
    /// The operation object.
    pub operation: &'a Operation,
    /// Components used to follow response/request body references.
    pub components: &'a Components,
}

impl<'a> OperationContext<'a> {
    /// Schema of the preferred JSON payload of the preferred success response.
    pub fn response_schema(&self) -> Option<&'a JsonSchema> {
        let response = select_success_response(&self.operation.responses)?;
        let response = self.components.response(response)?;
        select_json_media(&response.content)?.schema.as_ref()
    }

    /// Schema of the preferred JSON payload of the request body.
    pub fn request_schema(&self) -> Option<&'a JsonSchema> {
        let body = self.operation.request_body.as_ref()?;
        let body = self.components.request_body(body)?;
        select_json_media(&body.content)?.schema.as_ref()
    }

    /// Component name referenced by the response, else by the request body.
    pub fn schema_name(&self) -> Option<String> {
        self.response_schema()
            .and_then(referenced_schema_name)
            .or_else(|| self.request_schema().and_then(referenced_schema_name))
    }
}

/// One identity rule; `None` defers to the next rule.
pub type IdentityStrategy = fn(&OperationContext<'_>) -> Option<String>;

/// Entity naming rules, evaluated in order; the first hit wins.
pub const IDENTITY_STRATEGIES: [(&str, IdentityStrategy); 4] = [
    ("response-schema", identity_from_response),
    ("request-schema", identity_from_request),
    ("tag", identity_from_tag),
    ("path", identity_from_path),
];

/// Name of the component the success response body references.
pub fn identity_from_response(ctx: &OperationContext<'_>) -> Option<String> {
    ctx.response_schema().and_then(referenced_schema_name)
}

/// Name of the component the request body references.
pub fn identity_from_request(ctx: &OperationContext<'_>) -> Option<String> {
    ctx.request_schema().and_then(referenced_schema_name)
}

/// First declared tag, PascalCased.
pub fn identity_from_tag(ctx: &OperationContext<'_>) -> Option<String> {
    let tag = ctx.operation.tags.first()?;
    let name = to_pascal_case(tag);
    (!name.is_empty()).then_some(name)
}

/// Last non-templated path segment, singular and PascalCased.
pub fn identity_from_path(ctx: &OperationContext<'_>) -> Option<String> {
    let name = last_static_segment(ctx.path)
        .map(|segment| to_pascal_case(&singularize(segment)))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_ENTITY.to_string());
    Some(name)
}

/// Applies [`IDENTITY_STRATEGIES`]; returns the id and the rule that produced it.
pub fn identify(ctx: &OperationContext<'_>) -> (String, &'static str) {
    IDENTITY_STRATEGIES
        .iter()
        .find_map(|(rule, strategy)| strategy(ctx).map(|id| (id, *rule)))
        .unwrap_or_else(|| (FALLBACK_ENTITY.to_string(), "fallback"))
}

/// The `$ref` name of `schema`, looking through one array level.
pub fn referenced_schema_name(schema: &JsonSchema) -> Option<String> {
    schema
        .unwrap_array()
        .reference
        .as_deref()
        .and_then(extract_schema_name)
}

fn success_code_regex() -> &'static Regex {
    static SUCCESS_RE: OnceLock<Regex> = OnceLock::new();
    SUCCESS_RE.get_or_init(|| Regex::new(r"^2(?:[0-9]{2}|XX|xx)$").expect("Invalid regex"))
}

/// Picks `200`, else the lexicographically first `2xx` key.
pub fn select_success_response<'a>(
    responses: &'a IndexMap<String, RefOr<Response>>,
) -> Option<&'a RefOr<Response>> {
    if let Some(ok) = responses.get("200") {
        return Some(ok);
    }
    responses
        .iter()
        .filter(|(code, _)| success_code_regex().is_match(code))
        .min_by(|a, b| a.0.cmp(b.0))
        .map(|(_, response)| response)
}

/// Selects the most appropriate content entry for JSON payloads.
///
/// Preference order:
/// 1. `application/json`
/// 2. `application/*+json` (e.g. `application/problem+json`), lexicographically first
/// 3. First declared media type, lexicographically
pub fn select_json_media(content: &IndexMap<String, MediaType>) -> Option<&MediaType> {
    if let Some(media) = content.get("application/json") {
        return Some(media);
    }

    let by_key = |a: &(&String, &MediaType), b: &(&String, &MediaType)| a.0.cmp(b.0);

    if let Some((_, media)) = content
        .iter()
        .filter(|(k, _)| k.starts_with("application/") && k.ends_with("+json"))
        .min_by(by_key)
    {
        return Some(media);
    }

    content.iter().min_by(by_key).map(|(_, media)| media)
}

/// Accumulated knowledge about one entity during the walk.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDraft<'a> {
    /// Entity id.
    pub id: String,
    /// Narrowest resource path seen so far.
    pub resource_path: String,
    /// Endpoints by action; later operations overwrite earlier ones.
    pub endpoints: BTreeMap<CrudAction, UiEndpoint>,
    /// First component schema name discovered.
    pub schema_name: Option<String>,
    /// Response/request payload schemas, in discovery order.
    pub candidates: Vec<&'a JsonSchema>,
}

impl<'a> EntityDraft<'a> {
    fn new(id: String, resource_path: String) -> Self {
        Self {
            id,
            resource_path,
            endpoints: BTreeMap::new(),
            schema_name: None,
            candidates: Vec::new(),
        }
    }

    /// Folds one classified operation into the draft.
    pub fn absorb(&mut self, ctx: &OperationContext<'a>) {
        let path = resource_path(ctx.path);
        if is_narrower(&path, &self.resource_path) {
            self.resource_path = path;
        }

        self.endpoints.insert(
            ctx.action,
            UiEndpoint {
                method: ctx.method.as_str().to_string(),
                path: ctx.path.to_string(),
                operation_id: ctx.operation.operation_id.clone(),
            },
        );

        if self.schema_name.is_none() {
            self.schema_name = ctx.schema_name();
        }

        self.candidates
            .extend(ctx.response_schema().into_iter().chain(ctx.request_schema()));
    }
}

/// Walks `document.paths` in declaration order, methods in fixed order,
/// yielding only pairs that classify to a CRUD action.
pub fn walk_operations(document: &Document) -> impl Iterator<Item = OperationContext<'_>> {
    let components = &document.components;
    document
        .paths
        .items
        .iter()
        .flat_map(move |(path, item)| {
            item.operations().filter_map(move |(method, operation)| {
                let Some(action) = classify(method, path) else {
                    tracing::debug!(%method, path = path.as_str(), "operation is not a CRUD action");
                    return None;
                };
                Some(OperationContext {
                    path: path.as_str(),
                    method,
                    action,
                    operation,
                    components,
                })
            })
        })
}

/// Groups every classified operation into entity drafts keyed by id.
///
/// The working map is local to the call; nothing survives it.
pub fn collect_entities(document: &Document) -> BTreeMap<String, EntityDraft<'_>> {
    walk_operations(document).fold(BTreeMap::new(), |mut drafts, ctx| {
        let (id, rule) = identify(&ctx);
        tracing::trace!(entity = id.as_str(), rule, action = %ctx.action, path = ctx.path, "operation merged");

        drafts
            .entry(id.clone())
            .or_insert_with(|| EntityDraft::new(id, resource_path(ctx.path)))
            .absorb(&ctx);
        drafts
    })
}
