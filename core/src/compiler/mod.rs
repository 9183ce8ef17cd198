#![deny(missing_docs)]

//! # UI Schema Compiler
//!
//! - **crud**: method/path classification.
//! - **naming**: id and label helpers.
//! - **entities**: the path walker and entity resolver.
//! - **fields**: field extraction from resolved schemas.
//! - **views**: primary key inference and default views.
//!
//! [`compile_ui_schema`] is a pure function of its input: it allocates its own
//! working state, never mutates the document and returns equal output for
//! equal input.

pub mod crud;
pub mod entities;
pub mod fields;
pub mod naming;
pub mod views;

use crate::error::{AppError, AppResult};
use crate::oas::document::Document;
use crate::ui::{UiEntitySchema, UiField, UiSchema, UI_SCHEMA_VERSION};
use entities::{collect_entities, EntityDraft};
use fields::FieldExtractor;
use naming::humanize;
use views::{build_views, infer_primary_key};

/// Compiles an OpenAPI v3 document into a UI schema.
///
/// # Errors
///
/// Returns [`AppError::UnsupportedVersion`] when the `openapi` marker is missing
/// or does not start with `3.`. Nothing else is an error: unusable operations,
/// payloads and references simply contribute nothing.
pub fn compile_ui_schema(document: &Document) -> AppResult<UiSchema> {
    ensure_openapi_v3(document)?;

    let extractor = FieldExtractor::new(&document.components);
    let entities = collect_entities(document)
        .into_iter()
        .map(|(id, draft)| (id, build_entity(draft, &extractor)))
        .collect();

    let schema = UiSchema {
        version: UI_SCHEMA_VERSION,
        entities,
    };
    tracing::info!(entities = schema.entities.len(), "compiled UI schema");
    Ok(schema)
}

/// Parses YAML (or JSON) text and compiles it.
pub fn compile_yaml_str(text: &str) -> AppResult<UiSchema> {
    compile_ui_schema(&Document::from_yaml_str(text)?)
}

/// Parses JSON text and compiles it.
pub fn compile_json_str(text: &str) -> AppResult<UiSchema> {
    compile_ui_schema(&Document::from_json_str(text)?)
}

/// Checks the version marker.
pub fn ensure_openapi_v3(document: &Document) -> AppResult<()> {
    match document.version() {
        Some(version) if version.starts_with("3.") => Ok(()),
        Some(version) => Err(AppError::UnsupportedVersion(format!(
            "expected an OpenAPI 3.x document, found version '{}'",
            version
        ))),
        None => Err(AppError::UnsupportedVersion(
            "missing 'openapi' version marker".into(),
        )),
    }
}

fn build_entity(draft: EntityDraft<'_>, extractor: &FieldExtractor<'_>) -> UiEntitySchema {
    let fields = entity_fields(&draft, extractor);
    let primary_key = infer_primary_key(&fields);
    let views = build_views(&fields, primary_key.as_deref());

    UiEntitySchema {
        title: humanize(&draft.id),
        id: draft.id,
        resource_path: draft.resource_path,
        primary_key,
        fields,
        endpoints: draft.endpoints,
        views,
    }
}

/// The named component schema if it yields fields, else the first candidate payload that does.
fn entity_fields(draft: &EntityDraft<'_>, extractor: &FieldExtractor<'_>) -> Vec<UiField> {
    draft
        .schema_name
        .as_deref()
        .map(|name| extractor.extract_named(name))
        .filter(|fields| !fields.is_empty())
        .or_else(|| {
            draft
                .candidates
                .iter()
                .map(|schema| extractor.extract(schema))
                .find(|fields| !fields.is_empty())
        })
        .unwrap_or_default()
}
