#![deny(missing_docs)]

//! # Field Extraction
//!
//! Turns a resolved object schema into an alphabetical list of [`UiField`]s.

use crate::compiler::naming::humanize;
use crate::oas::document::Components;
use crate::oas::resolver::{RefChain, SchemaResolver};
use crate::oas::schema::JsonSchema;
use crate::ui::{UiField, UiFieldType};
use serde_json::Value;
use std::collections::BTreeSet;

/// One step of field typing; `None` defers to the next rule.
pub type TypingRule = fn(&JsonSchema) -> Option<UiFieldType>;

/// Field typing rules, evaluated in order; the first hit wins.
pub const TYPING_RULES: [(&str, TypingRule); 3] = [
    ("polymorphic", polymorphic_type),
    ("declared", declared_type),
    ("object-shaped", object_shaped_type),
];

/// `oneOf` / `anyOf` are never expanded.
pub fn polymorphic_type(schema: &JsonSchema) -> Option<UiFieldType> {
    schema.is_polymorphic().then_some(UiFieldType::Unknown)
}

/// `type` keyword naming a scalar or array.
pub fn declared_type(schema: &JsonSchema) -> Option<UiFieldType> {
    schema.type_name().and_then(UiFieldType::from_keyword)
}

/// `type: object` or any schema with `properties`.
pub fn object_shaped_type(schema: &JsonSchema) -> Option<UiFieldType> {
    schema.is_object_shaped().then_some(UiFieldType::Object)
}

/// Applies [`TYPING_RULES`] to an already resolved schema.
pub fn infer_field_type(schema: &JsonSchema) -> UiFieldType {
    TYPING_RULES
        .iter()
        .find_map(|(_, rule)| rule(schema))
        .unwrap_or(UiFieldType::Unknown)
}

/// Stringifies raw enum values, sorted and de-duplicated.
pub fn stringify_enum(values: &[Value]) -> Vec<String> {
    let mut out: Vec<String> = values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Extracts fields from schemas of one document.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor<'a> {
    resolver: SchemaResolver<'a>,
}

impl<'a> FieldExtractor<'a> {
    /// Creates an extractor over `components`.
    pub fn new(components: &'a Components) -> Self {
        Self {
            resolver: SchemaResolver::new(components),
        }
    }

    /// Fields of the component schema called `name`.
    pub fn extract_named(&self, name: &str) -> Vec<UiField> {
        let resolved = self.resolver.resolve_named(name);
        self.fields_of(&resolved.schema, resolved.chain)
    }

    /// Fields of an arbitrary (possibly inline or referencing) schema.
    pub fn extract(&self, schema: &JsonSchema) -> Vec<UiField> {
        let resolved = self.resolver.resolve(schema, RefChain::default());
        self.fields_of(&resolved.schema, resolved.chain)
    }

    fn fields_of(&self, schema: &JsonSchema, chain: RefChain) -> Vec<UiField> {
        if schema.is_array() {
            return match &schema.items {
                Some(items) => {
                    let resolved = self.resolver.resolve(items, chain);
                    self.fields_of(&resolved.schema, resolved.chain)
                }
                None => Vec::new(),
            };
        }
        if !schema.is_object_shaped() {
            return Vec::new();
        }

        let required: BTreeSet<&str> = schema.required.iter().map(String::as_str).collect();
        let mut names: Vec<&String> = schema.properties.keys().collect();
        names.sort();

        names
            .into_iter()
            .map(|name| {
                let property = self
                    .resolver
                    .resolve(&schema.properties[name], chain.clone())
                    .schema;
                build_field(name, &property, required.contains(name.as_str()))
            })
            .collect()
    }
}

fn build_field(name: &str, property: &JsonSchema, required: bool) -> UiField {
    UiField {
        name: name.to_string(),
        label: humanize(name),
        field_type: infer_field_type(property),
        format: property.format.clone(),
        required,
        read_only: property.read_only,
        write_only: property.write_only,
        enum_values: property.enum_values.as_deref().map(stringify_enum),
    }
}
