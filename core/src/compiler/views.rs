#![deny(missing_docs)]

//! # Primary Key & Default Views
//!
//! Derives the identifying field and the list/detail/form projections from an
//! entity's (alphabetical) field list.

use crate::ui::{FieldsView, ListView, UiField, UiViews};

/// Upper bound on table columns.
pub const MAX_LIST_COLUMNS: usize = 5;

/// Infers the primary key: `id`, else `_id`, else the alphabetically smallest
/// name ending in `id` (case-insensitive).
pub fn infer_primary_key(fields: &[UiField]) -> Option<String> {
    let has = |name: &str| fields.iter().any(|f| f.name == name);

    if has("id") {
        return Some("id".to_string());
    }
    if has("_id") {
        return Some("_id".to_string());
    }
    fields
        .iter()
        .map(|f| f.name.as_str())
        .filter(|name| name.to_lowercase().ends_with("id"))
        .min()
        .map(str::to_string)
}

/// Builds the default views for `fields` (already sorted by name).
pub fn build_views(fields: &[UiField], primary_key: Option<&str>) -> UiViews {
    UiViews {
        list: ListView {
            columns: list_columns(fields, primary_key),
        },
        detail: FieldsView {
            fields: fields.iter().map(|f| f.name.clone()).collect(),
        },
        form: FieldsView {
            fields: form_fields(fields, primary_key),
        },
    }
}

fn list_columns(fields: &[UiField], primary_key: Option<&str>) -> Vec<String> {
    let mut columns: Vec<String> = fields
        .iter()
        .filter(|f| !f.field_type.is_composite())
        .map(|f| f.name.clone())
        .collect();

    if let Some(pk) = primary_key {
        if let Some(pos) = columns.iter().position(|c| c == pk) {
            let key = columns.remove(pos);
            columns.insert(0, key);
        }
    }

    columns.truncate(MAX_LIST_COLUMNS);
    columns
}

fn form_fields(fields: &[UiField], primary_key: Option<&str>) -> Vec<String> {
    let editable = |f: &&UiField| {
        !f.is_read_only() && (primary_key != Some(f.name.as_str()) || f.required)
    };

    let required = fields.iter().filter(|f| f.required).filter(editable);
    let optional = fields.iter().filter(|f| !f.required).filter(editable);

    required.chain(optional).map(|f| f.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::UiFieldType;

    fn field(name: &str, field_type: UiFieldType, required: bool, read_only: bool) -> UiField {
        UiField {
            name: name.to_string(),
            label: name.to_string(),
            field_type,
            format: None,
            required,
            read_only: read_only.then_some(true),
            write_only: None,
            enum_values: None,
        }
    }

    fn names(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_primary_key_precedence() {
        let both = [
            field("_id", UiFieldType::String, false, false),
            field("id", UiFieldType::String, false, false),
        ];
        assert_eq!(infer_primary_key(&both).as_deref(), Some("id"));

        let underscore = [
            field("_id", UiFieldType::String, false, false),
            field("userId", UiFieldType::String, false, false),
        ];
        assert_eq!(infer_primary_key(&underscore).as_deref(), Some("_id"));

        let suffixed = [
            field("orderID", UiFieldType::String, false, false),
            field("customerId", UiFieldType::String, false, false),
            field("name", UiFieldType::String, false, false),
        ];
        assert_eq!(infer_primary_key(&suffixed).as_deref(), Some("customerId"));

        let none = [field("name", UiFieldType::String, false, false)];
        assert_eq!(infer_primary_key(&none), None);
    }

    #[test]
    fn test_form_excludes_read_only_and_optional_key() {
        let fields = [
            field("code", UiFieldType::String, false, false),
            field("id", UiFieldType::String, false, false),
            field("title", UiFieldType::String, true, false),
            field("updatedAt", UiFieldType::String, false, true),
        ];
        let views = build_views(&fields, Some("id"));
        assert_eq!(views.form.fields, names(&["title", "code"]));
    }

    #[test]
    fn test_form_keeps_required_key() {
        let fields = [
            field("name", UiFieldType::String, false, false),
            field("sku", UiFieldType::String, true, false),
        ];
        let views = build_views(&fields, Some("sku"));
        assert_eq!(views.form.fields, names(&["sku", "name"]));
    }

    #[test]
    fn test_list_columns_key_first_and_capped() {
        let fields = [
            field("a", UiFieldType::String, false, false),
            field("b", UiFieldType::Object, false, false),
            field("c", UiFieldType::Integer, false, false),
            field("d", UiFieldType::Array, false, false),
            field("e", UiFieldType::Boolean, false, false),
            field("f", UiFieldType::Number, false, false),
            field("g", UiFieldType::Unknown, false, false),
            field("key", UiFieldType::String, false, false),
        ];
        let views = build_views(&fields, Some("key"));
        assert_eq!(views.list.columns, names(&["key", "a", "c", "e", "f"]));
        assert_eq!(views.detail.fields.len(), fields.len());
    }

    #[test]
    fn test_composite_key_not_listed() {
        let fields = [
            field("id", UiFieldType::Object, false, false),
            field("name", UiFieldType::String, false, false),
        ];
        let views = build_views(&fields, Some("id"));
        assert_eq!(views.list.columns, names(&["name"]));
    }
}
