#![deny(missing_docs)]

//! # Mock CRUD Backend
//!
//! An in-memory store driven purely by a [`UiEntitySchema`]: it synthesizes
//! sample records from the field list, keys rows by the inferred primary key
//! and validates writes against field types, `required` and `enum`.
//!
//! Everything here is deterministic; sample timestamps count back from a fixed anchor.

use crate::error::{AppError, AppResult};
use crate::ui::{UiEntitySchema, UiField, UiFieldType, UiSchema};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A JSON object row.
pub type Record = Map<String, Value>;

/// 2024-01-01T00:00:00Z, the newest synthesized timestamp.
pub const TIMESTAMP_ANCHOR: i64 = 1_704_067_200;

const SECONDS_PER_DAY: i64 = 86_400;

fn anchored_timestamp(seed: usize) -> Option<DateTime<Utc>> {
    let offset = i64::try_from(seed).ok()?.checked_mul(SECONDS_PER_DAY)?;
    DateTime::from_timestamp(TIMESTAMP_ANCHOR.checked_sub(offset)?, 0)
}

/// Sample value for `field` in the `seed`-th synthesized row.
pub fn synthesize_value(field: &UiField, seed: usize) -> Value {
    let ordinal = seed + 1;
    match field.field_type {
        UiFieldType::Boolean => Value::Bool(seed % 2 == 0),
        UiFieldType::Integer => Value::from(ordinal * 7),
        UiFieldType::Number => Value::from(ordinal as f64 * 1.5),
        UiFieldType::String => {
            if let Some(values) = field.enum_values.as_ref().filter(|v| !v.is_empty()) {
                return Value::String(values[seed % values.len()].clone());
            }
            match field.format.as_deref() {
                Some("date-time") => anchored_timestamp(seed)
                    .map(|ts| Value::String(ts.to_rfc3339_opts(SecondsFormat::Secs, true)))
                    .unwrap_or(Value::Null),
                Some("date") => anchored_timestamp(seed)
                    .map(|ts| Value::String(ts.format("%Y-%m-%d").to_string()))
                    .unwrap_or(Value::Null),
                Some("email") => Value::String(format!("user{}@demo.local", ordinal)),
                _ => Value::String(format!("{}-{}", field.name, ordinal)),
            }
        }
        UiFieldType::Array | UiFieldType::Object | UiFieldType::Unknown => Value::Null,
    }
}

/// Sample row for `entity`; write-only fields are left out.
pub fn synthesize_record(entity: &UiEntitySchema, seed: usize) -> Record {
    let mut record: Record = entity
        .fields
        .iter()
        .filter(|f| !f.is_write_only())
        .map(|f| (f.name.clone(), synthesize_value(f, seed)))
        .collect();

    if let Some(pk) = &entity.primary_key {
        if !record.get(pk).is_some_and(Value::is_string) {
            record.insert(pk.clone(), Value::String((seed + 1).to_string()));
        }
    }
    record
}

/// Stable identifier of a row: its string primary key, else `{entity}:{index}`.
pub fn row_id(entity: &UiEntitySchema, record: &Record, index: usize) -> String {
    entity
        .primary_key
        .as_ref()
        .and_then(|pk| record.get(pk))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}:{}", entity.id, index))
}

fn type_matches(field_type: UiFieldType, value: &Value) -> bool {
    match field_type {
        UiFieldType::String => value.is_string(),
        UiFieldType::Number => value.is_number(),
        UiFieldType::Integer => value.is_i64() || value.is_u64(),
        UiFieldType::Boolean => value.is_boolean(),
        UiFieldType::Array => value.is_array(),
        UiFieldType::Object => value.is_object(),
        UiFieldType::Unknown => true,
    }
}

/// Checks `record` against the entity's fields.
///
/// Read-only fields are never demanded; `null` counts as absent. The primary
/// key also accepts a string, since rows are addressed by string ids.
pub fn validate_record(entity: &UiEntitySchema, record: &Record) -> AppResult<()> {
    let mut problems = Vec::new();
    let is_key = |field: &UiField| entity.primary_key.as_deref() == Some(field.name.as_str());

    for field in &entity.fields {
        let value = record.get(&field.name).filter(|v| !v.is_null());
        let Some(value) = value else {
            if field.required && !field.is_read_only() {
                problems.push(format!("'{}' is required", field.name));
            }
            continue;
        };

        if !type_matches(field.field_type, value) && !(is_key(field) && value.is_string()) {
            problems.push(format!(
                "'{}' must be of type {}",
                field.name,
                serde_json::to_value(field.field_type)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default()
            ));
            continue;
        }

        if let (Some(allowed), Some(text)) = (&field.enum_values, value.as_str()) {
            if !allowed.iter().any(|a| a == text) {
                problems.push(format!(
                    "'{}' must be one of [{}]",
                    field.name,
                    allowed.join(", ")
                ));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} record rejected: {}",
            entity.id,
            problems.join("; ")
        )))
    }
}

/// In-memory rows of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MockStore {
    entity: UiEntitySchema,
    rows: Vec<Record>,
    next_id: usize,
}

impl MockStore {
    /// An empty store.
    pub fn new(entity: UiEntitySchema) -> Self {
        Self {
            entity,
            rows: Vec::new(),
            next_id: 1,
        }
    }

    /// A store holding `count` synthesized rows.
    pub fn seeded(entity: UiEntitySchema, count: usize) -> Self {
        let rows = (0..count).map(|seed| synthesize_record(&entity, seed)).collect();
        Self {
            entity,
            rows,
            next_id: count + 1,
        }
    }

    /// The schema this store follows.
    pub fn entity(&self) -> &UiEntitySchema {
        &self.entity
    }

    /// All rows in insertion order.
    pub fn list(&self) -> &[Record] {
        &self.rows
    }

    fn position(&self, id: &str) -> AppResult<usize> {
        self.rows
            .iter()
            .enumerate()
            .position(|(index, row)| row_id(&self.entity, row, index) == id)
            .ok_or_else(|| AppError::NotFound(format!("{} '{}'", self.entity.id, id)))
    }

    /// The row identified by `id`.
    pub fn read(&self, id: &str) -> AppResult<&Record> {
        let index = self.position(id)?;
        Ok(&self.rows[index])
    }

    /// Next unused id from the monotonic counter; ids are never reissued.
    fn allocate_id(&mut self) -> String {
        loop {
            let id = self.next_id.to_string();
            self.next_id += 1;
            if self.position(&id).is_err() {
                return id;
            }
        }
    }

    /// Validates and appends `input`, assigning a primary key when it has none.
    ///
    /// A string key already taken by another row is rejected.
    pub fn create(&mut self, mut input: Record) -> AppResult<Record> {
        if let Some(pk) = self.entity.primary_key.clone() {
            if !input.get(&pk).is_some_and(Value::is_string) {
                let id = self.allocate_id();
                input.insert(pk, Value::String(id));
            }
        }
        validate_record(&self.entity, &input)?;

        let id = row_id(&self.entity, &input, self.rows.len());
        if self.position(&id).is_ok() {
            return Err(AppError::Validation(format!(
                "{} record rejected: '{}' already exists",
                self.entity.id, id
            )));
        }

        self.rows.push(input.clone());
        Ok(input)
    }

    /// Shallow-merges `input` into the row identified by `id`.
    pub fn update(&mut self, id: &str, input: Record) -> AppResult<Record> {
        let index = self.position(id)?;
        let mut next = self.rows[index].clone();
        next.extend(input);
        validate_record(&self.entity, &next)?;

        self.rows[index] = next.clone();
        Ok(next)
    }

    /// Removes and returns the row identified by `id`.
    pub fn delete(&mut self, id: &str) -> AppResult<Record> {
        let index = self.position(id)?;
        Ok(self.rows.remove(index))
    }
}

/// One [`MockStore`] per entity of a UI schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockBackend {
    stores: BTreeMap<String, MockStore>,
}

impl MockBackend {
    /// Seeds every entity of `schema` with `rows` synthesized records.
    pub fn seeded(schema: &UiSchema, rows: usize) -> Self {
        let stores = schema
            .entities
            .iter()
            .map(|(id, entity)| (id.clone(), MockStore::seeded(entity.clone(), rows)))
            .collect();
        Self { stores }
    }

    /// The store for `entity`.
    pub fn store(&self, entity: &str) -> AppResult<&MockStore> {
        self.stores
            .get(entity)
            .ok_or_else(|| AppError::NotFound(format!("entity '{}'", entity)))
    }

    /// The mutable store for `entity`.
    pub fn store_mut(&mut self, entity: &str) -> AppResult<&mut MockStore> {
        self.stores
            .get_mut(entity)
            .ok_or_else(|| AppError::NotFound(format!("entity '{}'", entity)))
    }

    /// Entity ids, alphabetical.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }
}
