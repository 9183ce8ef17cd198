#![deny(missing_docs)]

//! # UIGen Core
//!
//! Compiles an already-parsed OpenAPI v3 document into a UI schema: the
//! entities an API exposes, their fields, their CRUD endpoints and default
//! list/detail/form layouts.
//!
//! ```
//! use uigen_core::compile_yaml_str;
//!
//! let ui = compile_yaml_str("openapi: 3.0.0\npaths: {}").unwrap();
//! assert_eq!(ui.version, 1);
//! assert!(ui.entities.is_empty());
//! ```

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) document model and schema resolution.
pub mod oas;

/// UI schema output model.
pub mod ui;

/// OpenAPI -> UI schema compilation.
pub mod compiler;

/// In-memory CRUD backend driven by a UI schema.
pub mod mock;

pub use compiler::crud::CrudAction;
pub use compiler::{compile_json_str, compile_ui_schema, compile_yaml_str};
pub use error::{AppError, AppResult};
pub use mock::{MockBackend, MockStore, Record};
pub use oas::{Document, JsonSchema};
pub use ui::{UiEndpoint, UiEntitySchema, UiField, UiFieldType, UiSchema, UiViews};
