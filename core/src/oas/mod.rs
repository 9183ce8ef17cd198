#![deny(missing_docs)]

//! # OpenAPI Parsing Module
//!
//! - **document**: Intermediate deserialization layer for the root document.
//! - **schema**: The Schema Object subset the compiler reads.
//! - **refs**: `$ref` string helpers.
//! - **resolver**: `$ref` following and `allOf` merging with cycle protection.

pub mod document;
pub mod refs;
pub mod resolver;
pub mod schema;

pub use document::{Components, Document, HttpMethod, Operation, PathItem, RefOr};
pub use resolver::{RefChain, Resolved, SchemaResolver};
pub use schema::{JsonSchema, SchemaType};
