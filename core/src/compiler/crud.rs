#![deny(missing_docs)]

//! # CRUD Classification
//!
//! Maps an HTTP method on a path template to a CRUD action.
//!
//! A path whose last segment is a `{param}` is an *item path*,
//! anything else is a *collection path*.
//!
//! | Method      | Collection | Item     |
//! |-------------|------------|----------|
//! | GET         | `list`     | `read`   |
//! | POST        | `create`   | -        |
//! | PUT / PATCH | -          | `update` |
//! | DELETE      | -          | `delete` |

use crate::oas::document::HttpMethod;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five CRUD actions.
///
/// Declared alphabetically so ordered maps serialize keys alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudAction {
    /// POST on a collection.
    Create,
    /// DELETE on an item.
    Delete,
    /// GET on a collection.
    List,
    /// GET on an item.
    Read,
    /// PUT or PATCH on an item.
    Update,
}

impl CrudAction {
    /// Lower-case name as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrudAction::Create => "create",
            CrudAction::Delete => "delete",
            CrudAction::List => "list",
            CrudAction::Read => "read",
            CrudAction::Update => "update",
        }
    }
}

impl fmt::Display for CrudAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies `method` on `path`; `None` means the pair is discarded.
pub fn classify(method: HttpMethod, path: &str) -> Option<CrudAction> {
    let item = is_item_path(path);
    match (method, item) {
        (HttpMethod::Get, false) => Some(CrudAction::List),
        (HttpMethod::Get, true) => Some(CrudAction::Read),
        (HttpMethod::Post, false) => Some(CrudAction::Create),
        (HttpMethod::Put | HttpMethod::Patch, true) => Some(CrudAction::Update),
        (HttpMethod::Delete, true) => Some(CrudAction::Delete),
        _ => None,
    }
}

/// True when a segment is a `{param}` template.
pub fn is_templated(segment: &str) -> bool {
    segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}')
}

fn segments(path: &str) -> impl DoubleEndedIterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// True when the last segment of `path` is templated.
pub fn is_item_path(path: &str) -> bool {
    segments(path).next_back().is_some_and(is_templated)
}

/// The collection root of `path`: its first non-templated segment, prefixed with `/`.
///
/// `/accounts/{id}/users` -> `/accounts`. Paths made only of parameters yield `/`.
pub fn resource_path(path: &str) -> String {
    match segments(path).find(|s| !is_templated(s)) {
        Some(first) => format!("/{}", first),
        None => "/".to_string(),
    }
}

/// The last non-templated segment of `path`, used for fallback naming.
pub fn last_static_segment(path: &str) -> Option<&str> {
    segments(path).rev().find(|s| !is_templated(s))
}

/// True when `candidate` is more specific than `current`: shorter, or equally long and
/// lexicographically smaller.
pub fn is_narrower(candidate: &str, current: &str) -> bool {
    (candidate.len(), candidate) < (current.len(), current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        assert_eq!(classify(HttpMethod::Get, "/x"), Some(CrudAction::List));
        assert_eq!(classify(HttpMethod::Get, "/x/{id}"), Some(CrudAction::Read));
        assert_eq!(classify(HttpMethod::Post, "/x"), Some(CrudAction::Create));
        assert_eq!(classify(HttpMethod::Post, "/x/{id}"), None);
        assert_eq!(classify(HttpMethod::Put, "/x/{id}"), Some(CrudAction::Update));
        assert_eq!(classify(HttpMethod::Patch, "/x/{id}"), Some(CrudAction::Update));
        assert_eq!(classify(HttpMethod::Put, "/x"), None);
        assert_eq!(classify(HttpMethod::Delete, "/x/{id}"), Some(CrudAction::Delete));
        assert_eq!(classify(HttpMethod::Delete, "/x"), None);
        assert_eq!(classify(HttpMethod::Head, "/x"), None);
        assert_eq!(classify(HttpMethod::Options, "/x/{id}"), None);
    }

    #[test]
    fn test_item_path_detection() {
        assert!(is_item_path("/users/{id}"));
        assert!(is_item_path("/users/{id}/"));
        assert!(!is_item_path("/users/{id}/posts"));
        assert!(!is_item_path("/users"));
        assert!(!is_item_path("/"));
        assert!(!is_item_path("/users/{id}.json"));
    }

    #[test]
    fn test_resource_path() {
        assert_eq!(resource_path("/accounts/{id}/users"), "/accounts");
        assert_eq!(resource_path("/users/{id}"), "/users");
        assert_eq!(resource_path("/users/{id}/"), "/users");
        assert_eq!(resource_path("/users/"), "/users");
        assert_eq!(resource_path("/{tenant}/users"), "/users");
        assert_eq!(resource_path("/{id}"), "/");
    }

    #[test]
    fn test_last_static_segment() {
        assert_eq!(last_static_segment("/accounts/{id}/users/{userId}"), Some("users"));
        assert_eq!(last_static_segment("/{id}"), None);
        assert_eq!(last_static_segment(""), None);
    }

    #[test]
    fn test_narrowing_order() {
        assert!(is_narrower("/users", "/accounts"));
        assert!(is_narrower("/aaa", "/bbb"));
        assert!(!is_narrower("/bbb", "/aaa"));
        assert!(!is_narrower("/users", "/users"));
    }

    #[test]
    fn test_action_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CrudAction::Update).unwrap(), "\"update\"");
    }
}
