#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Helpers for turning local `$ref` strings (`#/components/{section}/{name}`)
//! into component names. External documents are never followed.

use percent_encoding::percent_decode_str;

/// Section holding reusable schemas.
pub const SCHEMAS_SECTION: &str = "schemas";

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
///
/// Returns `None` for external references, other sections, or empty names.
pub fn extract_component_name(ref_str: &str, section: &str) -> Option<String> {
    let pointer = ref_str.strip_prefix("#/")?;
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 {
        return None;
    }
    if segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Shorthand for [`extract_component_name`] in the `schemas` section.
pub fn extract_schema_name(ref_str: &str) -> Option<String> {
    extract_component_name(ref_str, SCHEMAS_SECTION)
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_schema_name() {
        assert_eq!(
            extract_schema_name("#/components/schemas/User").as_deref(),
            Some("User")
        );
    }

    #[test]
    fn test_extract_component_name_wrong_section() {
        assert!(extract_component_name("#/components/responses/Limit", "schemas").is_none());
        assert_eq!(
            extract_component_name("#/components/responses/Limit", "responses").as_deref(),
            Some("Limit")
        );
    }

    #[test]
    fn test_external_and_nested_refs_rejected() {
        assert!(extract_schema_name("other.yaml#/components/schemas/User").is_none());
        assert!(extract_schema_name("#/components/schemas/User/properties/id").is_none());
        assert!(extract_schema_name("#/components/schemas/").is_none());
    }

    #[test]
    fn test_decode_pointer_segment_percent_encoding() {
        let encoded = "User%20Profile~1details";
        let decoded = decode_pointer_segment(encoded);
        assert_eq!(decoded, "User Profile/details");
    }
}
