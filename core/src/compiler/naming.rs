#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helper functions for deriving entity ids and human labels from paths, tags and property names.

use heck::{ToTitleCase, ToUpperCamelCase};

/// Converts tags and path segments (`user-accounts`, `user accounts`) to `UserAccounts`.
pub fn to_pascal_case(s: &str) -> String {
    s.to_upper_camel_case()
}

/// Very small English plural-to-singular conversion for resource segments.
///
/// `categories` -> `category`, `addresses` -> `address`, `users` -> `user`.
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    if let Some(stem) = word.strip_suffix("ses") {
        return format!("{}s", stem);
    }
    if word.len() > 1 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Human label for a property name: `createdAt` -> `Created At`.
pub fn humanize(name: &str) -> String {
    let label = name.to_title_case();
    if label.is_empty() {
        name.to_string()
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case_conversion() {
        assert_eq!(to_pascal_case("user accounts"), "UserAccounts");
        assert_eq!(to_pascal_case("user-profile"), "UserProfile");
        assert_eq!(to_pascal_case("widget"), "Widget");
        assert_eq!(to_pascal_case("Pets"), "Pets");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("widgets"), "widget");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("access"), "access");
        assert_eq!(singularize("s"), "s");
        assert_eq!(singularize("sheep"), "sheep");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("createdAt"), "Created At");
        assert_eq!(humanize("is_active"), "Is Active");
        assert_eq!(humanize("email"), "Email");
    }
}
