#![deny(missing_docs)]

//! # Document Sources
//!
//! Where an OpenAPI document comes from: a local file or, with the `client`
//! feature, a URL fetched over HTTP.

use std::fmt;
use std::path::PathBuf;

use uigen_core::Document;

use crate::error::{CliError, CliResult};

/// A location an OpenAPI document can be loaded from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A `.json`, `.yaml` or `.yml` file on disk.
    File(PathBuf),
    /// A document served over HTTP(S).
    #[cfg(feature = "client")]
    Url(String),
}

impl Source {
    /// Picks the source from the `--input`/`--url` pair.
    pub fn select(input: Option<&PathBuf>, url: Option<&str>) -> CliResult<Self> {
        match (input, url) {
            (Some(_), Some(_)) => Err(CliError::Usage(
                "--input and --url are mutually exclusive".into(),
            )),
            (Some(path), None) => Ok(Source::File(path.clone())),
            #[cfg(feature = "client")]
            (None, Some(url)) => Ok(Source::Url(url.to_string())),
            #[cfg(not(feature = "client"))]
            (None, Some(_)) => Err(CliError::Usage(
                "--url requires the 'client' feature".into(),
            )),
            (None, None) => Err(CliError::Usage(
                "an OpenAPI document is required (--input or UIGEN_INPUT)".into(),
            )),
        }
    }

    /// Reads and parses the document.
    pub fn load(&self) -> CliResult<Document> {
        tracing::debug!(source = %self, "loading OpenAPI document");
        match self {
            Source::File(path) => {
                if !path.exists() {
                    return Err(CliError::General(format!(
                        "OpenAPI file not found: {:?}",
                        path
                    )));
                }
                Ok(Document::from_path(path)?)
            }
            #[cfg(feature = "client")]
            Source::Url(url) => fetch(url),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            #[cfg(feature = "client")]
            Source::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(feature = "client")]
fn fetch(url: &str) -> CliResult<Document> {
    let mut response = ureq::get(url)
        .call()
        .map_err(|e| CliError::General(format!("Failed to fetch {}: {}", url, e)))?;
    let text = response
        .body_mut()
        .read_to_string()
        .map_err(|e| CliError::General(format!("Failed to read body of {}: {}", url, e)))?;

    let document = if url.ends_with(".json") {
        Document::from_json_str(&text)?
    } else {
        Document::from_yaml_str(&text)?
    };
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_select_requires_a_source() {
        let err = Source::select(None, None).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn test_select_rejects_both() {
        let path = PathBuf::from("api.yaml");
        let err = Source::select(Some(&path), Some("http://localhost/api.yaml")).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let source = Source::File(PathBuf::from("/definitely/not/here.yaml"));
        match source.load().unwrap_err() {
            CliError::General(msg) => assert!(msg.contains("not found")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api.json");
        fs::write(&path, r#"{ "openapi": "3.0.0", "paths": {} }"#).unwrap();

        let document = Source::File(path).load().unwrap();
        assert_eq!(document.version().as_deref(), Some("3.0.0"));
    }
}
