//! Where schema documents come from.
//!
//! A [`DocumentSource`] turns a written reference into an absolute [`Url`]
//! and retrieves the parsed document behind it. [`FileSystemSource`] covers
//! the supported protocols (`file`, `http`, `https`, `resource`, `classpath`
//! and bare file paths); [`MemorySource`] serves documents held in memory.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;
use url::Url;

use crate::error::FetchError;

/// Schemes a reference may carry explicitly. Anything else is a file path.
pub const KNOWN_SCHEMES: [&str; 5] = ["file", "http", "https", "resource", "classpath"];

pub trait DocumentSource: Send + Sync {
    /// Turn a document reference (without fragment) into an absolute URL.
    fn locate(&self, reference: &str) -> Result<Url, FetchError> {
        locate_default(reference)
    }

    /// Retrieve and parse the document at `url`.
    fn fetch(&self, url: &Url) -> Result<Value, FetchError>;
}

/// The scheme of `reference`, if it is one of [`KNOWN_SCHEMES`].
pub fn scheme_of(reference: &str) -> Option<&'static str> {
    let (scheme, _) = reference.split_once(':')?;
    KNOWN_SCHEMES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(scheme))
        .copied()
}

fn locate_default(reference: &str) -> Result<Url, FetchError> {
    match scheme_of(reference) {
        Some("resource" | "classpath") => Err(FetchError::ResourceNotFound(reference.to_string())),
        Some(_) => Url::parse(reference).map_err(|e| FetchError::InvalidLocation(e.to_string())),
        None => locate_path(reference),
    }
}

fn locate_path(reference: &str) -> Result<Url, FetchError> {
    let path = Path::new(reference);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|source| FetchError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        cwd.join(path)
    };
    Url::from_file_path(&absolute).map_err(|()| FetchError::InvalidLocation(reference.to_string()))
}

/// Parse document text, choosing YAML for `.yaml`/`.yml` locations.
pub fn parse_document(text: &str, url: &Url) -> Result<Value, FetchError> {
    let path = url.path();
    if path.ends_with(".yaml") || path.ends_with(".yml") {
        Ok(serde_yaml_ng::from_str(text)?)
    } else {
        Ok(serde_json::from_str(text)?)
    }
}

/// Reads documents from disk and over HTTP. `resource:` and `classpath:`
/// references are looked up under the configured resource roots.
#[derive(Debug, Clone, Default)]
pub struct FileSystemSource {
    resource_roots: Vec<PathBuf>,
}

impl FileSystemSource {
    pub fn new(resource_roots: Vec<PathBuf>) -> Self {
        Self { resource_roots }
    }

    fn locate_resource(&self, reference: &str) -> Result<Url, FetchError> {
        let relative = reference
            .split_once(':')
            .map_or(reference, |(_, rest)| rest)
            .trim_start_matches('/');
        for root in &self.resource_roots {
            let candidate = root.join(relative);
            if candidate.is_file() {
                let absolute = std::fs::canonicalize(&candidate).map_err(|source| FetchError::Io {
                    path: candidate.clone(),
                    source,
                })?;
                return Url::from_file_path(&absolute)
                    .map_err(|()| FetchError::InvalidLocation(reference.to_string()));
            }
        }
        Err(FetchError::ResourceNotFound(reference.to_string()))
    }
}

impl DocumentSource for FileSystemSource {
    fn locate(&self, reference: &str) -> Result<Url, FetchError> {
        match scheme_of(reference) {
            Some("resource" | "classpath") => self.locate_resource(reference),
            _ => locate_default(reference),
        }
    }

    fn fetch(&self, url: &Url) -> Result<Value, FetchError> {
        debug!("Reading schema document {url}");
        let text = match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| FetchError::InvalidLocation(url.to_string()))?;
                std::fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source })?
            }
            "http" | "https" => ureq::get(url.as_str())
                .call()
                .map_err(|e| FetchError::Http {
                    url: url.to_string(),
                    message: e.to_string(),
                })?
                .into_string()
                .map_err(|e| FetchError::Http {
                    url: url.to_string(),
                    message: e.to_string(),
                })?,
            other => return Err(FetchError::InvalidLocation(format!("unsupported scheme {other}"))),
        };
        parse_document(&text, url)
    }
}

/// Serves documents registered up front. Useful for tests and for callers
/// that already hold their schemas.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: IndexMap<Url, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: Url, document: Value) {
        self.documents.insert(url, document);
    }

    pub fn with(mut self, url: Url, document: Value) -> Self {
        self.insert(url, document);
        self
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, url: &Url) -> Result<Value, FetchError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scheme_detection() {
        assert_eq!(scheme_of("http://example.com/a.json"), Some("http"));
        assert_eq!(scheme_of("RESOURCE:/a.json"), Some("resource"));
        assert_eq!(scheme_of("classpath:a.json"), Some("classpath"));
        assert_eq!(scheme_of("schemas/a.json"), None);
        assert_eq!(scheme_of("mailto:someone"), None);
    }

    #[test]
    fn test_locate_relative_path_is_absolute_file_url() {
        let url = FileSystemSource::default().locate("schemas/a.json").unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/schemas/a.json"));
    }

    #[test]
    fn test_resource_lookup_uses_roots() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"type": "string"}"#).unwrap();
        let source = FileSystemSource::new(vec![dir.path().to_path_buf()]);

        let url = source.locate("resource:/a.json").unwrap();
        assert_eq!(source.fetch(&url).unwrap(), json!({"type": "string"}));
        assert!(matches!(
            source.locate("classpath:missing.json"),
            Err(FetchError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn test_yaml_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.yaml");
        std::fs::write(&path, "type: object\nproperties:\n  name:\n    type: string\n").unwrap();
        let url = Url::from_file_path(&path).unwrap();

        let doc = FileSystemSource::default().fetch(&url).unwrap();
        assert_eq!(doc["properties"]["name"]["type"], "string");
    }

    #[test]
    fn test_memory_source_missing() {
        let source = MemorySource::new();
        let url = Url::parse("file:///nowhere.json").unwrap();
        assert!(matches!(source.fetch(&url), Err(FetchError::NotFound(_))));
    }
}
