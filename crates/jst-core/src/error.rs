use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaLocation;

/// Failure to locate, retrieve, or parse a schema document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {message}")]
    Http { url: String, message: String },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("resource not found under any resource root: {0}")]
    ResourceNotFound(String),

    #[error("invalid location: {0}")]
    InvalidLocation(String),

    #[error("no document available at {0}")]
    NotFound(String),
}

/// The underlying cause of a failed reference resolution.
#[derive(Debug, Error)]
pub enum ResolveErrorKind {
    #[error("invalid reference format: {0}")]
    InvalidReference(String),

    #[error("fragment {fragment} not found in {document}")]
    FragmentNotFound { fragment: String, document: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A reference could not be resolved. Carries the reference as written and
/// the location it was resolved from.
#[derive(Debug, Error)]
#[error("failed to resolve reference `{reference}` from {origin}")]
pub struct ResolveError {
    pub reference: String,
    pub origin: String,
    #[source]
    pub kind: ResolveErrorKind,
}

impl ResolveError {
    pub fn new(reference: &str, origin: Option<&SchemaLocation>, kind: ResolveErrorKind) -> Self {
        Self {
            reference: reference.to_string(),
            origin: origin.map_or_else(|| "<in-memory>".to_string(), ToString::to_string),
            kind,
        }
    }
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("'extends' and 'extendsExternalType' defined simultaneously at {0}")]
    ConflictingSupertypes(String),

    #[error("oneOf definition at {0} is invalid, must be an array")]
    InvalidOneOf(String),

    #[error("unsupported oneOf variant at {location}: {reason}")]
    UnsupportedOneOfVariant {
        location: String,
        reason: &'static str,
    },

    #[error("nested fragment `{0}` cannot be mapped to a namespace")]
    NestedFragmentNamespace(String),

    #[error("circular reference detected: {0}")]
    CircularReference(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("no method named {0}")]
    UnknownMethod(String),

    #[error("{0} is not a mutator")]
    NotAMutator(String),

    #[error("no setter for property {0}")]
    NoSetter(String),
}
