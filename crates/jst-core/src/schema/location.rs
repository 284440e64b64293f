use std::fmt;

use url::Url;

use super::pointer;
use super::source::{DocumentSource, scheme_of};
use crate::error::ResolveErrorKind;

/// Canonical identity of a schema node: the absolute document it lives in
/// plus an optional JSON Pointer fragment. Nodes that only exist in memory
/// have no document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaLocation {
    document: Option<Url>,
    fragment: Option<String>,
}

impl SchemaLocation {
    pub fn new(document: Option<Url>, fragment: Option<String>) -> Self {
        let document = document.map(|mut url| {
            url.set_fragment(None);
            url
        });
        let fragment = fragment.filter(|f| !f.is_empty());
        Self { document, fragment }
    }

    /// Location of a whole document.
    pub fn document(url: Url) -> Self {
        Self::new(Some(url), None)
    }

    /// Interpret `reference` with no base location.
    pub fn standalone(
        reference: &str,
        source: &dyn DocumentSource,
    ) -> Result<Self, ResolveErrorKind> {
        let (document, fragment) = split_reference(reference)?;
        let document = match document {
            "" => None,
            path => Some(source.locate(path)?),
        };
        Ok(Self::new(document, fragment))
    }

    /// Interpret `reference` relative to this location.
    pub fn join(
        &self,
        reference: &str,
        source: &dyn DocumentSource,
    ) -> Result<Self, ResolveErrorKind> {
        let (document, fragment) = split_reference(reference)?;
        let document = match (document, &self.document) {
            ("", base) => base.clone(),
            (path, Some(base)) if scheme_of(path).is_none() => Some(
                base.join(path)
                    .map_err(|e| ResolveErrorKind::InvalidReference(format!("{reference}: {e}")))?,
            ),
            (path, _) => Some(source.locate(path)?),
        };
        Ok(Self::new(document, fragment))
    }

    pub fn document_url(&self) -> Option<&Url> {
        self.document.as_ref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn without_fragment(&self) -> Self {
        Self {
            document: self.document.clone(),
            fragment: None,
        }
    }

    pub fn same_document(&self, other: &SchemaLocation) -> bool {
        self.document.is_some() && self.document == other.document
    }

    /// File name of the document without its extension.
    pub fn base_name(&self) -> Option<String> {
        let url = self.document.as_ref()?;
        let file = url.path_segments()?.next_back()?;
        let stem = file.split('.').next().unwrap_or(file);
        (!stem.is_empty()).then(|| stem.to_string())
    }

    /// The last token of the fragment, if any.
    pub fn fragment_tail(&self) -> Option<String> {
        self.fragment.as_deref().and_then(pointer::last_segment)
    }
}

impl fmt::Display for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(document) = &self.document {
            write!(f, "{document}")?;
        }
        match &self.fragment {
            Some(fragment) => write!(f, "#{fragment}"),
            None if self.document.is_none() => write!(f, "#"),
            None => Ok(()),
        }
    }
}

/// Split a reference into its document part and its pointer fragment.
fn split_reference(reference: &str) -> Result<(&str, Option<String>), ResolveErrorKind> {
    let (document, fragment) = match reference.split_once('#') {
        Some((document, fragment)) => (document, fragment),
        None => (reference, ""),
    };
    if !fragment.is_empty() && !fragment.starts_with('/') {
        return Err(ResolveErrorKind::InvalidReference(format!(
            "{reference}: fragment must be a JSON Pointer"
        )));
    }
    let fragment = (!fragment.is_empty()).then(|| fragment.to_string());
    Ok((document, fragment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MemorySource;

    fn base() -> SchemaLocation {
        SchemaLocation::document(Url::parse("file:///schemas/root/address.json").unwrap())
    }

    #[test]
    fn test_join_relative_document() {
        let joined = base().join("../shared/a.json#/definitions/x", &MemorySource::new()).unwrap();
        assert_eq!(joined.to_string(), "file:///schemas/shared/a.json#/definitions/x");
        assert_eq!(joined.fragment_tail(), Some("x".into()));
        assert_eq!(joined.base_name(), Some("a".into()));
    }

    #[test]
    fn test_join_fragment_only_keeps_document() {
        let joined = base().join("#/definitions/y", &MemorySource::new()).unwrap();
        assert!(joined.same_document(&base()));
        assert_eq!(joined.fragment(), Some("/definitions/y"));
    }

    #[test]
    fn test_join_absolute_url() {
        let joined = base().join("http://example.com/s.json", &MemorySource::new()).unwrap();
        assert_eq!(joined.document_url().unwrap().as_str(), "http://example.com/s.json");
        assert_eq!(joined.fragment(), None);
    }

    #[test]
    fn test_in_memory_fragment() {
        let loc = SchemaLocation::standalone("#/definitions/a", &MemorySource::new()).unwrap();
        assert!(loc.document_url().is_none());
        assert_eq!(loc.to_string(), "#/definitions/a");
    }

    #[test]
    fn test_rejects_non_pointer_fragment() {
        let err = base().join("#anchor", &MemorySource::new()).unwrap_err();
        assert!(matches!(err, ResolveErrorKind::InvalidReference(_)));
    }
}
