use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde_json::Value;
use url::Url;

use super::pointer::resolve_fragment;
use super::source::{DocumentSource, FileSystemSource};
use super::{SchemaLocation, SchemaNode};
use crate::error::{FetchError, ResolveError, ResolveErrorKind};

type DocumentSlot = Arc<OnceCell<Arc<Value>>>;

/// Resolves references to schema nodes and caches every node it hands out,
/// so that a location resolves to the same node for the life of the store.
///
/// The store is safe to share between threads. Each document is fetched at
/// most once, even when several threads ask for it concurrently; when two
/// threads race to publish a node for the same location the first one wins
/// and both receive it.
pub struct SchemaStore {
    source: Box<dyn DocumentSource>,
    documents: Mutex<HashMap<Url, DocumentSlot>>,
    nodes: Mutex<HashMap<SchemaLocation, Arc<SchemaNode>>>,
    /// Fragment nodes of documents that have no location, keyed by the
    /// root node they were found under.
    inline: Mutex<HashMap<(u64, String), Arc<SchemaNode>>>,
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new(FileSystemSource::default())
    }
}

impl std::fmt::Debug for SchemaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaStore")
            .field("documents", &self.document_count())
            .field("nodes", &self.node_count())
            .finish()
    }
}

impl SchemaStore {
    pub fn new(source: impl DocumentSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            documents: Mutex::new(HashMap::new()),
            nodes: Mutex::new(HashMap::new()),
            inline: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &dyn DocumentSource {
        self.source.as_ref()
    }

    /// Create (or return the cached) node for a document location. A
    /// fragment in `location` selects a part of the document; the node is
    /// then parentless.
    pub fn create(&self, id: Option<String>, location: &str) -> Result<Arc<SchemaNode>, ResolveError> {
        let wrap = |kind| ResolveError::new(location, None, kind);
        let parsed = SchemaLocation::standalone(location, self.source()).map_err(wrap)?;
        self.create_at(id, &parsed).map_err(wrap)
    }

    /// Resolve `reference` relative to `source`.
    ///
    /// `"#"` is the source itself. Trailing `#`, `?`, `&` and `/` characters
    /// are ignored. Fragments are looked up in the source's content first and
    /// then in each ancestor's content in turn.
    pub fn resolve(
        &self,
        source: Option<&Arc<SchemaNode>>,
        reference: &str,
    ) -> Result<Arc<SchemaNode>, ResolveError> {
        if let Some(source) = source {
            if reference == "#" {
                return Ok(Arc::clone(source));
            }
        }
        let path = reference.trim_end_matches(['#', '?', '&', '/']);
        self.resolve_path(source, path).map_err(|kind| {
            ResolveError::new(reference, source.and_then(|s| s.location()), kind)
        })
    }

    /// Register content that did not come from the document source. With a
    /// location the content is also served as that document's text for later
    /// fragment lookups.
    pub fn register(
        &self,
        location: Option<&str>,
        content: Value,
    ) -> Result<Arc<SchemaNode>, ResolveError> {
        let Some(reference) = location else {
            return Ok(Arc::new(SchemaNode::new(None, None, content, None)));
        };
        let parsed = SchemaLocation::standalone(reference, self.source())
            .map_err(|kind| ResolveError::new(reference, None, kind))?;
        if let (Some(url), None) = (parsed.document_url(), parsed.fragment()) {
            let document = Arc::new(content.clone());
            self.documents
                .lock()
                .entry(url.clone())
                .or_insert_with(|| Arc::new(OnceCell::with_value(document)));
        }
        let node = SchemaNode::new(None, Some(parsed.clone()), content, None);
        Ok(self.publish(parsed, node))
    }

    /// Forget every document and node. Types recorded on previously returned
    /// nodes stay with those nodes.
    pub fn clear(&self) {
        self.documents.lock().clear();
        self.nodes.lock().clear();
        self.inline.lock().clear();
    }

    pub fn document_count(&self) -> usize {
        self.documents
            .lock()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.lock().len() + self.inline.lock().len()
    }

    fn resolve_path(
        &self,
        source: Option<&Arc<SchemaNode>>,
        path: &str,
    ) -> Result<Arc<SchemaNode>, ResolveErrorKind> {
        if path.is_empty() {
            return source
                .cloned()
                .ok_or_else(|| ResolveErrorKind::InvalidReference("empty reference".into()));
        }

        let base = source.and_then(|s| s.location());
        let location = match base {
            Some(base) => base.join(path, self.source())?,
            None => SchemaLocation::standalone(path, self.source())?,
        };

        if let Some(source) = source {
            let in_memory = base.is_none_or(|b| b.document_url().is_none());
            if in_memory && location.document_url().is_none() {
                return self.resolve_in_memory(source, &location);
            }
        }

        if let Some(node) = self.cached(&location) {
            trace!("Cache hit for {location}");
            return Ok(node);
        }

        let Some(fragment) = location.fragment() else {
            return self.create_at(None, &location);
        };
        let (parent, content) = match source {
            Some(source) if base.is_some_and(|b| b.same_document(&location)) => {
                match find_in_ancestors(source, fragment, &location) {
                    Ok(found) => found,
                    // A node created directly at a fragment has no ancestors;
                    // its siblings live in the document root.
                    Err(_) if base.is_some_and(|b| b.fragment().is_some()) => {
                        let root = self.create_at(None, &location.without_fragment())?;
                        find_in_ancestors(&root, fragment, &location)?
                    }
                    Err(err) => return Err(err),
                }
            }
            _ => {
                let document = self.create_at(None, &location.without_fragment())?;
                find_in_ancestors(&document, fragment, &location)?
            }
        };
        debug!("Resolved {location}");
        let node = SchemaNode::new(None, Some(location.clone()), content, Some(parent));
        Ok(self.publish(location, node))
    }

    /// Fragment references between nodes that have no document. The result
    /// is cached per root so repeated references yield the same node.
    fn resolve_in_memory(
        &self,
        source: &Arc<SchemaNode>,
        location: &SchemaLocation,
    ) -> Result<Arc<SchemaNode>, ResolveErrorKind> {
        let fragment = location.fragment().unwrap_or_default();
        let key = (source.root().key(), fragment.to_string());
        if let Some(node) = self.inline.lock().get(&key) {
            return Ok(Arc::clone(node));
        }

        let (_, content) = find_in_ancestors(source, fragment, location)?;
        let node = Arc::new(SchemaNode::new(
            source.id().map(str::to_string),
            Some(location.clone()),
            content,
            Some(Arc::clone(source)),
        ));
        Ok(Arc::clone(self.inline.lock().entry(key).or_insert(node)))
    }

    fn create_at(
        &self,
        id: Option<String>,
        location: &SchemaLocation,
    ) -> Result<Arc<SchemaNode>, ResolveErrorKind> {
        if let Some(node) = self.cached(location) {
            return Ok(node);
        }
        let Some(url) = location.document_url() else {
            return Err(ResolveErrorKind::InvalidReference(format!(
                "{location} has no document to read"
            )));
        };

        let document = self.document(url)?;
        let content = match location.fragment() {
            Some(fragment) => resolve_fragment(&document, fragment)
                .cloned()
                .ok_or_else(|| ResolveErrorKind::FragmentNotFound {
                    fragment: fragment.to_string(),
                    document: url.to_string(),
                })?,
            None => Value::clone(&document),
        };
        let node = SchemaNode::new(id, Some(location.clone()), content, None);
        Ok(self.publish(location.clone(), node))
    }

    fn document(&self, url: &Url) -> Result<Arc<Value>, FetchError> {
        let slot = Arc::clone(self.documents.lock().entry(url.clone()).or_default());
        slot.get_or_try_init(|| {
            debug!("Fetching {url}");
            self.source.fetch(url).map(Arc::new)
        })
        .cloned()
    }

    fn cached(&self, location: &SchemaLocation) -> Option<Arc<SchemaNode>> {
        self.nodes.lock().get(location).cloned()
    }

    fn publish(&self, location: SchemaLocation, node: SchemaNode) -> Arc<SchemaNode> {
        Arc::clone(
            self.nodes
                .lock()
                .entry(location)
                .or_insert_with(|| Arc::new(node)),
        )
    }
}

/// Look `fragment` up in `start` and then each of its ancestors. Returns the
/// node the fragment was found in together with the content found.
fn find_in_ancestors(
    start: &Arc<SchemaNode>,
    fragment: &str,
    location: &SchemaLocation,
) -> Result<(Arc<SchemaNode>, Value), ResolveErrorKind> {
    let mut current = Some(start);
    while let Some(node) = current {
        if let Some(content) = resolve_fragment(node.content(), fragment) {
            return Ok((Arc::clone(node), content.clone()));
        }
        trace!("Fragment {fragment} not in {:?}, trying parent", node.location());
        current = node.parent();
    }
    Err(ResolveErrorKind::FragmentNotFound {
        fragment: fragment.to_string(),
        document: location
            .document_url()
            .map_or_else(|| "<in-memory>".to_string(), ToString::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MemorySource;
    use serde_json::json;

    fn store_with(url: &str, document: Value) -> SchemaStore {
        SchemaStore::new(MemorySource::new().with(Url::parse(url).unwrap(), document))
    }

    #[test]
    fn test_create_is_cached() {
        let store = store_with("file:///a.json", json!({"type": "object"}));
        let first = store.create(None, "file:///a.json").unwrap();
        let second = store.create(None, "file:///a.json").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.document_count(), 1);
    }

    #[test]
    fn test_hash_is_identity() {
        let store = store_with("file:///a.json", json!({}));
        let node = store.create(None, "file:///a.json").unwrap();
        assert!(Arc::ptr_eq(&store.resolve(Some(&node), "#").unwrap(), &node));
        assert!(Arc::ptr_eq(&store.resolve(Some(&node), "#/").unwrap(), &node));
    }

    #[test]
    fn test_trailing_characters_ignored() {
        let store = store_with(
            "file:///a.json",
            json!({"definitions": {"b": {"type": "string"}}}),
        );
        let node = store.create(None, "file:///a.json").unwrap();
        let clean = store.resolve(Some(&node), "#/definitions/b").unwrap();
        let noisy = store.resolve(Some(&node), "#/definitions/b/?&").unwrap();
        assert!(Arc::ptr_eq(&clean, &noisy));
        assert!(Arc::ptr_eq(clean.parent().unwrap(), &node));
    }

    #[test]
    fn test_missing_fragment_reports_reference() {
        let store = store_with("file:///a.json", json!({}));
        let node = store.create(None, "file:///a.json").unwrap();
        let err = store.resolve(Some(&node), "#/definitions/nope").unwrap_err();
        assert_eq!(err.reference, "#/definitions/nope");
        assert!(matches!(err.kind, ResolveErrorKind::FragmentNotFound { .. }));
    }

    #[test]
    fn test_sibling_of_fragment_entry_point() {
        let store = store_with(
            "file:///d.json",
            json!({"definitions": {
                "a": {"type": "object", "extends": {"$ref": "#/definitions/b"}},
                "b": {"type": "object"}
            }}),
        );
        let a = store.create(None, "file:///d.json#/definitions/a").unwrap();
        assert!(a.parent().is_none());
        let b = store.resolve(Some(&a), "#/definitions/b").unwrap();
        assert_eq!(b.content(), &json!({"type": "object"}));

        let root = store.create(None, "file:///d.json").unwrap();
        assert!(Arc::ptr_eq(b.parent().unwrap(), &root));
        assert_eq!(store.document_count(), 1);
    }

    #[test]
    fn test_in_memory_fragment_searches_ancestors() {
        let store = SchemaStore::new(MemorySource::new());
        let root = store
            .register(None, json!({"definitions": {"a": {"type": "object"}, "b": {"type": "string"}}}))
            .unwrap();
        let a = store.resolve(Some(&root), "#/definitions/a").unwrap();
        let b = store.resolve(Some(&a), "#/definitions/b").unwrap();
        assert_eq!(b.content(), &json!({"type": "string"}));
        let again = store.resolve(Some(&root), "#/definitions/b").unwrap();
        assert!(Arc::ptr_eq(&b, &again));
    }

    #[test]
    fn test_clear_forgets_nodes() {
        let store = store_with("file:///a.json", json!({}));
        let first = store.create(None, "file:///a.json").unwrap();
        store.clear();
        assert_eq!(store.node_count(), 0);
        let second = store.create(None, "file:///a.json").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
