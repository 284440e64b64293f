use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use jst_core::SchemaStore;
use jst_core::error::{FetchError, ResolveErrorKind};
use jst_core::schema::{DocumentSource, FileSystemSource};
use serde_json::{Value, json};
use url::Url;

/// Serves one fixed document and counts fetches.
struct CountingSource {
    fetches: Arc<AtomicUsize>,
}

impl DocumentSource for CountingSource {
    fn fetch(&self, _url: &Url) -> Result<Value, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(20));
        Ok(json!({"definitions": {"a": {"type": "string"}}}))
    }
}

#[test]
fn concurrent_creates_fetch_once() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let store = Arc::new(SchemaStore::new(CountingSource {
        fetches: Arc::clone(&fetches),
    }));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.create(None, "file:///shared.json").unwrap())
        })
        .collect();
    let nodes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert!(nodes.iter().all(|n| Arc::ptr_eq(n, &nodes[0])));
    assert_eq!(store.document_count(), 1);
}

#[test]
fn concurrent_fragment_resolution_agrees() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let store = Arc::new(SchemaStore::new(CountingSource {
        fetches: Arc::clone(&fetches),
    }));
    let root = store.create(None, "file:///shared.json").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let root = Arc::clone(&root);
            std::thread::spawn(move || store.resolve(Some(&root), "#/definitions/a").unwrap())
        })
        .collect();
    let nodes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(nodes.iter().all(|n| Arc::ptr_eq(n, &nodes[0])));
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn relative_references_follow_the_referring_document() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(
        dir.path().join("root.json"),
        r#"{"properties": {"child": {"$ref": "nested/child.json#/definitions/leaf"}}}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("nested/child.json"),
        r#"{"definitions": {"leaf": {"$ref": "../root.json"}}}"#,
    )
    .unwrap();

    let store = SchemaStore::new(FileSystemSource::default());
    let root = store
        .create(None, dir.path().join("root.json").to_str().unwrap())
        .unwrap();
    let leaf = store
        .resolve(Some(&root), "nested/child.json#/definitions/leaf")
        .unwrap();
    assert_eq!(leaf.content(), &json!({"$ref": "../root.json"}));
    assert_eq!(leaf.parent().unwrap().location().unwrap().base_name(), Some("child".into()));

    let back = store.resolve(Some(&leaf), "../root.json").unwrap();
    assert!(Arc::ptr_eq(&back, &root));
}

#[test]
fn resource_references_use_roots() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("shared.json"), r#"{"type": "string"}"#).unwrap();
    let store = SchemaStore::new(FileSystemSource::new(vec![dir.path().to_path_buf()]));

    let node = store.create(None, "resource:/shared.json").unwrap();
    assert_eq!(node.content(), &json!({"type": "string"}));
    let again = store.create(None, "classpath:shared.json").unwrap();
    assert!(Arc::ptr_eq(&node, &again));
}

#[test]
fn missing_document_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let store = SchemaStore::new(FileSystemSource::default());
    let missing = dir.path().join("missing.json");
    let err = store.create(None, missing.to_str().unwrap()).unwrap_err();
    assert!(matches!(
        err.kind,
        ResolveErrorKind::Fetch(FetchError::Io { .. })
    ));
}

#[test]
fn registered_documents_serve_fragments() {
    let store = SchemaStore::new(FileSystemSource::default());
    let root = store
        .register(
            Some("file:///virtual/doc.json"),
            json!({"definitions": {"x": {"type": "integer"}}}),
        )
        .unwrap();
    let x = store.resolve(Some(&root), "#/definitions/x").unwrap();
    assert_eq!(x.content(), &json!({"type": "integer"}));

    let direct = store.create(None, "file:///virtual/doc.json#/definitions/x").unwrap();
    assert!(Arc::ptr_eq(&direct, &x));
}
