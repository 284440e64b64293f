use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::OnceCell;
use serde_json::Value;

use super::SchemaLocation;
use crate::model::TypeRef;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// A resolved piece of schema content, identified by its location.
///
/// Nodes form a tree through their parent links: a node resolved from a
/// fragment points at the node whose content the fragment was found in.
/// The synthesized type is written at most once; the first writer wins.
#[derive(Debug)]
pub struct SchemaNode {
    key: u64,
    location: Option<SchemaLocation>,
    content: Value,
    parent: Option<Arc<SchemaNode>>,
    id: OnceCell<Option<String>>,
    synthesized: OnceCell<TypeRef>,
}

impl SchemaNode {
    pub fn new(
        id: Option<String>,
        location: Option<SchemaLocation>,
        content: Value,
        parent: Option<Arc<SchemaNode>>,
    ) -> Self {
        let id_cell = OnceCell::new();
        if let Some(id) = id {
            let _ = id_cell.set(Some(id));
        }
        Self {
            key: NEXT_KEY.fetch_add(1, Ordering::Relaxed),
            location,
            content,
            parent,
            id: id_cell,
            synthesized: OnceCell::new(),
        }
    }

    pub fn location(&self) -> Option<&SchemaLocation> {
        self.location.as_ref()
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    pub fn parent(&self) -> Option<&Arc<SchemaNode>> {
        self.parent.as_ref()
    }

    /// The explicit id, else the content's `"id"`, else the parent's id.
    pub fn id(&self) -> Option<&str> {
        self.id
            .get_or_init(|| {
                match self.content.get("id").and_then(Value::as_str) {
                    Some(id) => Some(id.to_string()),
                    None => self.parent.as_ref().and_then(|p| p.id().map(str::to_string)),
                }
            })
            .as_deref()
    }

    pub fn synthesized_type(&self) -> Option<&TypeRef> {
        self.synthesized.get()
    }

    /// Record `ty` unless a type was already recorded. Returns the recorded type.
    pub fn set_synthesized_if_empty(&self, ty: TypeRef) -> &TypeRef {
        self.synthesized.get_or_init(|| ty)
    }

    pub fn is_generated(&self) -> bool {
        self.synthesized.get().is_some()
    }

    /// The topmost ancestor of this node.
    pub fn root(self: &Arc<Self>) -> Arc<SchemaNode> {
        let mut current = self;
        while let Some(parent) = &current.parent {
            current = parent;
        }
        Arc::clone(current)
    }

    pub(crate) fn key(&self) -> u64 {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Scalar, ScalarKind};
    use serde_json::json;

    #[test]
    fn test_id_inherited_from_parent() {
        let root = Arc::new(SchemaNode::new(None, None, json!({"id": "urn:root"}), None));
        let child = Arc::new(SchemaNode::new(None, None, json!({}), Some(Arc::clone(&root))));
        assert_eq!(child.id(), Some("urn:root"));
        assert!(Arc::ptr_eq(&child.root(), &root));
    }

    #[test]
    fn test_explicit_id_wins() {
        let node = SchemaNode::new(Some("urn:explicit".into()), None, json!({"id": "urn:content"}), None);
        assert_eq!(node.id(), Some("urn:explicit"));
    }

    #[test]
    fn test_first_synthesized_type_wins() {
        let node = SchemaNode::new(None, None, json!({}), None);
        assert!(!node.is_generated());
        node.set_synthesized_if_empty(TypeRef::Any);
        let kept = node.set_synthesized_if_empty(TypeRef::Scalar(Scalar::boxed(ScalarKind::String)));
        assert_eq!(kept, &TypeRef::Any);
        assert!(node.is_generated());
    }
}
