use std::sync::Arc;

use serde_json::Value;

use super::Synthesizer;
use crate::error::SynthesisError;
use crate::model::{Container, TypeBuilder, TypeRef};
use crate::naming::singularize;
use crate::schema::SchemaNode;

impl<B: TypeBuilder> Synthesizer<'_, B> {
    /// Collections. The element type is declared at package level and named
    /// after the singular form of the array's name.
    pub(super) fn array_rule(
        &mut self,
        name: &str,
        content: &Value,
        container: &Container,
        schema: &Arc<SchemaNode>,
    ) -> Result<TypeRef, SynthesisError> {
        let unique = content
            .get("uniqueItems")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let element = match content.get("items") {
            Some(items) if items.is_object() => {
                let package = Container::Package(self.builder.package_of(container));
                let element_name = self
                    .reference_name(items, schema)?
                    .unwrap_or_else(|| singularize(name));
                self.synthesize(&element_name, items, &package, schema)?
            }
            _ => TypeRef::Any,
        };
        Ok(TypeRef::Array {
            element: Box::new(element),
            unique,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::config::GenerationConfig;
    use crate::model::{TypeBuilder, TypeModel, TypeRef};
    use crate::schema::{MemorySource, SchemaStore};
    use crate::synth::Synthesizer;

    #[test]
    fn test_object_items_get_singular_name() {
        let store = SchemaStore::new(MemorySource::new());
        let config = GenerationConfig::default();
        let mut model = TypeModel::new();
        let ty = Synthesizer::new(&store, &config, &mut model)
            .generate_from_value(
                "addresses",
                "com.example",
                json!({"type": "array", "items": {"type": "object", "properties": {"city": {"type": "string"}}}}),
            )
            .unwrap();

        let TypeRef::Array { element, unique } = ty else {
            panic!("expected array, got {ty:?}");
        };
        assert!(!unique);
        let class = model.class(element.as_class().unwrap());
        assert_eq!(class.name, "Address");
        assert_eq!(class.package, "com.example");
        assert!(class.outer.is_none());
    }

    #[test]
    fn test_unique_items_and_missing_items() {
        let store = SchemaStore::new(MemorySource::new());
        let config = GenerationConfig::default();
        let mut model = TypeModel::new();
        let ty = Synthesizer::new(&store, &config, &mut model)
            .generate_from_value("tags", "p", json!({"type": "array", "uniqueItems": true}))
            .unwrap();
        assert_eq!(
            ty,
            TypeRef::Array {
                element: Box::new(TypeRef::Any),
                unique: true
            }
        );
    }
}
