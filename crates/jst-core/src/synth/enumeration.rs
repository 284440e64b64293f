use serde_json::Value;

use super::{Synthesizer, text};
use crate::error::SynthesisError;
use crate::model::{Container, EnumMember, TypeBuilder, TypeRef};
use crate::naming::{enum_constant_name, make_unique};

impl<B: TypeBuilder> Synthesizer<'_, B> {
    /// Enumerations are declared in the container they appear in: nested when
    /// inside a class, top-level otherwise.
    pub(super) fn enum_rule(
        &mut self,
        name: &str,
        content: &Value,
        container: &Container,
    ) -> Result<TypeRef, SynthesisError> {
        let values = content
            .get("enum")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let custom_names: Vec<&str> = content
            .get("enumNames")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut members: Vec<EnumMember> = Vec::with_capacity(values.len());
        for (i, value) in values.iter().enumerate() {
            let base = custom_names
                .get(i)
                .map_or_else(|| enum_constant_name(value), |n| (*n).to_string());
            let member = make_unique(&base, |candidate| members.iter().any(|m| m.name == candidate));
            members.push(EnumMember {
                name: member,
                value: value.clone(),
            });
        }

        let enum_name = self
            .names
            .enum_name(name, |candidate| self.builder.type_exists(container, candidate));
        let id = self.builder.declare_enum(container, &enum_name, members);
        self.builder.enumeration_mut(id).description = text(content, "description");
        Ok(TypeRef::Enum(id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::config::GenerationConfig;
    use crate::model::{TypeBuilder, TypeModel, TypeRef};
    use crate::naming::EMPTY_CONSTANT;
    use crate::schema::{MemorySource, SchemaStore};
    use crate::synth::Synthesizer;

    fn generate(model: &mut TypeModel, schema: serde_json::Value) -> TypeRef {
        let store = SchemaStore::new(MemorySource::new());
        let config = GenerationConfig::default();
        Synthesizer::new(&store, &config, model)
            .generate_from_value("status", "com.example", schema)
            .unwrap()
    }

    #[test]
    fn test_member_names() {
        let mut model = TypeModel::new();
        let ty = generate(&mut model, json!({"enum": ["one", "secondOne", "4.1", ""]}));
        let TypeRef::Enum(id) = ty else {
            panic!("expected enum, got {ty:?}");
        };
        let e = model.enumeration(id);
        assert_eq!(e.name, "Status");
        let names: Vec<_> = e.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["ONE", "SECOND_ONE", "_4_1", EMPTY_CONSTANT]);
        assert_eq!(e.member("SECOND_ONE").unwrap().value, json!("secondOne"));
    }

    #[test]
    fn test_single_empty_value() {
        let mut model = TypeModel::new();
        let TypeRef::Enum(id) = generate(&mut model, json!({"enum": [""]})) else {
            panic!("expected enum");
        };
        assert_eq!(model.enumeration(id).members.len(), 1);
        assert_eq!(model.enumeration(id).members[0].name, EMPTY_CONSTANT);
    }

    #[test]
    fn test_custom_names_and_collisions() {
        let mut model = TypeModel::new();
        let TypeRef::Enum(id) = generate(
            &mut model,
            json!({"enum": ["a", "A", 1], "enumNames": ["First"]}),
        ) else {
            panic!("expected enum");
        };
        let names: Vec<_> = model.enumeration(id).members.iter().map(|m| m.name.clone()).collect();
        assert_eq!(names, vec!["First", "A", "_1"]);
    }

    #[test]
    fn test_duplicate_enum_names_are_suffixed() {
        let mut model = TypeModel::new();
        generate(&mut model, json!({"enum": ["x"]}));
        let TypeRef::Enum(id) = generate(&mut model, json!({"enum": ["y"]})) else {
            panic!("expected enum");
        };
        assert_eq!(model.enumeration(id).name, "Status_");
    }
}
