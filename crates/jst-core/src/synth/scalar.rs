use serde_json::Value;

use super::{ScalarType, Synthesizer};
use crate::model::{Scalar, ScalarKind, TypeBuilder, TypeRef};

/// Whether a numeric bound falls outside the 32-bit integer range.
fn exceeds_int(bound: Option<&Value>) -> bool {
    bound
        .and_then(Value::as_f64)
        .is_some_and(|n| n > f64::from(i32::MAX) || n < f64::from(i32::MIN))
}

impl<B: TypeBuilder> Synthesizer<'_, B> {
    pub(super) fn scalar_rule(&self, kind: ScalarType, content: &Value) -> TypeRef {
        if let Some(external) = content.get("externalType").and_then(Value::as_str) {
            return self.external_type(external);
        }
        let scalar = |kind| {
            if self.config.use_primitives {
                Scalar::primitive(kind)
            } else {
                Scalar::boxed(kind)
            }
        };
        match kind {
            ScalarType::String => {
                let bound = content
                    .get("format")
                    .and_then(Value::as_str)
                    .and_then(|format| self.config.format_bindings.get(format));
                match bound {
                    Some(external) => self.external_type(external),
                    None => TypeRef::string(),
                }
            }
            ScalarType::Integer => {
                let wide = exceeds_int(content.get("minimum")) || exceeds_int(content.get("maximum"));
                TypeRef::Scalar(scalar(if wide { ScalarKind::Long } else { ScalarKind::Int }))
            }
            ScalarType::Number if self.config.use_double_numbers => {
                TypeRef::Scalar(scalar(ScalarKind::Double))
            }
            ScalarType::Number => TypeRef::Scalar(Scalar::boxed(ScalarKind::Decimal)),
            ScalarType::Boolean => TypeRef::Scalar(scalar(ScalarKind::Boolean)),
        }
    }

    /// A type named outside the schema. Scalar names map onto scalars.
    pub(super) fn external_type(&self, name: &str) -> TypeRef {
        match ScalarKind::from_name(name) {
            Some(scalar) => TypeRef::Scalar(scalar),
            None => TypeRef::External(name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::config::GenerationConfig;
    use crate::model::{Scalar, ScalarKind, TypeModel, TypeRef};
    use crate::schema::{MemorySource, SchemaStore};
    use crate::synth::Synthesizer;

    fn synth(config: &GenerationConfig, schema: serde_json::Value) -> TypeRef {
        let store = SchemaStore::new(MemorySource::new());
        let mut model = TypeModel::new();
        Synthesizer::new(&store, config, &mut model)
            .generate_from_value("Value", "com.example", schema)
            .unwrap()
    }

    #[test]
    fn test_integer_defaults_to_boxed_int() {
        let config = GenerationConfig::default();
        assert_eq!(
            synth(&config, json!({"type": "integer"})),
            TypeRef::Scalar(Scalar::boxed(ScalarKind::Int))
        );
    }

    #[test]
    fn test_integer_primitive_when_configured() {
        let config = GenerationConfig {
            use_primitives: true,
            ..Default::default()
        };
        assert_eq!(
            synth(&config, json!({"type": "integer"})),
            TypeRef::Scalar(Scalar::primitive(ScalarKind::Int))
        );
    }

    #[test]
    fn test_wide_bounds_use_long() {
        let config = GenerationConfig::default();
        assert_eq!(
            synth(&config, json!({"type": "integer", "maximum": 2147483648_i64})),
            TypeRef::Scalar(Scalar::boxed(ScalarKind::Long))
        );
        assert_eq!(
            synth(&config, json!({"type": "integer", "minimum": -2147483649_i64})),
            TypeRef::Scalar(Scalar::boxed(ScalarKind::Long))
        );
        assert_eq!(
            synth(&config, json!({"type": "integer", "maximum": 2147483647})),
            TypeRef::Scalar(Scalar::boxed(ScalarKind::Int))
        );
    }

    #[test]
    fn test_number_double_or_decimal() {
        let config = GenerationConfig::default();
        assert_eq!(
            synth(&config, json!({"type": "number"})),
            TypeRef::Scalar(Scalar::boxed(ScalarKind::Double))
        );
        let config = GenerationConfig {
            use_double_numbers: false,
            use_primitives: true,
            ..Default::default()
        };
        assert_eq!(
            synth(&config, json!({"type": "number"})),
            TypeRef::Scalar(Scalar::boxed(ScalarKind::Decimal))
        );
    }

    #[test]
    fn test_any_like_types() {
        let config = GenerationConfig::default();
        for schema in [json!({"type": "any"}), json!({"type": "null"}), json!({"type": "foo"}), json!({})] {
            assert_eq!(synth(&config, schema), TypeRef::Any);
        }
    }

    #[test]
    fn test_nullable_type_array() {
        let config = GenerationConfig::default();
        assert_eq!(synth(&config, json!({"type": ["null", "string"]})), TypeRef::string());
    }

    #[test]
    fn test_external_type_overrides() {
        let config = GenerationConfig::default();
        assert_eq!(
            synth(&config, json!({"type": "integer", "externalType": "int"})),
            TypeRef::Scalar(Scalar::primitive(ScalarKind::Int))
        );
        assert_eq!(
            synth(&config, json!({"type": "string", "externalType": "chrono::NaiveDate"})),
            TypeRef::External("chrono::NaiveDate".into())
        );
    }

    #[test]
    fn test_format_binding() {
        let mut config = GenerationConfig::default();
        config.format_bindings.insert("uuid".into(), "uuid::Uuid".into());
        assert_eq!(
            synth(&config, json!({"type": "string", "format": "uuid"})),
            TypeRef::External("uuid::Uuid".into())
        );
        assert_eq!(
            synth(&config, json!({"type": "string", "format": "email"})),
            TypeRef::string()
        );
    }
}
