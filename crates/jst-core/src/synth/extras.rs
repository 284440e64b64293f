//! Members derived from the finished property list of a class.

use crate::model::{ClassDef, Method, MethodKind};

pub(super) fn add_to_string(def: &mut ClassDef) {
    if !def.has_fields() {
        return;
    }
    let fields = def.field_names();
    def.methods.push(Method {
        name: "toString".to_string(),
        kind: MethodKind::ToString { fields },
    });
}

/// Equality and hashing over every field. Classes extending a generated
/// class include the supertype's contribution.
pub(super) fn add_equals_and_hash_code(def: &mut ClassDef) {
    if !def.has_fields() {
        return;
    }
    let fields = def.field_names();
    let call_super = def.extends.as_ref().is_some_and(|t| t.as_class().is_some());
    def.methods.push(Method {
        name: "equals".to_string(),
        kind: MethodKind::Equals {
            fields: fields.clone(),
            call_super,
        },
    });
    def.methods.push(Method {
        name: "hashCode".to_string(),
        kind: MethodKind::HashCode { fields, call_super },
    });
}

/// A no-argument constructor plus one taking the properties (or only the
/// required ones).
pub(super) fn add_constructors(def: &mut ClassDef, required_only: bool) {
    let params: Vec<String> = def
        .properties
        .iter()
        .filter(|p| !required_only || p.required)
        .map(|p| p.field.clone())
        .collect();
    if params.is_empty() {
        return;
    }
    for params in [Vec::new(), params] {
        def.methods.push(Method {
            name: def.name.clone(),
            kind: MethodKind::Constructor { params },
        });
    }
}

/// Re-declare the supertype's builders that `def` does not define itself so
/// they return the subtype.
pub(super) fn add_inherited_builders(def: &mut ClassDef, inherited: &[(String, String)]) {
    for (name, field) in inherited {
        if def.method(name).is_some() {
            continue;
        }
        def.methods.push(Method {
            name: name.clone(),
            kind: MethodKind::Builder {
                field: field.clone(),
                inherited: true,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassId, ClassKind, Property, TypeRef};
    use crate::naming::normalize_name;

    fn class_with(fields: &[(&str, bool)]) -> ClassDef {
        let mut def = ClassDef::new("Person", "p", None, ClassKind::Class);
        for (field, required) in fields {
            def.properties.push(Property {
                json_name: field.to_string(),
                name: normalize_name(field),
                field: field.to_string(),
                ty: TypeRef::string(),
                required: *required,
                title: None,
                description: None,
            });
        }
        def
    }

    #[test]
    fn test_no_members_without_fields() {
        let mut def = class_with(&[]);
        add_to_string(&mut def);
        add_equals_and_hash_code(&mut def);
        add_constructors(&mut def, false);
        assert!(def.methods.is_empty());
    }

    #[test]
    fn test_equals_calls_super_when_extending() {
        let mut def = class_with(&[("name", false)]);
        def.extends = Some(TypeRef::Class(ClassId(0)));
        add_equals_and_hash_code(&mut def);
        assert_eq!(
            def.method("equals").unwrap().kind,
            MethodKind::Equals {
                fields: vec!["name".into()],
                call_super: true
            }
        );
    }

    #[test]
    fn test_external_supertype_is_not_called() {
        let mut def = class_with(&[("name", false)]);
        def.extends = Some(TypeRef::External("com.acme.Base".into()));
        add_equals_and_hash_code(&mut def);
        assert_eq!(
            def.method("hashCode").unwrap().kind,
            MethodKind::HashCode {
                fields: vec!["name".into()],
                call_super: false
            }
        );
    }

    #[test]
    fn test_required_only_constructor() {
        let mut def = class_with(&[("name", true), ("age", false)]);
        add_constructors(&mut def, true);
        let constructors: Vec<_> = def.constructors().collect();
        assert_eq!(constructors, vec![&[][..], &["name".to_string()][..]]);
    }

    #[test]
    fn test_inherited_builders_skip_own() {
        let mut def = class_with(&[]);
        def.methods.push(Method {
            name: "withName".into(),
            kind: MethodKind::Builder {
                field: "name".into(),
                inherited: false,
            },
        });
        let inherited = vec![
            ("withName".to_string(), "name".to_string()),
            ("withAge".to_string(), "age".to_string()),
        ];
        add_inherited_builders(&mut def, &inherited);
        assert_eq!(def.builders().count(), 2);
        assert_eq!(
            def.method("withAge").unwrap().kind,
            MethodKind::Builder {
                field: "age".into(),
                inherited: true
            }
        );
    }
}
