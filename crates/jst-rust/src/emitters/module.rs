use jst_core::model::{
    ClassDef, ClassId, ClassKind, EnumDef, EnumId, MethodKind, Property, TypeBuilder, TypeModel,
    TypeRef,
};
use minijinja::{Environment, context};
use serde_json::Value;

use crate::generator::RustGeneratorConfig;
use crate::type_mapper::{
    bare, class_ident, enum_ident, field_ident, field_type, module_name, rust_type, variant_ident,
};

/// Emit the module holding every type declared in `package`.
pub fn emit_module(
    model: &TypeModel,
    package: &str,
    config: &RustGeneratorConfig,
) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("module.rs.j2", include_str!("../../templates/module.rs.j2"))?;
    let tmpl = env.get_template("module.rs.j2")?;

    let enums: Vec<_> = model
        .enums()
        .filter(|(_, e)| e.package == package)
        .map(|(id, e)| enum_to_ctx(model, id, e, config))
        .collect();
    let traits: Vec<_> = model
        .classes()
        .filter(|(_, c)| c.package == package && c.kind == ClassKind::Interface)
        .map(|(id, c)| {
            context! {
                name => class_ident(model, id),
                docs => docs(c.title.as_deref(), c.description.as_deref(), config),
            }
        })
        .collect();
    let structs: Vec<_> = model
        .classes()
        .filter(|(_, c)| c.package == package && c.kind == ClassKind::Class)
        .map(|(id, c)| class_to_ctx(model, id, c, config))
        .collect();

    tmpl.render(context! {
        serde => config.serde,
        enums => enums,
        traits => traits,
        structs => structs,
    })
}

fn docs(title: Option<&str>, description: Option<&str>, config: &RustGeneratorConfig) -> Vec<String> {
    if config.no_docs {
        return Vec::new();
    }
    let mut lines: Vec<String> = Vec::new();
    if let Some(title) = title {
        lines.extend(title.lines().map(str::to_string));
    }
    if let Some(description) = description {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(description.lines().map(str::to_string));
    }
    lines
}

fn derives(base: &str, config: &RustGeneratorConfig) -> String {
    if config.serde {
        format!("{base}, Serialize, Deserialize")
    } else {
        base.to_string()
    }
}

fn enum_to_ctx(
    model: &TypeModel,
    id: EnumId,
    e: &EnumDef,
    config: &RustGeneratorConfig,
) -> minijinja::Value {
    let mut taken: Vec<String> = Vec::new();
    let variants: Vec<_> = e
        .members
        .iter()
        .map(|member| {
            let ident = jst_core::naming::make_unique(&variant_ident(&member.name), |candidate| {
                taken.iter().any(|t| t == candidate)
            });
            taken.push(ident.clone());
            let mut attrs = Vec::new();
            match &member.value {
                Value::String(_) if config.serde => {
                    attrs.push(format!("#[serde(rename = {})]", member.value));
                }
                Value::String(_) => {}
                other => attrs.push(format!("/// Value: `{other}`")),
            }
            context! { ident => ident, attrs => attrs }
        })
        .collect();

    context! {
        name => enum_ident(model, id),
        docs => docs(None, e.description.as_deref(), config),
        derives => derives("Debug, Clone, Copy, PartialEq, Eq, Hash", config),
        variants => variants,
    }
}

/// Whether a field may be absent: everything but primitives that are not
/// part of a choice.
fn is_optional(class: &ClassDef, property: &Property) -> bool {
    if !property.ty.is_primitive() {
        return true;
    }
    class.methods.iter().any(|m| {
        matches!(&m.kind, MethodKind::Setter { field, skip_null: true, .. } if *field == property.field)
    })
}

fn class_to_ctx(
    model: &TypeModel,
    id: ClassId,
    class: &ClassDef,
    config: &RustGeneratorConfig,
) -> minijinja::Value {
    let package = class.package.as_str();
    let mut fields = Vec::new();

    if let Some(base) = &class.extends {
        let attrs = if config.serde {
            vec!["#[serde(flatten)]".to_string()]
        } else {
            Vec::new()
        };
        fields.push(context! {
            name => "base",
            ty => rust_type(model, base, package),
            docs => Vec::<String>::new(),
            attrs => attrs,
        });
    }

    for property in &class.properties {
        let optional = is_optional(class, property);
        let mut attrs = Vec::new();
        if config.serde {
            let mut serde_args = vec![format!("rename = {}", Value::from(property.json_name.as_str()))];
            if optional && !property.required {
                serde_args.push("skip_serializing_if = \"Option::is_none\"".to_string());
            }
            if !optional {
                serde_args.push("default".to_string());
            }
            attrs.push(format!("#[serde({})]", serde_args.join(", ")));
        }
        let mut field_docs = docs(property.title.as_deref(), property.description.as_deref(), config);
        if property.required && !config.no_docs {
            if !field_docs.is_empty() {
                field_docs.push(String::new());
            }
            field_docs.push("Required.".to_string());
        }
        fields.push(context! {
            name => field_ident(&property.field),
            ty => field_type(model, &property.ty, package, optional),
            docs => field_docs,
            attrs => attrs,
        });
    }

    if let Some(value) = &class.additional_properties {
        let attrs = if config.serde {
            vec!["#[serde(flatten)]".to_string()]
        } else {
            Vec::new()
        };
        fields.push(context! {
            name => "additional_properties",
            ty => rust_type(model, &TypeRef::Map(Box::new(value.clone())), package),
            docs => Vec::<String>::new(),
            attrs => attrs,
        });
    }

    let has_equals = class.method("equals").is_some();
    let base_derives = if has_equals {
        "Debug, Clone, Default, PartialEq"
    } else {
        "Debug, Clone, Default"
    };

    let implements: Vec<String> = class
        .interfaces
        .iter()
        .filter_map(TypeRef::as_class)
        .map(|iface| rust_type_of_trait(model, iface, package))
        .collect();

    let methods = render_methods(model, id, class);

    context! {
        name => class_ident(model, id),
        docs => docs(class.title.as_deref(), class.description.as_deref(), config),
        derives => derives(base_derives, config),
        fields => fields,
        methods => methods,
        implements => implements,
        display => class.method("toString").is_some(),
    }
}

fn rust_type_of_trait(model: &TypeModel, id: ClassId, current: &str) -> String {
    let class = model.class(id);
    let ident = class_ident(model, id);
    if class.package == current {
        ident
    } else {
        format!("super::{}::{ident}", module_name(&class.package))
    }
}

/// Find a property on `id` or any class it extends.
fn inherited_property<'m>(model: &'m TypeModel, id: ClassId, field: &str) -> Option<(&'m Property, bool)> {
    let class = model.class(id);
    if let Some(property) = class.property(field) {
        return Some((property, is_optional(class, property)));
    }
    let parent = class.extends.as_ref()?.as_class()?;
    inherited_property(model, parent, field)
}

fn render_methods(model: &TypeModel, id: ClassId, class: &ClassDef) -> String {
    let package = class.package.as_str();
    let mut methods = Vec::new();

    for method in &class.methods {
        match &method.kind {
            MethodKind::Constructor { params } if !params.is_empty() => {
                let mut args = Vec::new();
                let mut inits = Vec::new();
                for field in params {
                    let Some(property) = class.property(field) else {
                        continue;
                    };
                    let ident = field_ident(field);
                    let ty = field_type(model, &property.ty, package, false);
                    args.push(format!("{}: {ty}", bare(&ident)));
                    inits.push(if is_optional(class, property) {
                        format!("{ident}: Some({})", bare(&ident))
                    } else {
                        format!("{ident}: {}", bare(&ident))
                    });
                }
                methods.push(format!(
                    "    pub fn new({}) -> Self {{\n        Self {{\n            {},\n            ..Default::default()\n        }}\n    }}",
                    args.join(", "),
                    inits.join(",\n            ")
                ));
            }
            MethodKind::Setter {
                field,
                clears,
                skip_null: true,
            } => {
                let Some(property) = class.property(field) else {
                    continue;
                };
                let ident = field_ident(field);
                let ty = field_type(model, &property.ty, package, false);
                let mut body = vec![
                    "        let Some(value) = value else {\n            return;\n        };".to_string(),
                    format!("        self.{ident} = Some(value);"),
                ];
                body.extend(clears.iter().map(|other| format!("        self.{} = None;", field_ident(other))));
                methods.push(format!(
                    "    /// Set `{}`, clearing the other choices.\n    pub fn set_{}(&mut self, value: Option<{ty}>) {{\n{}\n    }}",
                    property.json_name,
                    bare(&ident),
                    body.join("\n")
                ));
            }
            MethodKind::Builder { field, inherited } => {
                let owner = if *inherited {
                    class.extends.as_ref().and_then(TypeRef::as_class)
                } else {
                    Some(id)
                };
                let Some((property, optional)) = owner.and_then(|owner| inherited_property(model, owner, field)) else {
                    continue;
                };
                let ident = field_ident(field);
                let name = format!("with_{}", bare(&ident));
                let ty = field_type(model, &property.ty, package, false);
                let assign = if *inherited {
                    format!("        self.base = self.base.{name}(value);")
                } else if optional {
                    format!("        self.{ident} = Some(value);")
                } else {
                    format!("        self.{ident} = value;")
                };
                methods.push(format!(
                    "    pub fn {name}(mut self, value: {ty}) -> Self {{\n{assign}\n        self\n    }}"
                ));
            }
            _ => {}
        }
    }
    methods.join("\n\n")
}
