use heck::{ToPascalCase, ToSnakeCase};
use jst_core::model::{ClassId, ClassKind, EnumId, Scalar, ScalarKind, TypeBuilder, TypeModel, TypeRef};

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe",
    "use", "where", "while", "abstract", "become", "box", "do", "final", "macro", "override",
    "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// Module name for a package: `com.example` becomes `com_example`.
pub fn module_name(package: &str) -> String {
    if package.is_empty() {
        return "types".to_string();
    }
    package.replace('.', "_").to_snake_case()
}

/// Rust field identifier for a model field. Trailing underscores added to
/// keep fields unique are preserved.
pub fn field_ident(field: &str) -> String {
    let trimmed = field.trim_end_matches('_');
    let mut ident = trimmed.to_snake_case();
    ident.push_str(&field[trimmed.len()..]);
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    raw_if_keyword(ident)
}

/// The identifier without any `r#` prefix, for composing method names.
pub fn bare(ident: &str) -> &str {
    ident.trim_start_matches("r#")
}

fn raw_if_keyword(ident: String) -> String {
    if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}

/// Variant identifier for an enum constant such as `SECOND_ONE`.
pub fn variant_ident(constant: &str) -> String {
    let ident = constant.to_pascal_case();
    match ident.chars().next() {
        None => "Unnamed".to_string(),
        Some(c) if c.is_ascii_digit() => format!("V{ident}"),
        Some(_) => ident,
    }
}

/// Type identifier for a class. Classes are never nested.
pub fn class_ident(model: &TypeModel, id: ClassId) -> String {
    model.class(id).name.clone()
}

/// Type identifier for an enumeration; nested enumerations are prefixed
/// with their enclosing class.
pub fn enum_ident(model: &TypeModel, id: EnumId) -> String {
    let enumeration = model.enumeration(id);
    match enumeration.outer {
        Some(outer) => format!("{}{}", class_ident(model, outer), enumeration.name),
        None => enumeration.name.clone(),
    }
}

fn scalar_type(scalar: Scalar) -> &'static str {
    match scalar.kind {
        ScalarKind::String => "String",
        ScalarKind::Int => "i32",
        ScalarKind::Long => "i64",
        ScalarKind::Float => "f32",
        ScalarKind::Double => "f64",
        ScalarKind::Decimal => "serde_json::Number",
        ScalarKind::Boolean => "bool",
    }
}

fn qualify(package: &str, current: &str, ident: String) -> String {
    if package == current {
        ident
    } else {
        format!("super::{}::{ident}", module_name(package))
    }
}

/// Map a model type to Rust source, as seen from the module of `current`.
pub fn rust_type(model: &TypeModel, ty: &TypeRef, current: &str) -> String {
    match ty {
        TypeRef::Scalar(scalar) => scalar_type(*scalar).to_string(),
        TypeRef::Any => "serde_json::Value".to_string(),
        TypeRef::Class(id) => {
            let class = model.class(*id);
            if class.kind == ClassKind::Interface {
                // Property-less objects carry arbitrary content.
                return "serde_json::Value".to_string();
            }
            qualify(&class.package, current, class_ident(model, *id))
        }
        TypeRef::Enum(id) => {
            let enumeration = model.enumeration(*id);
            qualify(&enumeration.package, current, enum_ident(model, *id))
        }
        TypeRef::Array { element, .. } => format!("Vec<{}>", rust_type(model, element, current)),
        TypeRef::Map(value) => format!(
            "std::collections::HashMap<String, {}>",
            rust_type(model, value, current)
        ),
        TypeRef::External(name) => name.replace('.', "::"),
    }
}

/// Field type: classes are boxed so recursive types have a size, and
/// everything except primitives is optional.
pub fn field_type(model: &TypeModel, ty: &TypeRef, current: &str, optional: bool) -> String {
    let inner = rust_type(model, ty, current);
    let inner = match ty {
        TypeRef::Class(id) if model.class(*id).kind == ClassKind::Class => format!("Box<{inner}>"),
        _ => inner,
    };
    if optional {
        format!("Option<{inner}>")
    } else {
        inner
    }
}
