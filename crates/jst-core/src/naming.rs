//! Identifier derivation for generated types, fields and enum constants.

use std::fmt;

use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};
use serde_json::Value;

use crate::config::GenerationConfig;
use crate::schema::pointer;

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
    pub screaming_snake: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// Words that can not be used as field identifiers as-is.
pub const RESERVED_WORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "yield",
];

/// Constant name for the empty string enum value.
pub const EMPTY_CONSTANT: &str = "__EMPTY__";
/// Constant name for a null enum value.
pub const NULL_CONSTANT: &str = "__NULL__";

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
        snake_case: sanitized.to_snake_case(),
        screaming_snake: sanitized.to_shouty_snake_case(),
    }
}

/// Naive singularization: strips trailing 's' if present.
pub fn singularize(word: &str) -> String {
    if word.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Sanitize a string to be a valid identifier.
pub fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for (i, ch) in name.chars().enumerate() {
        if ch.is_alphanumeric() {
            if i == 0 && ch.is_ascii_digit() {
                result.push('_');
            }
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}

/// Append `_` to `candidate` until `exists` no longer accepts it.
pub fn make_unique(candidate: &str, exists: impl Fn(&str) -> bool) -> String {
    let mut name = candidate.to_string();
    while exists(&name) {
        name.push('_');
    }
    name
}

/// Upper-case the first character, leaving the rest alone.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn guard_leading_digit(mut name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Constant name for an enum value: shouty snake case, with sentinels for
/// the empty string and null.
pub fn enum_constant_name(value: &Value) -> String {
    let text = match value {
        Value::Null => return NULL_CONSTANT.to_string(),
        Value::String(s) if s.is_empty() => return EMPTY_CONSTANT.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let shouty = split_digit_runs(&text).to_shouty_snake_case();
    if shouty.is_empty() {
        return "UNNAMED".to_string();
    }
    guard_leading_digit(shouty)
}

/// Break words where a digit is followed by a letter, so `3rd` becomes
/// `3 rd`.
fn split_digit_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_digit = false;
    for c in text.chars() {
        if previous_digit && c.is_alphabetic() {
            out.push(' ');
        }
        previous_digit = c.is_ascii_digit();
        out.push(c);
    }
    out
}

/// Whether a pointer can be mapped onto a flat type namespace.
///
/// Each definition name must be followed by a schema keyword; a pointer
/// that descends through plain nested objects (for example
/// `/definitions/a/b/c`) has no single definition name to use. Definitions
/// nested inside a definition (`/definitions/a/definitions/b`) are rejected
/// too.
pub fn is_flat_fragment(fragment: &str) -> bool {
    const DEFINITIONS: &[&str] = &["definitions", "$defs"];
    const NAMESPACES: &[&str] = &[
        "properties",
        "patternProperties",
        "oneOf",
        "anyOf",
        "allOf",
    ];
    const SCHEMAS: &[&str] = &["items", "additionalProperties", "extends", "not"];

    #[derive(PartialEq)]
    enum Expect {
        Anything,
        Name,
        Keyword,
    }

    let mut expect = Expect::Anything;
    let mut in_definition = false;
    for segment in pointer::segments(fragment) {
        let segment = segment.as_str();
        expect = match expect {
            Expect::Name => Expect::Keyword,
            _ if DEFINITIONS.contains(&segment) => {
                if in_definition {
                    return false;
                }
                in_definition = true;
                Expect::Name
            }
            _ if NAMESPACES.contains(&segment) => Expect::Name,
            _ if SCHEMAS.contains(&segment) => Expect::Keyword,
            Expect::Anything => Expect::Keyword,
            Expect::Keyword if segment.chars().all(|c| c.is_ascii_digit()) => Expect::Keyword,
            Expect::Keyword => return false,
        };
    }
    true
}

/// Allocates class, field and enum names, applying the configured class
/// name decoration.
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    prefix: String,
    suffix: String,
}

impl NameAllocator {
    pub fn new(prefix: &str, suffix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(&config.class_name_prefix, &config.class_name_suffix)
    }

    pub fn decorate(&self, simple_name: &str) -> String {
        format!("{}{simple_name}{}", self.prefix, self.suffix)
    }

    /// A decorated, unique class name for `node_name`.
    pub fn class_name(&self, node_name: &str, exists: impl Fn(&str) -> bool) -> String {
        let base = normalize_name(node_name).pascal_case;
        let decorated = sanitize_type_name(&self.decorate(&base));
        make_unique(&decorated, exists)
    }

    /// A unique, undecorated type name for `node_name`.
    pub fn enum_name(&self, node_name: &str, exists: impl Fn(&str) -> bool) -> String {
        let base = sanitize_type_name(&normalize_name(node_name).pascal_case);
        make_unique(&base, exists)
    }

    /// A unique field identifier for a property.
    pub fn field_name(&self, property: &str, exists: impl Fn(&str) -> bool) -> String {
        let mut field = guard_leading_digit(normalize_name(property).camel_case);
        if RESERVED_WORDS.contains(&field.as_str()) {
            field.push('_');
        }
        make_unique(&field, exists)
    }
}

fn sanitize_type_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    guard_leading_digit(cleaned)
}
