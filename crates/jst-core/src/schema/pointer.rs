//! JSON Pointer helpers for reference fragments.

use serde_json::Value;

/// Navigate `pointer` inside `content`. The empty pointer addresses the
/// whole document.
pub fn resolve_fragment<'a>(content: &'a Value, pointer: &str) -> Option<&'a Value> {
    content.pointer(pointer)
}

/// Split a pointer into its unescaped reference tokens.
pub fn segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// The last unescaped token of a pointer, if it has any.
pub fn last_segment(pointer: &str) -> Option<String> {
    segments(pointer).pop().filter(|s| !s.is_empty())
}

/// Escape a single token for inclusion in a pointer.
pub fn escape_segment(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_nested() {
        let doc = json!({"definitions": {"a/b": {"type": "string"}, "list": [1, {"x": true}]}});
        assert_eq!(
            resolve_fragment(&doc, "/definitions/a~1b"),
            Some(&json!({"type": "string"}))
        );
        assert_eq!(
            resolve_fragment(&doc, "/definitions/list/1/x"),
            Some(&json!(true))
        );
        assert_eq!(resolve_fragment(&doc, ""), Some(&doc));
        assert_eq!(resolve_fragment(&doc, "/missing"), None);
    }

    #[test]
    fn test_segments_unescape() {
        assert_eq!(segments("/a~1b/c~0d"), vec!["a/b", "c~d"]);
        assert_eq!(last_segment("/definitions/address"), Some("address".into()));
        assert_eq!(last_segment(""), None);
        assert_eq!(escape_segment("a/b~"), "a~1b~0");
    }
}
