use jst_core::naming::{NameAllocator, normalize_name, singularize};

#[test]
fn test_camel_case_input() {
    let n = normalize_name("postOfficeBox");
    assert_eq!(n.pascal_case, "PostOfficeBox");
    assert_eq!(n.camel_case, "postOfficeBox");
    assert_eq!(n.snake_case, "post_office_box");
    assert_eq!(n.screaming_snake, "POST_OFFICE_BOX");
}

#[test]
fn test_pascal_case_input() {
    let n = normalize_name("ChatMessage");
    assert_eq!(n.pascal_case, "ChatMessage");
    assert_eq!(n.camel_case, "chatMessage");
    assert_eq!(n.snake_case, "chat_message");
}

#[test]
fn test_spaces_and_punctuation() {
    let n = normalize_name("street address.line");
    assert_eq!(n.pascal_case, "StreetAddressLine");
    assert_eq!(n.camel_case, "streetAddressLine");
}

#[test]
fn test_empty_name() {
    let n = normalize_name("");
    assert_eq!(n.pascal_case, "Unnamed");
}

#[test]
fn test_singular_element_names() {
    assert_eq!(singularize("boxes"), "box");
    assert_eq!(singularize("data"), "data");
}

#[test]
fn test_illegal_characters_in_class_names() {
    let names = NameAllocator::new("", "");
    assert_eq!(names.class_name("my-type", |_| false), "MyType");
    assert_eq!(names.class_name("a.b", |n| n == "AB"), "AB_");
}
