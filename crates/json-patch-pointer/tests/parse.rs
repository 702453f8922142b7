use json_patch_pointer::{format_pointer, normalize_path, ParsedPath, PointerError};

#[test]
fn test_parse_basic_pointer() {
    let path = ParsedPath::parse("/a/b/c").unwrap();
    assert_eq!(path.segments(), &["a", "b", "c"]);
    assert_eq!(path.last_segment(), Some("c"));
    assert_eq!(path.parent_segments(), &["a", "b"]);
}

#[test]
fn test_empty_and_separator_only_paths_are_root() {
    assert!(ParsedPath::parse("").unwrap().is_root());
    assert!(ParsedPath::parse("/").unwrap().is_root());
    assert!(ParsedPath::parse("//").unwrap().is_root());
}

#[test]
fn test_consecutive_separators_collapse() {
    let path = ParsedPath::parse("/a//b/").unwrap();
    assert_eq!(path.segments(), &["a", "b"]);
}

#[test]
fn test_escapes_unescape_in_order() {
    // ~01 is a literal "~1", not a slash
    let path = ParsedPath::parse("/~01/~10").unwrap();
    assert_eq!(path.segments(), &["~1", "/0"]);
}

#[test]
fn test_bad_escapes_are_rejected() {
    assert_eq!(ParsedPath::parse("/a~2"), Err(PointerError::InvalidEscape));
    assert_eq!(ParsedPath::parse("/a~"), Err(PointerError::InvalidEscape));
}

#[test]
fn test_format_round_trips_parse() {
    let original = "/a~0b/c~1d/e";
    let path = ParsedPath::parse(original).unwrap();
    assert_eq!(format_pointer(path.segments()), original);
}

#[test]
fn test_normalize_adds_leading_slash_only() {
    assert_eq!(normalize_path("a/b"), "/a/b");
    assert_eq!(normalize_path("/a/b"), "/a/b");
}
