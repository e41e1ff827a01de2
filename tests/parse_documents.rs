//! Integration tests for document structure.

use rstest::rstest;
use tangle::{parse, Node, Value};

fn parsed(source: &str) -> tangle::Document {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        result.diagnostics
    );
    result.document.expect("document absent without diagnostics")
}

fn single_node(source: &str) -> Node {
    let document = parsed(source);
    assert_eq!(document.nodes.len(), 1);
    document.nodes.into_iter().next().expect("one node")
}

#[test]
fn test_basic_node_with_child() {
    let node = single_node("foo 1 2 {bar}");
    assert_eq!(node.name, "foo");
    assert_eq!(node.values[0].as_i64(), Some(1));
    assert_eq!(node.values[1].as_i64(), Some(2));
    assert!(node.properties.is_empty());

    let child = node.child("bar").expect("missing child");
    assert!(child.values.is_empty());
    assert!(child.properties.is_empty());
    assert!(child.children.is_empty());
}

#[test]
fn test_block_comment_before_node_is_space() {
    // A /* */ comment is inter-node space; the node after it survives
    let document = parsed("/* */foo 1");
    assert_eq!(document.nodes.len(), 1);
    assert_eq!(document.nodes[0].name, "foo");
}

#[test]
fn test_slashdash_discards_following_node() {
    let document = parsed("/* */foo 1\n/-bar");
    assert_eq!(document.nodes.len(), 1);
    assert_eq!(document.nodes[0].name, "foo");
}

#[test]
fn test_slashdash_with_intervening_linespace() {
    let document = parsed("/- \n  disabled 1 2\nkept");
    assert_eq!(document.nodes.len(), 1);
    assert_eq!(document.nodes[0].name, "kept");
}

#[test]
fn test_tagged_value() {
    let node = single_node("foo (u8)255");
    assert_eq!(node.values[0].as_i64(), Some(255));
    assert_eq!(node.tags.values[0].as_deref(), Some("u8"));
}

#[test]
fn test_duplicate_property_last_wins() {
    let node = single_node("node a=1 a=2");
    assert_eq!(node.property("a").and_then(Value::as_i64), Some(2));
}

#[test]
fn test_duplicate_property_tag_follows_value() {
    // Assumption (not independently pinned by the format): last occurrence
    // wins uniformly for the value AND its tag, so an untagged repeat
    // clears an earlier tag.
    let node = single_node("node a=(u8)1 a=2");
    assert_eq!(node.property("a").and_then(Value::as_i64), Some(2));
    assert_eq!(node.tags.properties.get("a"), Some(&None));

    let node = single_node("node a=1 a=(u8)2");
    assert_eq!(
        node.tags.properties.get("a").and_then(|t| t.as_deref()),
        Some("u8")
    );
}

#[test]
fn test_document_order_preserved() {
    let source = "first 1\nsecond 2\nthird 3";
    let names: Vec<String> = parsed(source).nodes.into_iter().map(|n| n.name).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn test_realistic_document() {
    let source = r#"
package {
    name "tangle"
    version "0.1.0"
    authors "Alice" "Bob"
    dependencies platform="linux" {
        logos "0.14"
        /-chumsky "0.9"
    }
    limits (u16)250 retry=3
}
"#;
    let document = parsed(source);
    assert_eq!(document.nodes.len(), 1);

    let package = &document.nodes[0];
    assert_eq!(package.name, "package");
    assert_eq!(package.children.len(), 5);

    let authors = package.child("authors").expect("authors");
    assert_eq!(authors.values.len(), 2);
    assert_eq!(authors.values[1].as_str(), Some("Bob"));

    let deps = package.child("dependencies").expect("dependencies");
    assert_eq!(
        deps.property("platform").and_then(Value::as_str),
        Some("linux")
    );
    // The slashdashed dependency is gone
    assert_eq!(deps.children.len(), 1);
    assert_eq!(deps.children[0].name, "logos");

    let limits = package.child("limits").expect("limits");
    assert_eq!(limits.tags.values[0].as_deref(), Some("u16"));
    assert_eq!(limits.property("retry").and_then(Value::as_i64), Some(3));
}

#[test]
fn test_string_escapes_in_values() {
    let node = single_node(r#"msg "tab\there" path="a\/b""#);
    assert_eq!(node.values[0].as_str(), Some("tab\there"));
    assert_eq!(node.property("path").and_then(Value::as_str), Some("a/b"));
}

#[test]
fn test_multiline_string_argument() {
    let source = "description \"\"\"\n    First line.\n    Second line.\n    \"\"\"";
    let node = single_node(source);
    assert_eq!(node.values[0].as_str(), Some("First line.\nSecond line."));
}

#[test]
fn test_raw_string_keeps_backslashes() {
    let node = single_node(r#"path r"C:\temp""#);
    assert_eq!(node.values[0].as_str(), Some(r"C:\temp"));
}

#[rstest]
#[case("n 255", 255)]
#[case("n 0xff", 255)]
#[case("n 0o777", 511)]
#[case("n 0b1010", 10)]
#[case("n 1_000_000", 1_000_000)]
#[case("n -42", -42)]
#[case("n +7", 7)]
fn test_integer_literal_forms(#[case] source: &str, #[case] expected: i64) {
    let node = single_node(source);
    assert_eq!(node.values[0].as_i64(), Some(expected));
}

#[rstest]
#[case("n 1.5", 1.5)]
#[case("n 2e3", 2000.0)]
#[case("n -1.25e-2", -0.0125)]
#[case("n inf", f64::INFINITY)]
#[case("n -inf", f64::NEG_INFINITY)]
fn test_float_literal_forms(#[case] source: &str, #[case] expected: f64) {
    let node = single_node(source);
    assert_eq!(node.values[0].as_f64(), Some(expected));
}

#[test]
fn test_tags_parallel_structure_invariant() {
    let node = single_node("n 1 (a)2 x=(b)3 y=4");
    assert_eq!(node.tags.values.len(), node.values.len());
    let tag_keys: std::collections::HashSet<_> = node.tags.properties.keys().collect();
    let prop_keys: std::collections::HashSet<_> = node.properties.keys().collect();
    assert_eq!(tag_keys, prop_keys);
}

#[test]
fn test_bom_then_document() {
    let document = parsed("\u{FEFF}node 1");
    assert_eq!(document.nodes.len(), 1);
}

#[test]
fn test_blank_lines_and_comments_between_nodes() {
    let source = "a 1\n\n// standalone comment\n\n/* spanning\ncomment */\nb 2";
    let document = parsed(source);
    assert_eq!(document.nodes.len(), 2);
}
