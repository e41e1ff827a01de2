//! Integration tests for error reporting.

use tangle::parse;

#[test]
fn test_unterminated_string_single_diagnostic() {
    let result = parse("\"abc");
    assert!(result.document.is_none());
    assert_eq!(result.diagnostics.len(), 1);

    let diagnostic = &result.diagnostics[0];
    // Points at the opening quote, not at end of input
    assert_eq!(diagnostic.offset, 0);
    assert_eq!(diagnostic.length, 1);
    assert_eq!(diagnostic.line, 1);
    assert_eq!(diagnostic.column, 1);
    assert_eq!(diagnostic.token_kind, "unterminated-string");
}

#[test]
fn test_two_sibling_children_blocks_rejected() {
    let result = parse("foo {} {}");
    assert!(result.document.is_none());
    assert_eq!(result.diagnostics.len(), 1);

    let diagnostic = &result.diagnostics[0];
    assert!(diagnostic.message.contains("terminator"));
    assert_eq!(diagnostic.token_kind, "'{'");
    // The second '{' sits at offset 7
    assert_eq!(diagnostic.offset, 7);
}

#[test]
fn test_lex_errors_all_reported_together() {
    let source = "a \"one\nb ,,,\nc \"two";
    let result = parse(source);
    assert!(result.document.is_none());
    assert_eq!(result.diagnostics.len(), 3);
    assert_eq!(result.diagnostics[0].token_kind, "unterminated-string");
    assert_eq!(result.diagnostics[1].token_kind, "unexpected-characters");
    assert_eq!(result.diagnostics[1].line, 2);
    assert_eq!(result.diagnostics[2].token_kind, "unterminated-string");
    assert_eq!(result.diagnostics[2].line, 3);
}

#[test]
fn test_parse_stops_at_first_error() {
    // Both nodes are malformed; only the first is reported
    let result = parse("a {} {}\nb {} {}");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].line, 1);
}

#[test]
fn test_no_partial_tree_on_late_error() {
    // The first node is fine, the second is not; the whole document is
    // rejected
    let result = parse("good 1\nbad {} 2");
    assert!(result.document.is_none());
}

#[test]
fn test_missing_children_close_reports_end_of_input() {
    let result = parse("a {\n  b 1\n");
    assert!(result.document.is_none());
    assert_eq!(result.diagnostics[0].token_kind, "end-of-input");
    assert!(result.diagnostics[0].message.contains("'}'"));
}

#[test]
fn test_unterminated_comment_location() {
    let result = parse("node 1 /* open");
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.token_kind, "unterminated-comment");
    assert_eq!(diagnostic.offset, 7);
    assert_eq!(diagnostic.length, 2);
}

#[test]
fn test_invalid_escape_diagnostic() {
    let result = parse(r#"node "a\qb""#);
    assert!(result.document.is_none());
    assert_eq!(result.diagnostics[0].token_kind, "invalid-escape");
}

#[test]
fn test_multiline_indent_mismatch_diagnostic() {
    let result = parse("text \"\"\"\n    ok\n  bad\n    \"\"\"");
    assert!(result.document.is_none());
    assert_eq!(
        result.diagnostics[0].token_kind,
        "malformed-multiline-indentation"
    );
}

#[test]
fn test_value_expected_diagnostic() {
    let result = parse("node key=");
    assert!(result.document.is_none());
    assert!(result.diagnostics[0].message.contains("a value"));
}

#[test]
fn test_diagnostic_position_on_later_line() {
    let result = parse("a 1\nb 2\nc {} {}");
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.line, 3);
    assert_eq!(diagnostic.column, 6);
}
