//! End-to-end tokenization scenarios over the built-in modes
//!
//! Each test drives a [`TokenMarker`] the way an editor would: declare
//! lines, mark them in order, and check the token runs plus the cross-line
//! context behavior.

use insta::assert_snapshot;
use tokenmark::syntax::testing::{dump, dump_line};
use tokenmark::{TokenMarker, TokenType};

fn ids(tokens: &[tokenmark::Token]) -> Vec<(TokenType, usize)> {
    tokens.iter().map(|t| (t.id, t.length)).collect()
}

#[test]
fn test_c_statement_with_trailing_comment() {
    let mut marker = TokenMarker::for_mode("c").unwrap();
    let text = "int x = 5; // comment";
    let marked = marker.mark_all(text);
    assert_snapshot!(
        dump_line(text, &marked[0]),
        @r#"KEYWORD3 "int" | NULL " x = " | DIGIT "5" | NULL "; " | COMMENT1 "// comment""#
    );
}

#[test]
fn test_block_comment_carries_across_lines() {
    let mut marker = TokenMarker::for_mode("c").unwrap();
    let marked = marker.mark_all("/* start\nend */ int x;");

    assert_eq!(ids(&marked[0].tokens), vec![(TokenType::Comment1, 8)]);
    assert!(marked[0].context.in_rule.is_some());

    assert_eq!(
        ids(&marked[1].tokens),
        vec![
            (TokenType::Comment1, 6),
            (TokenType::Null, 1),
            (TokenType::Keyword3, 3),
            (TokenType::Null, 3),
        ]
    );
    assert!(marked[1].context.in_rule.is_none());
}

#[test]
fn test_shell_variable_ends_at_word_break() {
    let mut marker = TokenMarker::for_mode("shell").unwrap();
    let marked = marker.mark_all("$FOO bar");
    assert_eq!(
        ids(&marked[0].tokens),
        vec![(TokenType::Variable, 4), (TokenType::Null, 4)]
    );
}

#[test]
fn test_html_script_block_delegates_to_javascript() {
    let mut marker = TokenMarker::for_mode("html").unwrap();
    let text = "<script>\nvar x = 1; // js\n</script>";
    let marked = marker.mark_all(text);

    // opening delimiter, then a deeper context for the embedded language
    assert_eq!(ids(&marked[0].tokens), vec![(TokenType::Keyword2, 8)]);
    assert_eq!(marked[0].context.depth(), 2);

    // the middle line is tokenized by the JavaScript rules
    assert_eq!(
        ids(&marked[1].tokens),
        vec![
            (TokenType::Keyword1, 3),
            (TokenType::Null, 5),
            (TokenType::Digit, 1),
            (TokenType::Null, 2),
            (TokenType::Comment1, 5),
        ]
    );

    // the closing delimiter pops back to the markup context
    assert_eq!(ids(&marked[2].tokens), vec![(TokenType::Keyword2, 9)]);
    assert_eq!(marked[2].context.depth(), 1);
    assert!(marked[2].context.in_rule.is_none());
}

#[test]
fn test_unterminated_string_does_not_leak_into_next_line() {
    let mut marker = TokenMarker::for_mode("c").unwrap();
    let marked = marker.mark_all("\"oops\nint x;");

    assert_eq!(ids(&marked[0].tokens), vec![(TokenType::Invalid, 5)]);
    // recovery restored the MAIN context, so keywords work again
    assert_eq!(marked[1].tokens[0].id, TokenType::Keyword3);
}

#[test]
fn test_remarking_an_unchanged_line_is_stable() {
    let mut marker = TokenMarker::for_mode("c").unwrap();
    marker.insert_lines(0, 2);

    let first = marker.mark_tokens("int x; /* open", 0);
    assert!(first.next_line_changed);

    let again = marker.mark_tokens("int x; /* open", 0);
    assert_eq!(first.tokens, again.tokens);
    assert_eq!(first.context, again.context);
    assert!(!again.next_line_changed);
}

#[test]
fn test_edit_notifications_shift_the_cache() {
    let mut marker = TokenMarker::for_mode("c").unwrap();
    marker.insert_lines(0, 2);
    marker.mark_tokens("/* open", 0);
    let inside = marker.mark_tokens("still inside", 1);
    assert_eq!(ids(&inside.tokens), vec![(TokenType::Comment1, 12)]);

    // inserting a line before the comment shifts everything down
    marker.insert_lines(0, 1);
    assert_eq!(marker.line_count(), 3);
    let fresh = marker.mark_tokens("int y;", 0);
    assert_eq!(fresh.tokens[0].id, TokenType::Keyword3);

    // deleting the opener makes the old interior plain text again
    marker.delete_lines(1, 1);
    marker.lines_changed(1, 1);
    let replain = marker.mark_tokens("still inside", 1);
    assert_eq!(ids(&replain.tokens), vec![(TokenType::Null, 12)]);
}

#[test]
fn test_postscript_nested_string_literal() {
    let mut marker = TokenMarker::for_mode("postscript").unwrap();
    let marked = marker.mark_all("(a (b) c) show");

    // the whole parenthesized group is one literal, nesting included
    let total_literal: usize = marked[0]
        .tokens
        .iter()
        .filter(|t| t.id == TokenType::Literal1)
        .map(|t| t.length)
        .sum();
    assert_eq!(total_literal, 9);
    assert_eq!(marked[0].tokens.last().unwrap().id, TokenType::Keyword1);
    assert!(marked[0].context.in_rule.is_none());
    assert_eq!(marked[0].context.depth(), 1);
}

#[test]
fn test_properties_key_value_line() {
    let mut marker = TokenMarker::for_mode("properties").unwrap();
    let text = "key=value\n# note";
    let marked = marker.mark_all(text);
    assert_snapshot!(
        dump(text, &marked),
        @r##"
    KEYWORD1 "key" | NULL "=value"
    COMMENT1 "# note"
    "##
    );
}

#[test]
fn test_sql_is_case_insensitive() {
    let mut marker = TokenMarker::for_mode("sql").unwrap();
    let marked = marker.mark_all("SELECT name FROM t -- all rows");
    let kinds = ids(&marked[0].tokens);
    assert_eq!(kinds[0], (TokenType::Keyword1, 6));
    assert!(kinds.contains(&(TokenType::Comment1, 11)));
}
