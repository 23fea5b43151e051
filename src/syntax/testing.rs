//! Token dump helpers
//!
//!     Renders marked lines in a stable one-line format, used by snapshot
//!     tests and the CLI's plain output:
//!
//!         KEYWORD3 "int" | NULL " x = " | DIGIT "5" | NULL ";"

use crate::syntax::marker::MarkedLine;

/// Renders one marked line against its source text.
///
/// Panics when the token lengths do not cover the line; that would be a
/// tokenizer bug, not an input error.
pub fn dump_line(text: &str, marked: &MarkedLine) -> String {
    let mut parts = Vec::with_capacity(marked.tokens.len());
    let mut offset = 0;
    for token in &marked.tokens {
        let slice = &text[offset..offset + token.length];
        parts.push(format!("{} {:?}", token.id, slice));
        offset += token.length;
    }
    assert_eq!(offset, text.len(), "tokens do not cover the line");
    parts.join(" | ")
}

/// Renders a whole marked buffer, one dump line per source line.
pub fn dump(text: &str, marked: &[MarkedLine]) -> String {
    text.lines()
        .zip(marked)
        .map(|(line, marked)| dump_line(line, marked))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::marker::TokenMarker;

    #[test]
    fn test_dump_line_format() {
        let mut marker = TokenMarker::for_mode("c").unwrap();
        let marked = marker.mark_all("int x;");
        assert_eq!(
            dump_line("int x;", &marked[0]),
            r#"KEYWORD3 "int" | NULL " x;""#
        );
    }

    #[test]
    fn test_dump_joins_lines() {
        let mut marker = TokenMarker::for_mode("c").unwrap();
        let text = "int x;\n// done";
        let marked = marker.mark_all(text);
        let dumped = dump(text, &marked);
        assert_eq!(dumped.lines().count(), 2);
        assert!(dumped.lines().nth(1).unwrap().starts_with("COMMENT1"));
    }
}
