//! C, C++, Java and JavaScript modes.
//!
//! The four share the comment/string/preprocessor surface; they differ in
//! keyword tables and, for Java, the doc-comment span.

use crate::syntax::keywords::KeywordMap;
use crate::syntax::registry::Mode;
use crate::syntax::rules::{action, ParserRule, ParserRuleSet};
use crate::syntax::token::TokenType::*;

fn c_like_main(mode: &str) -> ParserRuleSet {
    let mut main = ParserRuleSet::new(mode, "MAIN");
    main.set_escape("\\");
    main.set_highlight_digits(true);
    main.add_rule(ParserRule::span("/*", "*/", Comment1, 0));
    main.add_rule(ParserRule::eol_span("//", Comment1, 0));
    main.add_rule(ParserRule::span(
        "\"",
        "\"",
        Literal1,
        action::NO_LINE_BREAK,
    ));
    main.add_rule(ParserRule::span("'", "'", Literal1, action::NO_LINE_BREAK));
    main.add_rule(ParserRule::mark_previous(
        ":",
        Label,
        action::AT_LINE_START | action::EXCLUDE_MATCH,
    ));
    main
}

fn add_all(map: &mut KeywordMap, words: &[&str], id: crate::syntax::token::TokenType) {
    for word in words {
        map.add(word, id);
    }
}

const C_CONTROL: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
    "return", "goto", "sizeof", "typedef", "struct", "union", "enum", "static", "register",
    "extern", "const", "volatile", "inline",
];

const C_TYPES: &[&str] = &[
    "int", "char", "long", "short", "float", "double", "void", "signed", "unsigned",
];

pub fn c() -> Mode {
    let mut main = c_like_main("c");
    main.add_rule(ParserRule::mark_following(
        "#",
        Keyword2,
        action::AT_LINE_START,
    ));
    let mut keywords = KeywordMap::new(false);
    add_all(&mut keywords, C_CONTROL, Keyword1);
    add_all(&mut keywords, C_TYPES, Keyword3);
    add_all(&mut keywords, &["NULL", "true", "false"], Literal2);
    main.set_keywords(keywords);
    Mode::new("c", vec![main])
}

pub fn cpp() -> Mode {
    let mut main = c_like_main("cpp");
    main.add_rule(ParserRule::mark_following(
        "#",
        Keyword2,
        action::AT_LINE_START,
    ));
    let mut keywords = KeywordMap::new(false);
    add_all(&mut keywords, C_CONTROL, Keyword1);
    add_all(
        &mut keywords,
        &[
            "class", "namespace", "template", "typename", "public", "private", "protected",
            "virtual", "friend", "operator", "new", "delete", "this", "throw", "try", "catch",
            "using", "explicit", "mutable",
        ],
        Keyword1,
    );
    add_all(&mut keywords, C_TYPES, Keyword3);
    add_all(&mut keywords, &["bool", "wchar_t", "auto"], Keyword3);
    add_all(&mut keywords, &["NULL", "nullptr", "true", "false"], Literal2);
    main.set_keywords(keywords);
    Mode::new("cpp", vec![main])
}

pub fn java() -> Mode {
    let mut main = ParserRuleSet::new("java", "MAIN");
    main.set_escape("\\");
    main.set_highlight_digits(true);
    // doc comments first so they win over plain block comments
    main.add_rule(ParserRule::span("/**", "*/", Comment2, 0));
    main.add_rule(ParserRule::span("/*", "*/", Comment1, 0));
    main.add_rule(ParserRule::eol_span("//", Comment1, 0));
    main.add_rule(ParserRule::span(
        "\"",
        "\"",
        Literal1,
        action::NO_LINE_BREAK,
    ));
    main.add_rule(ParserRule::span("'", "'", Literal1, action::NO_LINE_BREAK));
    main.add_rule(ParserRule::mark_previous(
        ":",
        Label,
        action::AT_LINE_START | action::EXCLUDE_MATCH,
    ));
    let mut keywords = KeywordMap::new(false);
    add_all(
        &mut keywords,
        &[
            "if", "else", "for", "while", "do", "switch", "case", "default", "break",
            "continue", "return", "try", "catch", "finally", "throw", "throws", "new",
            "instanceof", "extends", "implements", "import", "package", "interface", "class",
            "abstract", "final", "public", "private", "protected", "static", "synchronized",
            "native", "transient", "volatile", "strictfp", "assert",
        ],
        Keyword1,
    );
    add_all(
        &mut keywords,
        &[
            "boolean", "byte", "char", "double", "float", "int", "long", "short", "void",
        ],
        Keyword3,
    );
    add_all(
        &mut keywords,
        &["true", "false", "null", "this", "super"],
        Literal2,
    );
    main.set_keywords(keywords);
    Mode::new("java", vec![main])
}

pub fn javascript() -> Mode {
    let mut main = c_like_main("javascript");
    let mut keywords = KeywordMap::new(false);
    add_all(
        &mut keywords,
        &[
            "function", "var", "let", "const", "return", "if", "else", "for", "while", "do",
            "break", "continue", "new", "delete", "typeof", "instanceof", "in", "of", "switch",
            "case", "default", "try", "catch", "finally", "throw", "class", "extends", "super",
            "yield", "async", "await", "import", "export", "void",
        ],
        Keyword1,
    );
    add_all(
        &mut keywords,
        &["true", "false", "null", "undefined", "this", "NaN", "Infinity"],
        Literal2,
    );
    main.set_keywords(keywords);
    Mode::new("javascript", vec![main])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::token::TokenType;

    #[test]
    fn test_c_keyword_tables() {
        let mode = c();
        let main = mode.main();
        let map = main.keywords().unwrap();
        assert_eq!(map.lookup(b"int", 0, 3), TokenType::Keyword3);
        assert_eq!(map.lookup(b"return", 0, 6), TokenType::Keyword1);
        // case-sensitive: C keywords are lowercase only
        assert_eq!(map.lookup(b"INT", 0, 3), TokenType::Null);
    }

    #[test]
    fn test_java_doc_comment_rule_precedes_block_comment() {
        let mode = java();
        let main = mode.main();
        let rules = main.rules_for(b'/');
        assert_eq!(rules[0].begin.as_ref(), b"/**");
        assert_eq!(rules[1].begin.as_ref(), b"/*");
    }
}
