//! HTML, XML and PHP modes.
//!
//!     The three markup modes stack delegation: tag bodies hand off to a
//!     shared "TAGS" set, `<script>` blocks in HTML hand off to the
//!     JavaScript main set, and PHP wraps the HTML surface around a `<?php`
//!     span delegating to its own C-flavoured set.

use crate::syntax::keywords::KeywordMap;
use crate::syntax::registry::Mode;
use crate::syntax::rules::{action, ParserRule, ParserRuleSet};
use crate::syntax::token::TokenType::*;

fn tags_set(mode: &str) -> ParserRuleSet {
    let mut tags = ParserRuleSet::new(mode, "TAGS");
    tags.add_rule(ParserRule::span("\"", "\"", Literal1, 0));
    tags.add_rule(ParserRule::span("'", "'", Literal1, 0));
    tags.add_rule(ParserRule::seq("=", Operator));
    tags
}

pub fn html() -> Mode {
    let mut main = ParserRuleSet::new("html", "MAIN");
    main.set_ignore_case(true);
    main.add_rule(ParserRule::span("<!--", "-->", Comment1, 0));
    main.add_rule(ParserRule::delegate_span(
        "<script>",
        "</script>",
        Keyword2,
        "javascript::MAIN",
        0,
    ));
    main.add_rule(ParserRule::span("<!", ">", Comment2, 0));
    main.add_rule(ParserRule::delegate_span("<", ">", Keyword1, "TAGS", 0));
    // entities: &amp; &#160; and the like
    main.add_rule(ParserRule::span("&", ";", Literal2, action::NO_WORD_BREAK));

    Mode::new("html", vec![main, tags_set("html")])
}

pub fn xml() -> Mode {
    let mut main = ParserRuleSet::new("xml", "MAIN");
    main.add_rule(ParserRule::span("<!--", "-->", Comment1, 0));
    main.add_rule(ParserRule::span("<![CDATA[", "]]>", Literal1, 0));
    main.add_rule(ParserRule::span("<!", ">", Comment2, 0));
    main.add_rule(ParserRule::span("<?", "?>", Keyword2, 0));
    main.add_rule(ParserRule::delegate_span("<", ">", Keyword1, "TAGS", 0));
    main.add_rule(ParserRule::span("&", ";", Literal2, action::NO_WORD_BREAK));

    Mode::new("xml", vec![main, tags_set("xml")])
}

pub fn php() -> Mode {
    let mut main = ParserRuleSet::new("php", "MAIN");
    main.set_ignore_case(true);
    main.add_rule(ParserRule::span("<!--", "-->", Comment1, 0));
    // the code span must come before the bare <? and <...> rules
    main.add_rule(ParserRule::delegate_span(
        "<?php",
        "?>",
        Keyword2,
        "PHP",
        0,
    ));
    main.add_rule(ParserRule::delegate_span("<?", "?>", Keyword2, "PHP", 0));
    main.add_rule(ParserRule::delegate_span(
        "<script>",
        "</script>",
        Keyword2,
        "javascript::MAIN",
        0,
    ));
    main.add_rule(ParserRule::span("<!", ">", Comment2, 0));
    main.add_rule(ParserRule::delegate_span("<", ">", Keyword1, "TAGS", 0));
    main.add_rule(ParserRule::span("&", ";", Literal2, action::NO_WORD_BREAK));

    let mut code = ParserRuleSet::new("php", "PHP");
    code.set_escape("\\");
    code.set_highlight_digits(true);
    code.add_rule(ParserRule::span("/*", "*/", Comment1, 0));
    code.add_rule(ParserRule::eol_span("//", Comment1, 0));
    code.add_rule(ParserRule::eol_span("#", Comment1, 0));
    code.add_rule(ParserRule::span("\"", "\"", Literal1, 0));
    code.add_rule(ParserRule::span("'", "'", Literal1, 0));
    code.add_rule(ParserRule::mark_following(
        "$",
        Variable,
        action::NO_WORD_BREAK,
    ));
    let mut keywords = KeywordMap::new(true);
    for word in [
        "if", "else", "elseif", "endif", "for", "foreach", "endforeach", "while", "endwhile",
        "do", "switch", "case", "default", "break", "continue", "return", "function", "class",
        "extends", "implements", "interface", "new", "try", "catch", "finally", "throw",
        "public", "private", "protected", "static", "const", "global", "namespace", "use",
        "require", "require_once", "include", "include_once", "echo", "print", "and", "or",
        "xor", "as", "instanceof",
    ] {
        keywords.add(word, Keyword1);
    }
    for word in ["true", "false", "null"] {
        keywords.add(word, Literal2);
    }
    for word in [
        "array", "isset", "unset", "empty", "count", "strlen", "strpos", "substr", "implode",
        "explode", "printf", "sprintf", "die", "exit", "list",
    ] {
        keywords.add(word, Keyword2);
    }
    code.set_keywords(keywords);

    Mode::new("php", vec![main, code, tags_set("php")])
}
