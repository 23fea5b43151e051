//! Perl mode.

use crate::syntax::keywords::KeywordMap;
use crate::syntax::registry::Mode;
use crate::syntax::rules::{action, ParserRule, ParserRuleSet};
use crate::syntax::token::TokenType::*;

pub fn perl() -> Mode {
    let mut main = ParserRuleSet::new("perl", "MAIN");
    main.set_escape("\\");
    main.set_highlight_digits(true);
    main.add_rule(ParserRule::eol_span("#", Comment1, 0));
    // POD blocks run from a line-start =pod (or any =directive) to =cut
    main.add_rule(ParserRule::span(
        "=pod",
        "=cut",
        Comment2,
        action::AT_LINE_START,
    ));
    main.add_rule(ParserRule::span("\"", "\"", Literal1, 0));
    main.add_rule(ParserRule::span("'", "'", Literal1, 0));
    main.add_rule(ParserRule::span("`", "`", Literal2, 0));
    for sigil in ["$", "@", "%"] {
        main.add_rule(ParserRule::mark_following(
            sigil,
            Variable,
            action::NO_WORD_BREAK,
        ));
    }

    let mut keywords = KeywordMap::new(false);
    for word in [
        "my", "our", "local", "sub", "use", "no", "package", "require", "if", "elsif", "else",
        "unless", "while", "until", "for", "foreach", "do", "next", "last", "redo", "return",
        "and", "or", "not", "eq", "ne", "lt", "gt", "le", "ge", "cmp",
    ] {
        keywords.add(word, Keyword1);
    }
    for word in [
        "print", "printf", "open", "close", "die", "warn", "push", "pop", "shift", "unshift",
        "splice", "join", "split", "map", "grep", "sort", "keys", "values", "each", "defined",
        "undef", "chomp", "chop", "length", "substr", "index", "scalar", "wantarray", "ref",
        "bless", "exists", "delete",
    ] {
        keywords.add(word, Keyword2);
    }
    main.set_keywords(keywords);

    Mode::new("perl", vec![main])
}
