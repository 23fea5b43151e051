//! PostScript mode.
//!
//!     String literals nest: `(a (b) c)` is one literal. The "LITERAL" set
//!     delegates its inner `(`...`)` span back to itself, so each nesting
//!     level pushes a child context and the span only closes once every
//!     level has popped.

use crate::syntax::keywords::KeywordMap;
use crate::syntax::registry::Mode;
use crate::syntax::rules::{action, ParserRule, ParserRuleSet};
use crate::syntax::token::TokenType::*;

pub fn postscript() -> Mode {
    let mut main = ParserRuleSet::new("postscript", "MAIN");
    main.set_highlight_digits(true);
    main.add_rule(ParserRule::eol_span("%", Comment1, 0));
    main.add_rule(ParserRule::delegate_span("(", ")", Literal1, "LITERAL", 0));
    main.add_rule(ParserRule::span("<", ">", Literal2, 0));
    main.add_rule(ParserRule::mark_following(
        "/",
        Label,
        action::NO_WORD_BREAK,
    ));

    let mut keywords = KeywordMap::new(false);
    for word in [
        "def", "bind", "dict", "begin", "end", "if", "ifelse", "for", "forall", "repeat",
        "loop", "exit", "exec", "dup", "pop", "exch", "copy", "index", "roll", "gsave",
        "grestore", "showpage", "moveto", "lineto", "rlineto", "rmoveto", "curveto", "arc",
        "closepath", "newpath", "stroke", "fill", "show", "findfont", "scalefont", "setfont",
        "translate", "rotate", "scale", "setgray", "setrgbcolor", "setlinewidth",
    ] {
        keywords.add(word, Keyword1);
    }
    for word in [
        "add", "sub", "mul", "div", "idiv", "mod", "neg", "abs", "sqrt", "sin", "cos",
        "atan", "exp", "ln", "log", "round", "truncate", "floor", "ceiling",
    ] {
        keywords.add(word, Keyword2);
    }
    main.set_keywords(keywords);

    let mut literal = ParserRuleSet::new("postscript", "LITERAL");
    literal.set_default(Literal1);
    literal.set_escape("\\");
    literal.add_rule(ParserRule::delegate_span("(", ")", Literal1, "LITERAL", 0));

    Mode::new("postscript", vec![main, literal])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::token::TokenType;

    #[test]
    fn test_literal_set_self_delegates() {
        let mode = postscript();
        let literal = mode.rule_set("LITERAL").unwrap();
        assert_eq!(literal.default_token(), TokenType::Literal1);
        let rules = literal.rules_for(b'(');
        assert_eq!(rules[0].delegate.as_deref(), Some("LITERAL"));
    }
}
