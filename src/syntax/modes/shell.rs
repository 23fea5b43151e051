//! Bourne-family shell mode.

use crate::syntax::keywords::KeywordMap;
use crate::syntax::registry::Mode;
use crate::syntax::rules::{action, ParserRule, ParserRuleSet};
use crate::syntax::token::TokenType::*;

pub fn shell() -> Mode {
    let mut main = ParserRuleSet::new("shell", "MAIN");
    main.set_escape("\\");
    main.add_rule(ParserRule::eol_span("#", Comment1, 0));
    main.add_rule(ParserRule::span("\"", "\"", Literal1, 0));
    main.add_rule(ParserRule::span("'", "'", Literal1, 0));
    main.add_rule(ParserRule::span("`", "`", Literal2, 0));
    // ${...} first so it wins over the bare-$ rule
    main.add_rule(ParserRule::span("${", "}", Variable, 0));
    main.add_rule(ParserRule::mark_following(
        "$",
        Variable,
        action::NO_WORD_BREAK,
    ));

    let mut keywords = KeywordMap::new(false);
    for word in [
        "if", "then", "else", "elif", "fi", "case", "esac", "for", "while", "until", "do",
        "done", "in", "function", "select", "time",
    ] {
        keywords.add(word, Keyword1);
    }
    for word in [
        "echo", "cd", "pwd", "export", "read", "local", "return", "exit", "set", "unset",
        "shift", "trap", "eval", "exec", "source", "alias", "unalias", "test",
    ] {
        keywords.add(word, Keyword2);
    }
    main.set_keywords(keywords);

    Mode::new("shell", vec![main])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollar_rules_ordered_brace_first() {
        let mode = shell();
        let main = mode.main();
        let rules = main.rules_for(b'$');
        assert_eq!(rules[0].begin.as_ref(), b"${");
        assert_eq!(rules[1].begin.as_ref(), b"$");
    }
}
