//! TeX/LaTeX mode.

use crate::syntax::registry::Mode;
use crate::syntax::rules::{action, ParserRule, ParserRuleSet};
use crate::syntax::token::TokenType::*;

pub fn tex() -> Mode {
    let mut main = ParserRuleSet::new("tex", "MAIN");
    main.add_rule(ParserRule::eol_span("%", Comment1, 0));
    // escaped specials are literal text, not control sequences
    main.add_rule(ParserRule::seq("\\%", Keyword1));
    main.add_rule(ParserRule::seq("\\$", Keyword1));
    main.add_rule(ParserRule::seq("\\&", Keyword1));
    main.add_rule(ParserRule::seq("\\#", Keyword1));
    main.add_rule(ParserRule::seq("\\\\", Keyword1));
    main.add_rule(ParserRule::mark_following(
        "\\",
        Keyword1,
        action::NO_WORD_BREAK,
    ));
    // display math before inline math in the $ bucket
    main.add_rule(ParserRule::span("$$", "$$", Literal1, 0));
    main.add_rule(ParserRule::span("$", "$", Literal1, 0));
    main.add_rule(ParserRule::seq("{", Operator));
    main.add_rule(ParserRule::seq("}", Operator));
    main.add_rule(ParserRule::seq("&", Operator));
    Mode::new("tex", vec![main])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslash_sequences_precede_control_word_rule() {
        let mode = tex();
        let main = mode.main();
        let rules = main.rules_for(b'\\');
        assert_eq!(rules[0].begin.as_ref(), b"\\%");
        assert!(rules.last().unwrap().begin.as_ref() == b"\\");
    }

    #[test]
    fn test_display_math_precedes_inline_math() {
        let mode = tex();
        let main = mode.main();
        let rules = main.rules_for(b'$');
        assert_eq!(rules[0].begin.as_ref(), b"$$");
        assert_eq!(rules[1].begin.as_ref(), b"$");
    }
}
