//! Line-oriented plain-text formats: properties, makefiles, batch files
//! and unified/context diffs.

use crate::syntax::keywords::KeywordMap;
use crate::syntax::registry::Mode;
use crate::syntax::rules::{action, ParserRule, ParserRuleSet};
use crate::syntax::token::TokenType::*;

pub fn properties() -> Mode {
    let mut main = ParserRuleSet::new("properties", "MAIN");
    main.set_escape("\\");
    main.add_rule(ParserRule::eol_span("#", Comment1, action::AT_LINE_START));
    main.add_rule(ParserRule::eol_span("!", Comment1, action::AT_LINE_START));
    // the key is everything before the first separator on the line
    main.add_rule(ParserRule::mark_previous(
        "=",
        Keyword1,
        action::AT_LINE_START | action::EXCLUDE_MATCH,
    ));
    main.add_rule(ParserRule::mark_previous(
        ":",
        Keyword1,
        action::AT_LINE_START | action::EXCLUDE_MATCH,
    ));
    Mode::new("properties", vec![main])
}

pub fn makefile() -> Mode {
    let mut main = ParserRuleSet::new("makefile", "MAIN");
    main.set_escape("\\");
    main.add_rule(ParserRule::eol_span("#", Comment1, 0));
    main.add_rule(ParserRule::mark_previous(
        ":",
        Label,
        action::AT_LINE_START | action::EXCLUDE_MATCH,
    ));
    main.add_rule(ParserRule::span("$(", ")", Keyword2, 0));
    main.add_rule(ParserRule::mark_following(
        "$",
        Variable,
        action::NO_WORD_BREAK,
    ));
    main.add_rule(ParserRule::span("\"", "\"", Literal1, 0));
    main.add_rule(ParserRule::span("'", "'", Literal1, 0));
    Mode::new("makefile", vec![main])
}

pub fn batch() -> Mode {
    let mut main = ParserRuleSet::new("batch", "MAIN");
    main.set_ignore_case(true);
    main.add_rule(ParserRule::eol_span("rem ", Comment1, action::AT_LINE_START));
    // "::" comment must be tried before the ":label" rule
    main.add_rule(ParserRule::eol_span("::", Comment1, action::AT_LINE_START));
    main.add_rule(ParserRule::eol_span(":", Label, action::AT_LINE_START));
    main.add_rule(ParserRule::span("\"", "\"", Literal1, action::NO_LINE_BREAK));
    main.add_rule(ParserRule::mark_following(
        "%",
        Variable,
        action::NO_WORD_BREAK,
    ));

    let mut keywords = KeywordMap::new(true);
    for word in [
        "echo", "set", "if", "else", "not", "exist", "errorlevel", "goto", "call", "exit",
        "for", "in", "do", "shift", "pause", "choice", "start", "setlocal", "endlocal",
        "copy", "del", "move", "md", "mkdir", "rd", "rmdir", "cd", "type", "cls", "dir",
    ] {
        keywords.add(word, Keyword1);
    }
    for word in ["on", "off", "nul", "con"] {
        keywords.add(word, Literal2);
    }
    main.set_keywords(keywords);

    Mode::new("batch", vec![main])
}

pub fn patch() -> Mode {
    let mut main = ParserRuleSet::new("patch", "MAIN");
    // header lines before the single-character add/remove markers
    main.add_rule(ParserRule::eol_span("+++", Label, action::AT_LINE_START));
    main.add_rule(ParserRule::eol_span("+", Keyword1, action::AT_LINE_START));
    main.add_rule(ParserRule::eol_span("---", Label, action::AT_LINE_START));
    main.add_rule(ParserRule::eol_span("-", Keyword2, action::AT_LINE_START));
    main.add_rule(ParserRule::eol_span("!", Keyword3, action::AT_LINE_START));
    main.add_rule(ParserRule::eol_span("@@", Function, action::AT_LINE_START));
    main.add_rule(ParserRule::eol_span("***", Function, action::AT_LINE_START));
    main.add_rule(ParserRule::eol_span("diff ", Comment2, action::AT_LINE_START));
    main.add_rule(ParserRule::eol_span("Index:", Comment2, action::AT_LINE_START));
    Mode::new("patch", vec![main])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_double_colon_precedes_label() {
        let mode = batch();
        let main = mode.main();
        let rules = main.rules_for(b':');
        assert_eq!(rules[0].begin.as_ref(), b"::");
        assert_eq!(rules[1].begin.as_ref(), b":");
    }

    #[test]
    fn test_patch_header_precedes_marker() {
        let mode = patch();
        let main = mode.main();
        let plus = main.rules_for(b'+');
        assert_eq!(plus[0].begin.as_ref(), b"+++");
        assert_eq!(plus[1].begin.as_ref(), b"+");
        let minus = main.rules_for(b'-');
        assert_eq!(minus[0].begin.as_ref(), b"---");
        assert_eq!(minus[1].begin.as_ref(), b"-");
    }
}
