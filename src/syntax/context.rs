//! Cross-line tokenizer state
//!
//!     A [`LineContext`] is a cons-like stack: the innermost entry names the
//!     rule set currently in effect and the span rule (if any) that is open,
//!     and each delegated span pushes a new entry on top of its parent.
//!     The context a line ends with is deep-cloned to become the next line's
//!     starting state, because tokenizing a line mutates its own copy.

use std::sync::Arc;

use crate::syntax::rules::{ParserRule, ParserRuleSet};

/// Tokenizer state carried from one line to the next.
#[derive(Debug, Clone)]
pub struct LineContext {
    /// The enclosing context when this one was entered via a delegate span.
    pub parent: Option<Box<LineContext>>,
    /// The span or mark rule currently open in this context, if any.
    pub in_rule: Option<Arc<ParserRule>>,
    /// The rule set governing the scan in this context.
    pub rules: Arc<ParserRuleSet>,
}

impl LineContext {
    /// The root context: no parent, no open rule, scanning with `rules`
    /// (normally a mode's MAIN set). Used for line 0 and for any line with
    /// no valid predecessor context.
    pub fn root(rules: Arc<ParserRuleSet>) -> Self {
        LineContext {
            parent: None,
            in_rule: None,
            rules,
        }
    }

    pub fn depth(&self) -> usize {
        match &self.parent {
            Some(parent) => parent.depth() + 1,
            None => 1,
        }
    }
}

/// Identity-based equality: two contexts are equal when they reference the
/// same rule sets and the same open rules along the whole parent chain. This
/// is the comparison the marker uses to decide whether a line's end state
/// changed and the next line's cache is stale.
impl PartialEq for LineContext {
    fn eq(&self, other: &Self) -> bool {
        if !Arc::ptr_eq(&self.rules, &other.rules) {
            return false;
        }
        let rules_match = match (&self.in_rule, &other.in_rule) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !rules_match {
            return false;
        }
        match (&self.parent, &other.parent) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for LineContext {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::rules::{action, ParserRule};
    use crate::syntax::token::TokenType;

    fn set() -> Arc<ParserRuleSet> {
        Arc::new(ParserRuleSet::new("test", "MAIN"))
    }

    #[test]
    fn test_root_contexts_compare_by_rule_set_identity() {
        let a = set();
        let b = set();
        assert_eq!(LineContext::root(a.clone()), LineContext::root(a));
        assert_ne!(LineContext::root(set()), LineContext::root(b));
    }

    #[test]
    fn test_open_rule_changes_equality() {
        let rules = set();
        let rule = ParserRule::span("/*", "*/", TokenType::Comment1, 0);
        let plain = LineContext::root(rules.clone());
        let mut open = LineContext::root(rules);
        open.in_rule = Some(rule);
        assert_ne!(plain, open);
    }

    #[test]
    fn test_clone_is_deep() {
        let outer = set();
        let inner = set();
        let mut ctx = LineContext::root(inner);
        ctx.parent = Some(Box::new(LineContext {
            parent: None,
            in_rule: Some(ParserRule::delegate_span(
                "<script>",
                "</script>",
                TokenType::Keyword2,
                "javascript::MAIN",
                action::EXCLUDE_MATCH,
            )),
            rules: outer,
        }));
        let copy = ctx.clone();
        assert_eq!(ctx, copy);
        assert_eq!(copy.depth(), 2);
    }
}
