//! Parser rules and rule sets
//!
//!     A [`ParserRule`] is an immutable match descriptor: a literal byte
//!     sequence (plus an end sequence for spans), an action bitmask, and the
//!     token type the match produces. Rules live in a [`ParserRuleSet`],
//!     which also carries the per-language knobs: keyword map, escape rule,
//!     default token type, case sensitivity, digit highlighting, and an
//!     optional scan cutoff.
//!
//! Dispatch
//!
//!     Rules are bucketed by the upper-cased first byte of their match
//!     sequence, so the scanner only ever considers the handful of rules
//!     that could start at the current byte. Within a bucket, rules are
//!     tried in the order they were added and the first structural match
//!     wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::syntax::keywords::KeywordMap;
use crate::syntax::token::TokenType;

/// Action bitmask for [`ParserRule`]. One major action (or none, for a plain
/// sequence match) combined with any number of hint flags.
pub mod action {
    /// Begin/end region with its own token type.
    pub const SPAN: u16 = 1 << 0;
    /// Mark the pending text before the match, not the match itself.
    pub const MARK_PREVIOUS: u16 = 1 << 1;
    /// Mark everything after the match until another rule fires.
    pub const MARK_FOLLOWING: u16 = 1 << 2;
    /// Match through to the end of the line.
    pub const EOL_SPAN: u16 = 1 << 3;

    pub const MAJOR_ACTIONS: u16 = SPAN | MARK_PREVIOUS | MARK_FOLLOWING | EOL_SPAN;

    /// Emit the delimiter with the rule set's default type instead of the
    /// rule's type. Never changes whether the delimiter is consumed.
    pub const EXCLUDE_MATCH: u16 = 1 << 5;
    /// Only fires in the first column.
    pub const AT_LINE_START: u16 = 1 << 6;
    /// The span must close before end of line, else it is re-marked INVALID.
    pub const NO_LINE_BREAK: u16 = 1 << 7;
    /// The span must close before a word break. On a true span a word break
    /// re-marks it INVALID; on MARK_FOLLOWING it is the normal terminator.
    pub const NO_WORD_BREAK: u16 = 1 << 8;
    /// The match escapes the following byte instead of starting a token.
    pub const IS_ESCAPE: u16 = 1 << 9;
    /// The span's interior is tokenized with another named rule set.
    pub const DELEGATE: u16 = 1 << 10;
}

/// An immutable rule descriptor. Build one through the constructors and wrap
/// it in `Arc` via the same; rules are shared between rule sets' dispatch
/// buckets and the line contexts that reference them as the active span.
pub struct ParserRule {
    pub action: u16,
    pub begin: Box<[u8]>,
    pub end: Box<[u8]>,
    pub token: TokenType,
    /// Delegate target, `SET` or `mode::SET`, for [`action::DELEGATE`] rules.
    pub delegate: Option<String>,
    /// Lazily resolved delegate rule set. `Some(None)` records a failed
    /// resolution so it is not retried (and not re-logged) per line.
    pub(crate) resolved: OnceCell<Option<Arc<ParserRuleSet>>>,
}

impl ParserRule {
    fn new(action: u16, begin: &str, end: &str, token: TokenType) -> Arc<Self> {
        assert!(
            !begin.is_empty(),
            "parser rule must have a non-empty match sequence"
        );
        Arc::new(ParserRule {
            action,
            begin: begin.as_bytes().into(),
            end: end.as_bytes().into(),
            token,
            delegate: None,
            resolved: OnceCell::new(),
        })
    }

    /// A plain literal sequence match.
    pub fn seq(seq: &str, token: TokenType) -> Arc<Self> {
        Self::new(0, seq, "", token)
    }

    /// A begin/end span. `flags` may add hints such as
    /// [`action::NO_LINE_BREAK`] or [`action::EXCLUDE_MATCH`].
    pub fn span(begin: &str, end: &str, token: TokenType, flags: u16) -> Arc<Self> {
        assert!(!end.is_empty(), "span rule must have a non-empty end");
        Self::new(action::SPAN | flags, begin, end, token)
    }

    /// A span whose interior is tokenized with the rule set named
    /// `delegate` (`SET` within the same mode, or `mode::SET`).
    pub fn delegate_span(
        begin: &str,
        end: &str,
        token: TokenType,
        delegate: &str,
        flags: u16,
    ) -> Arc<Self> {
        assert!(
            !begin.is_empty(),
            "parser rule must have a non-empty match sequence"
        );
        assert!(!end.is_empty(), "span rule must have a non-empty end");
        Arc::new(ParserRule {
            action: action::SPAN | action::DELEGATE | flags,
            begin: begin.as_bytes().into(),
            end: end.as_bytes().into(),
            token,
            delegate: Some(delegate.to_string()),
            resolved: OnceCell::new(),
        })
    }

    /// A match-to-end-of-line rule (`//` comments and the like).
    pub fn eol_span(seq: &str, token: TokenType, flags: u16) -> Arc<Self> {
        Self::new(action::EOL_SPAN | flags, seq, "", token)
    }

    /// Marks the pending text before the match (label colons, continuation
    /// backslashes).
    pub fn mark_previous(seq: &str, token: TokenType, flags: u16) -> Arc<Self> {
        Self::new(action::MARK_PREVIOUS | flags, seq, "", token)
    }

    /// Marks everything after the match until another rule fires, or — with
    /// [`action::NO_WORD_BREAK`] — until a word break.
    pub fn mark_following(seq: &str, token: TokenType, flags: u16) -> Arc<Self> {
        Self::new(action::MARK_FOLLOWING | flags, seq, "", token)
    }

    /// An escape rule: the sequence plus the byte after it are always treated
    /// as literal content.
    pub fn escape(seq: &str) -> Arc<Self> {
        Self::new(action::IS_ESCAPE, seq, "", TokenType::Null)
    }

    pub fn has(&self, flag: u16) -> bool {
        self.action & flag != 0
    }

    pub fn major_action(&self) -> u16 {
        self.action & action::MAJOR_ACTIONS
    }

    pub fn is_span(&self) -> bool {
        self.major_action() == action::SPAN
    }
}

impl fmt::Debug for ParserRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParserRule({:?}, action={:#x}, token={})",
            String::from_utf8_lossy(&self.begin),
            self.action,
            self.token
        )
    }
}

/// A named collection of rules for one lexical context of a language.
///
/// Mutable while a mode is being assembled, immutable (behind `Arc`) once it
/// is registered. The set named `MAIN` is the root context of a mode.
pub struct ParserRuleSet {
    mode: String,
    name: String,
    default: TokenType,
    ignore_case: bool,
    highlight_digits: bool,
    terminate_at: Option<usize>,
    escape_rule: Option<Arc<ParserRule>>,
    keywords: Option<KeywordMap>,
    rules: HashMap<u8, Vec<Arc<ParserRule>>>,
}

impl ParserRuleSet {
    pub fn new(mode: &str, name: &str) -> Self {
        ParserRuleSet {
            mode: mode.to_string(),
            name: name.to_string(),
            default: TokenType::Null,
            ignore_case: false,
            highlight_digits: false,
            terminate_at: None,
            escape_rule: None,
            keywords: None,
            rules: HashMap::new(),
        }
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `mode::name` form delegate references use.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.mode, self.name)
    }

    pub fn set_default(&mut self, default: TokenType) {
        self.default = default;
    }

    pub fn default_token(&self) -> TokenType {
        self.default
    }

    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        self.ignore_case = ignore_case;
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn set_highlight_digits(&mut self, highlight_digits: bool) {
        self.highlight_digits = highlight_digits;
    }

    pub fn highlight_digits(&self) -> bool {
        self.highlight_digits
    }

    /// Stops rule matching once the scan position reaches `at`; the rest of
    /// the line is flushed under the end-of-line policy.
    pub fn set_terminate_at(&mut self, at: usize) {
        self.terminate_at = Some(at);
    }

    pub fn terminate_at(&self) -> Option<usize> {
        self.terminate_at
    }

    pub fn set_escape(&mut self, seq: &str) {
        self.escape_rule = Some(ParserRule::escape(seq));
    }

    pub fn escape_rule(&self) -> Option<&Arc<ParserRule>> {
        self.escape_rule.as_ref()
    }

    pub fn set_keywords(&mut self, keywords: KeywordMap) {
        self.keywords = Some(keywords);
    }

    pub fn keywords(&self) -> Option<&KeywordMap> {
        self.keywords.as_ref()
    }

    pub fn add_rule(&mut self, rule: Arc<ParserRule>) {
        let key = rule.begin[0].to_ascii_uppercase();
        self.rules.entry(key).or_default().push(rule);
    }

    /// The candidate rules for a byte, in the order they were added.
    pub fn rules_for(&self, byte: u8) -> &[Arc<ParserRule>] {
        self.rules
            .get(&byte.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}

impl fmt::Debug for ParserRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParserRuleSet({}, {} rules)",
            self.qualified_name(),
            self.rule_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_bucketed_by_first_byte_case_folded() {
        let mut set = ParserRuleSet::new("test", "MAIN");
        set.add_rule(ParserRule::seq("rem", TokenType::Comment1));
        assert_eq!(set.rules_for(b'r').len(), 1);
        assert_eq!(set.rules_for(b'R').len(), 1);
        assert_eq!(set.rules_for(b'x').len(), 0);
    }

    #[test]
    fn test_bucket_preserves_insertion_order() {
        let mut set = ParserRuleSet::new("test", "MAIN");
        set.add_rule(ParserRule::seq("+++", TokenType::Label));
        set.add_rule(ParserRule::seq("+", TokenType::Literal1));
        let rules = set.rules_for(b'+');
        assert_eq!(rules[0].begin.as_ref(), b"+++");
        assert_eq!(rules[1].begin.as_ref(), b"+");
    }

    #[test]
    fn test_major_action_and_flags() {
        let rule = ParserRule::span(
            "\"",
            "\"",
            TokenType::Literal1,
            action::NO_LINE_BREAK,
        );
        assert!(rule.is_span());
        assert!(rule.has(action::NO_LINE_BREAK));
        assert!(!rule.has(action::DELEGATE));
    }

    #[test]
    #[should_panic]
    fn test_empty_sequence_is_a_construction_error() {
        ParserRule::seq("", TokenType::Null);
    }

    #[test]
    fn test_qualified_name() {
        let set = ParserRuleSet::new("html", "TAGS");
        assert_eq!(set.qualified_name(), "html::TAGS");
    }
}
