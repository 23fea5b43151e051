//! The incremental line tokenizer
//!
//!     [`TokenMarker::mark_tokens`] tokenizes one line given the context the
//!     previous line ended with, producing the line's token list and the
//!     context to cache for the next line. The marker also owns the per-line
//!     context cache and keeps it aligned with the host document through
//!     [`insert_lines`](TokenMarker::insert_lines) /
//!     [`delete_lines`](TokenMarker::delete_lines) /
//!     [`lines_changed`](TokenMarker::lines_changed).
//!
//! Scan order
//!
//!     At every position the scanner checks, in order: the scan cutoff, the
//!     active rule set's escape rule, the end of an open hard span, the end
//!     of the enclosing delegate span, the termination of a word-bounded
//!     mark-following run, and finally the candidate rules bucketed under
//!     the current byte. The innermost open construct always wins — a quote
//!     inside a delegated string closes the string, never the delegate.
//!
//! Recovery
//!
//!     A span carrying NO_LINE_BREAK (or NO_WORD_BREAK) that fails to close
//!     in time is re-marked INVALID from its opening delimiter and the
//!     context is restored to the state before the span opened. Malformed
//!     input therefore never prevents a line from tokenizing completely.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::syntax::context::LineContext;
use crate::syntax::registry::{Mode, ModeRegistry};
use crate::syntax::rules::{action, ParserRule, ParserRuleSet};
use crate::syntax::token::{push_token, Token, TokenType};

/// Decimal, hex and octal numeral shapes, with an optional long suffix.
static DIGIT_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:0[xX][0-9a-fA-F]+|[0-9]+)[lL]?$").unwrap());

fn is_word_byte(b: u8) -> bool {
    // Bytes >= 0x80 are UTF-8 continuation/lead bytes; treating them all as
    // word characters keeps multi-byte text inside a single keyword run.
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// The result of tokenizing one line.
#[derive(Debug, Clone)]
pub struct MarkedLine {
    /// Token lengths sum to the line's byte length; adjacent tokens never
    /// share a type.
    pub tokens: Vec<Token>,
    /// The context this line ends with, cached for the next line.
    pub context: LineContext,
    /// True when the end context differs from what this line produced last
    /// time, i.e. the next line's cached tokens are stale.
    pub next_line_changed: bool,
}

#[derive(Default)]
struct CachedLine {
    context: Option<LineContext>,
    valid: bool,
}

/// The rule-driven incremental tokenizer for one document.
///
/// Each marker instance is independent; documents on different threads may
/// tokenize concurrently as long as each document serializes its own calls.
pub struct TokenMarker {
    mode: Arc<Mode>,
    registry: Arc<ModeRegistry>,
    lines: Vec<CachedLine>,
}

impl TokenMarker {
    pub fn new(mode: Arc<Mode>, registry: Arc<ModeRegistry>) -> Self {
        TokenMarker {
            mode,
            registry,
            lines: Vec::new(),
        }
    }

    /// A marker for one of the built-in modes.
    pub fn for_mode(name: &str) -> Option<Self> {
        let registry = ModeRegistry::builtin();
        let mode = registry.mode(name)?;
        Some(TokenMarker::new(mode, registry))
    }

    pub fn mode(&self) -> &Arc<Mode> {
        &self.mode
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Notifies the marker that `count` lines were inserted before `index`.
    pub fn insert_lines(&mut self, index: usize, count: usize) {
        assert!(
            index <= self.lines.len(),
            "insert_lines index {index} out of range ({} lines)",
            self.lines.len()
        );
        self.lines
            .splice(index..index, (0..count).map(|_| CachedLine::default()));
    }

    /// Notifies the marker that `count` lines starting at `index` were
    /// removed.
    pub fn delete_lines(&mut self, index: usize, count: usize) {
        assert!(
            index + count <= self.lines.len(),
            "delete_lines range {index}..{} out of range ({} lines)",
            index + count,
            self.lines.len()
        );
        self.lines.drain(index..index + count);
    }

    /// Notifies the marker that the text of `count` lines starting at
    /// `index` changed.
    pub fn lines_changed(&mut self, index: usize, count: usize) {
        assert!(
            index + count <= self.lines.len(),
            "lines_changed range {index}..{} out of range ({} lines)",
            index + count,
            self.lines.len()
        );
        for line in &mut self.lines[index..index + count] {
            line.valid = false;
        }
    }

    /// Tokenizes line `index`, whose text is `line` (without the newline).
    ///
    /// The input context is the cached end context of line `index - 1`; when
    /// there is none (line 0, or the predecessor was invalidated and not yet
    /// re-marked) a fresh root context on the mode's MAIN set is used.
    ///
    /// Panics when `index` was never declared via [`insert_lines`]; that is
    /// a host contract violation.
    pub fn mark_tokens(&mut self, line: &str, index: usize) -> MarkedLine {
        assert!(
            index < self.lines.len(),
            "mark_tokens line {index} out of range ({} lines)",
            self.lines.len()
        );
        let previous = if index == 0 {
            None
        } else {
            let prev = &self.lines[index - 1];
            if prev.valid { prev.context.clone() } else { None }
        };
        let start = previous.unwrap_or_else(|| LineContext::root(self.mode.main()));

        let scanner = Scanner::new(line.as_bytes(), start, &self.registry);
        let (tokens, context) = scanner.run();

        let slot = &mut self.lines[index];
        let next_line_changed = match &slot.context {
            Some(old) => *old != context,
            None => true,
        };
        slot.context = Some(context.clone());
        slot.valid = true;

        MarkedLine {
            tokens,
            context,
            next_line_changed,
        }
    }

    /// Tokenizes a whole buffer, feeding each line's end context into the
    /// next line. Resets the per-line cache to match the buffer.
    pub fn mark_all(&mut self, text: &str) -> Vec<MarkedLine> {
        let lines: Vec<&str> = text.lines().collect();
        self.lines.clear();
        self.insert_lines(0, lines.len());
        lines
            .iter()
            .enumerate()
            .map(|(index, line)| self.mark_tokens(line, index))
            .collect()
    }
}

/// Bookkeeping for an open span that may not cross a line (or word) break:
/// enough to re-mark it INVALID from its opening delimiter.
struct PendingSpan {
    rule: Arc<ParserRule>,
    token_index: usize,
    start: usize,
    /// The context in effect just before the span opened.
    outer: LineContext,
}

struct Scanner<'a> {
    line: &'a [u8],
    registry: &'a ModeRegistry,
    context: LineContext,
    tokens: Vec<Token>,
    pos: usize,
    /// Start of the text not yet emitted as a token.
    last_offset: usize,
    /// Start of the current keyword/digit candidate run.
    last_keyword: usize,
    pending_spans: Vec<PendingSpan>,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a [u8], context: LineContext, registry: &'a ModeRegistry) -> Self {
        Scanner {
            line,
            registry,
            context,
            tokens: Vec::new(),
            pos: 0,
            last_offset: 0,
            last_keyword: 0,
            pending_spans: Vec::new(),
        }
    }

    fn run(mut self) -> (Vec<Token>, LineContext) {
        let len = self.line.len();

        'scan: while self.pos < len {
            if let Some(at) = self.context.rules.terminate_at() {
                if self.pos >= at {
                    break;
                }
            }

            // The active set's escape consumes itself plus the next byte.
            if let Some(esc) = self.context.rules.escape_rule().cloned() {
                if self.matches_at(self.pos, &esc.begin, self.context.rules.ignore_case()) {
                    self.pos = (self.pos + esc.begin.len() + 1).min(len);
                    continue;
                }
            }

            // Inside a hard span only its own end sequence can fire.
            if let Some(rule) = self.context.in_rule.clone().filter(|r| r.is_span()) {
                if rule.has(action::NO_WORD_BREAK) && self.line[self.pos].is_ascii_whitespace() {
                    self.abort_open_span();
                    continue;
                }
                if self.matches_at(self.pos, &rule.end, self.context.rules.ignore_case()) {
                    self.flush(self.pos, rule.token);
                    let delim = self.delimiter_token(&rule);
                    self.emit(delim, rule.end.len());
                    self.context.in_rule = None;
                    self.forget_pending(&rule);
                } else {
                    self.pos += 1;
                }
                continue;
            }

            // End of the enclosing delegate span.
            if let Some(parent_rule) = self.parent_delegate_rule() {
                let parent_ignore_case = self
                    .context
                    .parent
                    .as_ref()
                    .map(|p| p.rules.ignore_case())
                    .unwrap_or(false);
                if self.matches_at(self.pos, &parent_rule.end, parent_ignore_case) {
                    self.close_pending_text();
                    let parent = self
                        .context
                        .parent
                        .take()
                        .expect("delegate context has a parent");
                    self.context = *parent;
                    let delim = self.delimiter_token(&parent_rule);
                    self.emit(delim, parent_rule.end.len());
                    self.context.in_rule = None;
                    self.forget_pending(&parent_rule);
                    continue;
                }
            }

            let c = self.line[self.pos];

            // A word-bounded mark-following run ends at the first word break;
            // a soft one runs until another rule fires.
            if let Some(rule) = self.context.in_rule.clone() {
                if rule.has(action::NO_WORD_BREAK) {
                    if is_word_byte(c) {
                        self.pos += 1;
                    } else {
                        self.flush(self.pos, rule.token);
                        self.context.in_rule = None;
                        self.last_keyword = self.pos;
                        // the byte is reprocessed as plain text next round
                    }
                    continue;
                }
            }

            let set = self.context.rules.clone();
            for rule in set.rules_for(c) {
                if self.structural_match(rule) {
                    if let Some(soft) = self.context.in_rule.take() {
                        self.flush(self.pos, soft.token);
                        self.last_keyword = self.pos;
                    }
                    self.apply_rule(rule.clone());
                    continue 'scan;
                }
            }

            if self.context.in_rule.is_none() && !is_word_byte(c) {
                self.do_keyword(self.pos);
            }
            self.pos += 1;
        }

        self.finish_line()
    }

    fn finish_line(mut self) -> (Vec<Token>, LineContext) {
        self.pos = self.line.len();

        // Spans that may not cross the line boundary recover as INVALID.
        while self.line_break_forbidden() {
            if !self.abort_open_span() {
                break;
            }
        }

        match self.context.in_rule.clone() {
            Some(rule) if rule.is_span() => {
                // the open span carries into the next line
                self.flush(self.pos, rule.token);
            }
            Some(rule) => {
                // mark-following runs never cross lines
                self.flush(self.pos, rule.token);
                self.context.in_rule = None;
            }
            None => {
                self.do_keyword(self.pos);
                let default = self.context.rules.default_token();
                self.flush(self.pos, default);
            }
        }

        (self.tokens, self.context)
    }

    /// True when some open span up the context chain forbids crossing the
    /// line boundary.
    fn line_break_forbidden(&self) -> bool {
        let mut ctx = Some(&self.context);
        while let Some(c) = ctx {
            if let Some(rule) = &c.in_rule {
                if rule.is_span()
                    && (rule.has(action::NO_LINE_BREAK) || rule.has(action::NO_WORD_BREAK))
                {
                    return true;
                }
            }
            ctx = c.parent.as_deref();
        }
        false
    }

    /// Re-marks the innermost bounded span as INVALID from its opening
    /// delimiter and restores the context from before it opened. Returns
    /// false when there is nothing to abort.
    fn abort_open_span(&mut self) -> bool {
        let Some(pending) = self.pending_spans.pop() else {
            return false;
        };
        self.tokens.truncate(pending.token_index);
        push_token(&mut self.tokens, TokenType::Invalid, self.pos - pending.start);
        self.last_offset = self.pos;
        self.last_keyword = self.pos;
        self.context = pending.outer;
        true
    }

    fn forget_pending(&mut self, rule: &Arc<ParserRule>) {
        if let Some(top) = self.pending_spans.last() {
            if Arc::ptr_eq(&top.rule, rule) {
                self.pending_spans.pop();
            }
        }
    }

    /// The open delegate span rule of the enclosing context, if any.
    fn parent_delegate_rule(&self) -> Option<Arc<ParserRule>> {
        let parent = self.context.parent.as_deref()?;
        let rule = parent.in_rule.as_ref()?;
        if rule.has(action::DELEGATE) {
            Some(rule.clone())
        } else {
            None
        }
    }

    /// Flushes the child context's pending text ahead of a delegate pop.
    fn close_pending_text(&mut self) {
        match self.context.in_rule.take() {
            Some(rule) => {
                // soft mark-following interrupted by the enclosing end
                self.flush(self.pos, rule.token);
            }
            None => {
                self.mark_pending_run();
                let default = self.context.rules.default_token();
                self.flush(self.pos, default);
            }
        }
    }

    /// Tests whether `rule` matches at the scan position: line-start anchor,
    /// literal sequence, and (for delegates) a resolvable target.
    fn structural_match(&self, rule: &Arc<ParserRule>) -> bool {
        if rule.has(action::AT_LINE_START) {
            // MARK_PREVIOUS anchors at the start of the pending run, since
            // the text it marks is what must begin the line.
            let anchor = if rule.major_action() == action::MARK_PREVIOUS {
                self.last_keyword
            } else {
                self.pos
            };
            if anchor != 0 {
                return false;
            }
        }
        if !self.matches_at(self.pos, &rule.begin, self.context.rules.ignore_case()) {
            return false;
        }
        if rule.has(action::DELEGATE) && self.resolve_delegate(rule).is_none() {
            // Unresolvable delegates degrade to a match failure; the text
            // keeps the enclosing set's default type.
            return false;
        }
        true
    }

    fn resolve_delegate(&self, rule: &Arc<ParserRule>) -> Option<Arc<ParserRuleSet>> {
        let target = rule.delegate.as_deref()?;
        rule.resolved
            .get_or_init(|| self.registry.resolve(self.context.rules.mode(), target))
            .clone()
    }

    fn apply_rule(&mut self, rule: Arc<ParserRule>) {
        let match_len = rule.begin.len();
        match rule.major_action() {
            action::SPAN => {
                self.mark_pending_run();
                let default = self.context.rules.default_token();
                self.flush(self.pos, default);
                let outer = self.context.clone();
                let token_index = self.tokens.len();
                let start = self.pos;
                let delim = self.delimiter_token(&rule);
                self.emit(delim, match_len);
                if rule.has(action::DELEGATE) {
                    let target = self
                        .resolve_delegate(&rule)
                        .expect("structural match guarantees a resolved delegate");
                    let mut parent = std::mem::replace(
                        &mut self.context,
                        LineContext::root(target),
                    );
                    parent.in_rule = Some(rule.clone());
                    self.context.parent = Some(Box::new(parent));
                } else {
                    self.context.in_rule = Some(rule.clone());
                }
                if rule.has(action::NO_LINE_BREAK) || rule.has(action::NO_WORD_BREAK) {
                    self.pending_spans.push(PendingSpan {
                        rule,
                        token_index,
                        start,
                        outer,
                    });
                }
            }
            action::EOL_SPAN => {
                self.mark_pending_run();
                let default = self.context.rules.default_token();
                self.flush(self.pos, default);
                let delim = self.delimiter_token(&rule);
                self.emit(delim, match_len);
                let rest = self.line.len() - self.pos;
                if rest > 0 {
                    self.emit(rule.token, rest);
                }
            }
            action::MARK_PREVIOUS => {
                // the pending text, not the match, takes the rule's type
                self.flush(self.pos, rule.token);
                let delim = self.delimiter_token(&rule);
                self.emit(delim, match_len);
            }
            action::MARK_FOLLOWING => {
                self.mark_pending_run();
                let default = self.context.rules.default_token();
                self.flush(self.pos, default);
                let delim = self.delimiter_token(&rule);
                self.emit(delim, match_len);
                self.context.in_rule = Some(rule);
            }
            _ => {
                // plain sequence
                self.mark_pending_run();
                let default = self.context.rules.default_token();
                self.flush(self.pos, default);
                let delim = self.delimiter_token(&rule);
                self.emit(delim, match_len);
            }
        }
    }

    fn delimiter_token(&self, rule: &ParserRule) -> TokenType {
        if rule.has(action::EXCLUDE_MATCH) {
            self.context.rules.default_token()
        } else {
            rule.token
        }
    }

    /// Emits `[last_offset, upto)` as `id`.
    fn flush(&mut self, upto: usize, id: TokenType) {
        if upto > self.last_offset {
            push_token(&mut self.tokens, id, upto - self.last_offset);
            self.last_offset = upto;
        }
    }

    /// Emits `length` bytes at the scan position as `id` and advances past
    /// them.
    fn emit(&mut self, id: TokenType, length: usize) {
        push_token(&mut self.tokens, id, length);
        self.pos += length;
        self.last_offset = self.pos;
        self.last_keyword = self.pos;
    }

    /// Keyword/digit classification of the run ending at a word break.
    fn do_keyword(&mut self, pos: usize) {
        let start = self.last_keyword;
        self.last_keyword = pos + 1;
        self.classify_run(start, pos);
    }

    /// Keyword/digit classification of the run ending at a rule match.
    fn mark_pending_run(&mut self) {
        let start = self.last_keyword;
        self.last_keyword = self.pos;
        self.classify_run(start, self.pos);
    }

    fn classify_run(&mut self, start: usize, end: usize) {
        if start < self.last_offset || start >= end {
            return;
        }
        let set = self.context.rules.clone();
        let len = end - start;
        if set.highlight_digits()
            && self.line[start].is_ascii_digit()
            && DIGIT_SHAPE.is_match(&self.line[start..end])
        {
            self.flush(start, set.default_token());
            push_token(&mut self.tokens, TokenType::Digit, len);
            self.last_offset = end;
            return;
        }
        if let Some(map) = set.keywords() {
            let id = map.lookup(self.line, start, len);
            if id != TokenType::Null {
                self.flush(start, set.default_token());
                push_token(&mut self.tokens, id, len);
                self.last_offset = end;
            }
        }
    }

    fn matches_at(&self, pos: usize, seq: &[u8], ignore_case: bool) -> bool {
        if seq.is_empty() {
            return false;
        }
        let Some(window) = self.line.get(pos..pos + seq.len()) else {
            return false;
        };
        if ignore_case {
            window.eq_ignore_ascii_case(seq)
        } else {
            window == seq
        }
    }
}
