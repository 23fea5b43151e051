//! # tokenmark
//!
//! An incremental, rule-driven syntax tokenizer for line-oriented editors.
//!
//! The engine tokenizes one line at a time. Cross-line lexer state (an open
//! block comment, an open string, a delegated sub-language) is carried in a
//! [`LineContext`](syntax::LineContext) value produced by the previous line's
//! tokenization, which makes re-tokenization after an edit both incremental
//! and cacheable: tokenizing a line is a pure function of the line's text and
//! its input context.
//!
//! Languages are described declaratively as
//! [`ParserRuleSet`](syntax::ParserRuleSet)s — span rules, end-of-line rules,
//! mark rules, keyword maps — grouped into named [`Mode`](syntax::Mode)s. A
//! built-in registry covers the usual suspects (C family, shell, Perl, SQL,
//! HTML/XML/PHP, and friends); hosts can load additional modes from JSON or
//! YAML descriptors at runtime.

pub mod syntax;

pub use syntax::{
    LineContext, MarkedLine, Mode, ModeRegistry, ParserRule, ParserRuleSet, Token, TokenMarker,
    TokenType,
};
