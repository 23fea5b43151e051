//! Syntax tokenization
//!
//!     This module holds the complete tokenizer: the token data model, the
//!     declarative rule descriptors, the cross-line context chain, the
//!     incremental line marker, the mode registry, and the descriptor
//!     loader.
//!
//! Ownership
//!
//!     Rule sets are built once (in code for the built-in modes, or by the
//!     loader from a descriptor file) and are immutable afterwards. A
//!     [`TokenMarker`] owns nothing shared: it holds `Arc`s to its mode's
//!     rule sets plus a private per-line context cache, so independent
//!     documents can tokenize concurrently. The only cross-document state is
//!     the registry's mode table and each rule's lazily resolved delegate
//!     target, both of which are behind their own locks.

pub mod context;
pub mod keywords;
pub mod loader;
pub mod marker;
pub mod modes;
pub mod registry;
pub mod rules;
pub mod testing;
pub mod token;

pub use context::LineContext;
pub use keywords::KeywordMap;
pub use loader::LoaderError;
pub use marker::{MarkedLine, TokenMarker};
pub use registry::{Mode, ModeRegistry};
pub use rules::{ParserRule, ParserRuleSet};
pub use token::{Token, TokenType};
