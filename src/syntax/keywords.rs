//! Keyword lookup
//!
//!     Maps identifier runs to token types without allocating a substring for
//!     the probe. Keywords are stored as byte arrays in a fixed-size bucket
//!     table hashed on the first and last byte of the word; lookups compare
//!     the candidate span in place against the chained entries.

use crate::syntax::token::TokenType;

const BUCKETS: usize = 52;

struct Node {
    keyword: Box<[u8]>,
    id: TokenType,
    next: Option<Box<Node>>,
}

/// A case-sensitive or case-insensitive keyword → token type map.
///
/// Case sensitivity is fixed at construction and applies uniformly to both
/// `add` and `lookup`.
pub struct KeywordMap {
    ignore_case: bool,
    buckets: Vec<Option<Box<Node>>>,
}

impl KeywordMap {
    pub fn new(ignore_case: bool) -> Self {
        let mut buckets = Vec::with_capacity(BUCKETS);
        buckets.resize_with(BUCKETS, || None);
        KeywordMap {
            ignore_case,
            buckets,
        }
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Registers `keyword` with the given token type. Empty keywords are
    /// ignored.
    pub fn add(&mut self, keyword: &str, id: TokenType) {
        let bytes = keyword.as_bytes();
        if bytes.is_empty() {
            return;
        }
        let slot = self.hash(bytes[0], bytes[bytes.len() - 1]);
        let node = Node {
            keyword: bytes.to_vec().into_boxed_slice(),
            id,
            next: self.buckets[slot].take(),
        };
        self.buckets[slot] = Some(Box::new(node));
    }

    /// Looks up the span `line[offset..offset + length]` and returns its
    /// token type, or [`TokenType::Null`] when no keyword matches. A
    /// zero-length span never matches.
    pub fn lookup(&self, line: &[u8], offset: usize, length: usize) -> TokenType {
        if length == 0 {
            return TokenType::Null;
        }
        let span = &line[offset..offset + length];
        let slot = self.hash(span[0], span[length - 1]);
        let mut cursor = self.buckets[slot].as_deref();
        while let Some(node) = cursor {
            if self.matches(&node.keyword, span) {
                return node.id;
            }
            cursor = node.next.as_deref();
        }
        TokenType::Null
    }

    fn matches(&self, keyword: &[u8], span: &[u8]) -> bool {
        if keyword.len() != span.len() {
            return false;
        }
        if self.ignore_case {
            keyword.eq_ignore_ascii_case(span)
        } else {
            keyword == span
        }
    }

    fn hash(&self, first: u8, last: u8) -> usize {
        let fold = |b: u8| {
            if self.ignore_case {
                b.to_ascii_uppercase() as usize
            } else {
                b as usize
            }
        };
        (fold(first) + fold(last)) % BUCKETS
    }
}
