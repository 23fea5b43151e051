//! Token data model
//!
//!     A tokenized line is a sequence of [`Token`]s whose lengths sum to the
//!     byte length of the line, with no gaps or overlaps. Adjacent tokens
//!     never share a type: the marker coalesces same-typed runs while
//!     building the list.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of token categories a rule or keyword map can assign.
///
/// `Null` is the plain-text default; `Invalid` is reserved for recovery from
/// malformed constructs (for example an unterminated string in a language
/// that forbids multi-line strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Null,
    Comment1,
    Comment2,
    Literal1,
    Literal2,
    Label,
    Keyword1,
    Keyword2,
    Keyword3,
    Function,
    Variable,
    Datatype,
    Operator,
    Digit,
    Invalid,
}

impl TokenType {
    /// The descriptor-file / dump spelling of this type.
    pub fn name(self) -> &'static str {
        match self {
            TokenType::Null => "NULL",
            TokenType::Comment1 => "COMMENT1",
            TokenType::Comment2 => "COMMENT2",
            TokenType::Literal1 => "LITERAL1",
            TokenType::Literal2 => "LITERAL2",
            TokenType::Label => "LABEL",
            TokenType::Keyword1 => "KEYWORD1",
            TokenType::Keyword2 => "KEYWORD2",
            TokenType::Keyword3 => "KEYWORD3",
            TokenType::Function => "FUNCTION",
            TokenType::Variable => "VARIABLE",
            TokenType::Datatype => "DATATYPE",
            TokenType::Operator => "OPERATOR",
            TokenType::Digit => "DIGIT",
            TokenType::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One run of same-typed text on a line. Lengths are in bytes of the line's
/// UTF-8 text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenType,
    pub length: usize,
}

impl Token {
    pub fn new(id: TokenType, length: usize) -> Self {
        Token { id, length }
    }
}

/// Appends a run to a token list, merging it into the previous token when the
/// types match. Zero-length runs are dropped.
pub(crate) fn push_token(tokens: &mut Vec<Token>, id: TokenType, length: usize) {
    if length == 0 {
        return;
    }
    if let Some(last) = tokens.last_mut() {
        if last.id == id {
            last.length += length;
            return;
        }
    }
    tokens.push(Token::new(id, length));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_token_coalesces_same_type() {
        let mut tokens = Vec::new();
        push_token(&mut tokens, TokenType::Null, 3);
        push_token(&mut tokens, TokenType::Null, 2);
        push_token(&mut tokens, TokenType::Comment1, 4);
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenType::Null, 5),
                Token::new(TokenType::Comment1, 4)
            ]
        );
    }

    #[test]
    fn test_push_token_drops_zero_length() {
        let mut tokens = Vec::new();
        push_token(&mut tokens, TokenType::Keyword1, 0);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_type_names_round_trip_through_serde() {
        let json = serde_json::to_string(&TokenType::Keyword3).unwrap();
        assert_eq!(json, "\"keyword3\"");
        let back: TokenType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TokenType::Keyword3);
    }
}
