use std::fmt::Display;
use std::rc::Rc;

use thiserror::Error;

use crate::lexer::{Position, Token, TokenKind};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("unexpected end of input, expected {expected}")]
    PrematureEndOfInput { expected: Expected },
    #[error("expected {expected}, got {got}")]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("could not parse `{literal}` as an integer at {position}")]
    InvalidInteger { literal: Rc<str>, position: Position },
    #[error("no prefix parse function for {0}")]
    NoPrefixFunction(Token),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::Identifier => write!(f, "an identifier"),
            Expected::Expression => write!(f, "an expression"),
        }
    }
}

impl ParseError {
    pub fn premature_end_expected_expression() -> Self {
        ParseError::PrematureEndOfInput {
            expected: Expected::Expression,
        }
    }

    pub fn unexpected_token(expected: TokenKind, got: Option<Token>) -> ParseError {
        ParseError::unexpected_other(Expected::Token(expected), got)
    }

    pub fn unexpected_other(expected: Expected, got: Option<Token>) -> ParseError {
        match got {
            Some(got) => ParseError::UnexpectedToken { expected, got },
            None => ParseError::PrematureEndOfInput { expected },
        }
    }

    /// The token the parser stopped on, if the error was raised on one.
    pub fn token(&self) -> Option<&Token> {
        match self {
            ParseError::UnexpectedToken { got, .. } => Some(got),
            ParseError::NoPrefixFunction(token) => Some(token),
            ParseError::PrematureEndOfInput { .. } | ParseError::InvalidInteger { .. } => None,
        }
    }
}
