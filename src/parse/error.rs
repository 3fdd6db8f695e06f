use super::lexer::Token;
use crate::common::Operator;
use logos::Span;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    pub slice: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    UnexpectedInput,
    IntegerTooLarge,
}

impl LexError {
    pub(crate) fn new(kind: LexErrorKind, span: Span, slice: &str) -> Self {
        Self {
            kind,
            span,
            slice: slice.to_string(),
        }
    }

    pub fn position(&self) -> usize {
        self.span.start
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedInput => f.write_str("unrecognized input"),
            Self::IntegerTooLarge => f.write_str("integer literal is too large"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub slice: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    Lex(LexErrorKind),
    UnknownFunction,
    ExpectedCallParen,
    MisplacedSeparator,
    EmptyArgument,
    MissingArguments { expected: usize, found: usize },
    TooManyArguments { expected: usize },
    UnmatchedOpenParen,
    UnmatchedCloseParen,
    ChainedOperators { previous: Operator },
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, token: &Token<'_>) -> Self {
        Self {
            kind,
            span: token.span.clone(),
            slice: token.text.to_string(),
        }
    }

    pub fn position(&self) -> usize {
        self.span.start
    }

    pub fn is_lex_error(&self) -> bool {
        matches!(self.kind, ParseErrorKind::Lex(_))
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            kind: ParseErrorKind::Lex(err.kind),
            span: err.span,
            slice: err.slice,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(kind) => fmt::Display::fmt(kind, f),
            Self::UnknownFunction => f.write_str("unknown function"),
            Self::ExpectedCallParen => f.write_str("function name must be followed by '('"),
            Self::MisplacedSeparator => f.write_str("',' is only allowed between function arguments"),
            Self::EmptyArgument => f.write_str("function arguments cannot be empty"),
            Self::MissingArguments { expected, found } => {
                write!(f, "not enough arguments: expected {}, found {}", expected, found)
            }
            Self::TooManyArguments { expected } => {
                write!(f, "too many arguments: expected {}", expected)
            }
            Self::UnmatchedOpenParen => f.write_str("parenthesis was not closed"),
            Self::UnmatchedCloseParen => f.write_str("parenthesis was not opened"),
            Self::ChainedOperators { previous } => {
                write!(f, "cannot be chained with '{}'", previous)
            }
        }
    }
}
