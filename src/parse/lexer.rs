use super::error::{LexError, LexErrorKind};
use crate::common::{Int, Operator};
use log::trace;
use logos::{Logos, Span};
use std::fmt;

/// The raw shapes recognized by the scanner. Logos always takes the longest
/// match, so `<=` is never split into `<` and `=`.
#[derive(Logos, Debug, Copy, Clone, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[0-9]+")]
    Integer,

    #[token("d", |_| Operator::Dice)]
    #[token("^", |_| Operator::Pow)]
    #[token("*", |_| Operator::Mul)]
    #[token("/", |_| Operator::Div)]
    #[token("+", |_| Operator::Add)]
    #[token("-", |_| Operator::Sub)]
    #[token(">", |_| Operator::Gt)]
    #[token("<", |_| Operator::Lt)]
    #[token("==", |_| Operator::Eq)]
    #[token("!=", |_| Operator::Ne)]
    #[token(">=", |_| Operator::Ge)]
    #[token("<=", |_| Operator::Le)]
    Operator(Operator),

    // A registered name swallows the rest of its alphabetic run, so `ceiling`
    // is one (unknown) function rather than `ceil` followed by garbage.
    #[regex(r"(ceil|floor|if)[a-zA-Z]*")]
    Function,

    #[token(",")]
    Comma,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    #[regex(r"\s+", logos::skip)]
    #[error]
    Error,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Integer(Int),
    Operator(Operator),
    /// The name is the token text; it is resolved by the parser.
    Function,
    ArgSeparator,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl Token<'_> {
    pub fn position(&self) -> usize {
        self.span.start
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

/// Scans an expression into [`Token`]s, one at a time.
pub struct Tokenizer<'a> {
    lexer: logos::Lexer<'a, RawToken>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: RawToken::lexer(input),
        }
    }

    /// Offset just past the last token returned.
    pub fn cursor(&self) -> usize {
        self.lexer.span().end
    }

    pub fn next_token(&mut self) -> Option<Result<Token<'a>, LexError>> {
        let raw = self.lexer.next()?;
        let text = self.lexer.slice();
        let span = self.lexer.span();

        let kind = match raw {
            RawToken::Integer => match text.parse() {
                Ok(x) => TokenKind::Integer(x),
                Err(_) => {
                    return Some(Err(LexError::new(LexErrorKind::IntegerTooLarge, span, text)))
                }
            },
            RawToken::Operator(op) => TokenKind::Operator(op),
            RawToken::Function => TokenKind::Function,
            RawToken::Comma => TokenKind::ArgSeparator,
            RawToken::LeftParen => TokenKind::LeftParen,
            RawToken::RightParen => TokenKind::RightParen,
            RawToken::Error => {
                return Some(Err(LexError::new(LexErrorKind::UnexpectedInput, span, text)))
            }
        };
        trace!("token {:?} {:?} at {}", kind, text, span.start);
        Some(Ok(Token { kind, text, span }))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, LexError> {
    Tokenizer::new(input).collect()
}
