mod error;
mod lexer;
mod parser;

pub use error::{LexError, LexErrorKind, ParseError, ParseErrorKind};
pub use lexer::{tokenize, Token, TokenKind, Tokenizer};
pub use parser::{Parser, Postfix};

/// Converts an infix expression into postfix order.
///
/// # Examples
/// ```
/// # use dice_postfix::parse::to_postfix;
///
/// let postfix = to_postfix("1 + 2 * 4d6").unwrap();
/// assert_eq!(postfix.to_string(), "1 2 4 6 d * +");
/// ```
///
/// # Errors
/// Fails with a [`ParseError`] carrying the offending position if the
/// expression does not lex or is structurally invalid.
pub fn to_postfix(s: &str) -> Result<Postfix<'_>, ParseError> {
    let postfix = Parser::new(s).parse()?;
    log::debug!("converted {:?} to postfix `{}`", s, postfix);
    Ok(postfix)
}
