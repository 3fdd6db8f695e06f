use super::{
    error::{ParseError, ParseErrorKind},
    lexer::{Token, TokenKind, Tokenizer},
};
use crate::common::{lookup_function, Associativity, Operator};
use log::trace;
use std::fmt;
use std::iter::Peekable;

type PResult<T> = Result<T, ParseError>;

/// Tokens in Reverse Polish order, ready for a single-pass evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Postfix<'a> {
    tokens: Vec<Token<'a>>,
}

impl<'a> Postfix<'a> {
    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token<'a>> {
        self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token<'a>> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<'p, 'a> IntoIterator for &'p Postfix<'a> {
    type Item = &'p Token<'a>;
    type IntoIter = std::slice::Iter<'p, Token<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Postfix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

/// A function call whose closing parenthesis has not been seen yet.
struct Call<'a> {
    function: Token<'a>,
    paren: Token<'a>,
    arity: usize,
    remaining: usize,
}

/// An entry on the operator stack. A call holds its own `(` and argument
/// count, so a function can never be separated from its arity.
enum Pending<'a> {
    Operator(Token<'a>, Operator),
    Group(Token<'a>),
    Call(Call<'a>),
}

/// Shunting-yard conversion from infix to postfix.
///
/// A parser is built for one expression and consumed by [`Parser::parse`];
/// its stacks never outlive the call.
pub struct Parser<'a> {
    tokens: Peekable<Tokenizer<'a>>,
    output: Vec<Token<'a>>,
    stack: Vec<Pending<'a>>,
    /// Set right after a call's `(` or one of its `,`.
    argument_start: bool,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            tokens: Tokenizer::new(s).peekable(),
            output: Vec::new(),
            stack: Vec::new(),
            argument_start: false,
        }
    }

    pub fn parse(mut self) -> PResult<Postfix<'a>> {
        while let Some(token) = self.tokens.next() {
            let token = token?;
            let kind = token.kind;
            trace!("parse {:?}, stack depth {}", token.text, self.stack.len());
            match kind {
                TokenKind::Integer(_) => self.output.push(token),
                TokenKind::Function => self.open_call(token)?,
                TokenKind::ArgSeparator => self.separate_argument(&token)?,
                TokenKind::LeftParen => self.stack.push(Pending::Group(token)),
                TokenKind::RightParen => self.close_paren(&token)?,
                TokenKind::Operator(op) => self.push_operator(token, op)?,
            }
            self.argument_start = matches!(kind, TokenKind::Function | TokenKind::ArgSeparator);
        }

        while let Some(pending) = self.stack.pop() {
            match pending {
                Pending::Operator(token, _) => self.output.push(token),
                Pending::Group(paren) | Pending::Call(Call { paren, .. }) => {
                    return Err(ParseError::new(ParseErrorKind::UnmatchedOpenParen, &paren));
                }
            }
        }

        Ok(Postfix {
            tokens: self.output,
        })
    }

    /// Pushes a call together with the `(` that must follow the name.
    fn open_call(&mut self, function: Token<'a>) -> PResult<()> {
        let spec = lookup_function(function.text)
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnknownFunction, &function))?;
        // Lex errors in the lookahead are reported when the token is consumed.
        let followed_by_paren = matches!(
            self.tokens.peek(),
            Some(Ok(Token {
                kind: TokenKind::LeftParen,
                ..
            })) | Some(Err(_))
        );
        let paren = if followed_by_paren {
            self.tokens.next()
        } else {
            None
        };
        let paren = match paren {
            Some(paren) => paren?,
            None => return Err(ParseError::new(ParseErrorKind::ExpectedCallParen, &function)),
        };
        self.stack.push(Pending::Call(Call {
            function,
            paren,
            arity: spec.arity,
            remaining: spec.arity,
        }));
        Ok(())
    }

    fn separate_argument(&mut self, token: &Token<'a>) -> PResult<()> {
        self.check_argument_present(token)?;
        self.flush_to_paren();
        match self.stack.last_mut() {
            Some(Pending::Call(call)) if call.remaining > 1 => {
                call.remaining -= 1;
                Ok(())
            }
            Some(Pending::Call(call)) => Err(ParseError::new(
                ParseErrorKind::TooManyArguments {
                    expected: call.arity,
                },
                token,
            )),
            _ => Err(ParseError::new(ParseErrorKind::MisplacedSeparator, token)),
        }
    }

    fn close_paren(&mut self, token: &Token<'a>) -> PResult<()> {
        self.check_argument_present(token)?;
        loop {
            match self.stack.pop() {
                Some(Pending::Operator(op, _)) => self.output.push(op),
                Some(Pending::Group(_)) => return Ok(()),
                Some(Pending::Call(call)) => return self.finish_call(call),
                None => {
                    return Err(ParseError::new(ParseErrorKind::UnmatchedCloseParen, token));
                }
            }
        }
    }

    fn finish_call(&mut self, call: Call<'a>) -> PResult<()> {
        if call.remaining > 1 {
            return Err(ParseError::new(
                ParseErrorKind::MissingArguments {
                    expected: call.arity,
                    found: call.arity + 1 - call.remaining,
                },
                &call.function,
            ));
        }
        self.output.push(call.function);
        Ok(())
    }

    fn push_operator(&mut self, token: Token<'a>, incoming: Operator) -> PResult<()> {
        while let Some(&Pending::Operator(_, stacked)) = self.stack.last() {
            if incoming.associativity() == Associativity::NonAssociative
                && stacked.associativity() == Associativity::NonAssociative
                && incoming.precedence() == stacked.precedence()
            {
                return Err(ParseError::new(
                    ParseErrorKind::ChainedOperators { previous: stacked },
                    &token,
                ));
            }
            let pops = match incoming.associativity() {
                Associativity::Left => incoming.precedence() <= stacked.precedence(),
                Associativity::Right | Associativity::NonAssociative => {
                    incoming.precedence() < stacked.precedence()
                }
            };
            if !pops {
                break;
            }
            self.pop_operator();
        }
        self.stack.push(Pending::Operator(token, incoming));
        Ok(())
    }

    /// Moves operators to the output until the innermost open paren.
    fn flush_to_paren(&mut self) {
        while self.pop_operator() {}
    }

    /// Moves the top of the stack to the output if it is an operator.
    fn pop_operator(&mut self) -> bool {
        match self.stack.pop() {
            Some(Pending::Operator(token, _)) => {
                self.output.push(token);
                true
            }
            Some(other) => {
                self.stack.push(other);
                false
            }
            None => false,
        }
    }

    /// Rejects `f()`, `f(1,,2)` and `f(1,)`.
    fn check_argument_present(&self, token: &Token<'a>) -> PResult<()> {
        if self.argument_start {
            Err(ParseError::new(ParseErrorKind::EmptyArgument, token))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::LexErrorKind;

    fn check(s: &str, expected: &str) {
        let postfix = Parser::new(s).parse().unwrap();
        assert_eq!(postfix.to_string(), expected);
    }

    fn check_err(s: &str, expected: ParseErrorKind, position: usize) {
        let err = Parser::new(s).parse().unwrap_err();
        assert_eq!(err.kind, expected);
        assert_eq!(err.position(), position);
    }

    #[test]
    fn test_parse_dice() {
        check("4d6", "4 6 d");
        check("4d6 + 2", "4 6 d 2 +");
        check("2d6 * 2", "2 6 d 2 *");
        check("(1+1)d6", "1 1 + 6 d");
    }

    #[test]
    fn test_parse_arithmetic() {
        check("1+2-3*4/2+1", "1 2 + 3 4 * 2 / - 1 +");
        check("1 - 2 - 3", "1 2 - 3 -");
        check("(1 + 2) * 3", "1 2 + 3 *");
    }

    #[test]
    fn test_parse_pow_is_right_associative() {
        check("2^3^2", "2 3 2 ^ ^");
        check("2*3^2", "2 3 2 ^ *");
        check("2^3*2", "2 3 ^ 2 *");
    }

    #[test]
    fn test_parse_comparison() {
        check("1 + 2 > 3", "1 2 + 3 >");
        check("(1 < 2) == 1", "1 2 < 1 ==");
        check("1d6 >= 4", "1 6 d 4 >=");
    }

    #[test]
    fn test_parse_functions() {
        check("ceil(7/2)", "7 2 / ceil");
        check("if(1>0, 5, 10)", "1 0 > 5 10 if");
        check("floor(if(1, 2+3, 4)) * 2", "1 2 3 + 4 if floor 2 *");
        check("ceil((1+2)*3)", "1 2 + 3 * ceil");
    }

    #[test]
    fn test_parse_nested_calls_keep_their_arity() {
        check(
            "if(ceil(1/2), floor(5/2), if(0, 1, 2))",
            "1 2 / ceil 5 2 / floor 0 1 2 if if",
        );
        check("ceil(floor(7/2) + if(1, 2, 3))", "7 2 / floor 1 2 3 if + ceil");
        check_err(
            "ceil(if(1, 2))",
            ParseErrorKind::MissingArguments {
                expected: 3,
                found: 2,
            },
            5,
        );
        check_err(
            "if(1, ceil(2, 3), 4)",
            ParseErrorKind::TooManyArguments { expected: 1 },
            12,
        );
        check_err("if(1, (2), ceil(3)", ParseErrorKind::UnmatchedOpenParen, 2);
    }

    #[test]
    fn test_parse_positions_preserved() {
        let postfix = Parser::new("10 + 2").parse().unwrap();
        let positions: Vec<_> = postfix.iter().map(Token::position).collect();
        assert_eq!(positions, [0, 5, 3]);
    }

    #[test]
    fn test_err_chained() {
        let previous = Operator::Lt;
        check_err("1<2<3", ParseErrorKind::ChainedOperators { previous }, 3);
        let previous = Operator::Lt;
        check_err("1<2+3<4", ParseErrorKind::ChainedOperators { previous }, 5);
        let previous = Operator::Dice;
        check_err("2d6d6", ParseErrorKind::ChainedOperators { previous }, 3);
    }

    #[test]
    fn test_err_parens() {
        check_err("(1+2", ParseErrorKind::UnmatchedOpenParen, 0);
        check_err("1+2)", ParseErrorKind::UnmatchedCloseParen, 3);
        check_err("((1)", ParseErrorKind::UnmatchedOpenParen, 0);
        check_err("ceil(1", ParseErrorKind::UnmatchedOpenParen, 4);
    }

    #[test]
    fn test_err_functions() {
        check_err("ceiling(1)", ParseErrorKind::UnknownFunction, 0);
        check_err("1 + ceil 2", ParseErrorKind::ExpectedCallParen, 4);
        check_err("floor", ParseErrorKind::ExpectedCallParen, 0);
        check_err(
            "if(1, 2)",
            ParseErrorKind::MissingArguments {
                expected: 3,
                found: 2,
            },
            0,
        );
        check_err(
            "1 + ceil(1, 2)",
            ParseErrorKind::TooManyArguments { expected: 1 },
            10,
        );
    }

    #[test]
    fn test_err_separators() {
        check_err("1, 2", ParseErrorKind::MisplacedSeparator, 1);
        check_err("if((1, 2), 3, 4)", ParseErrorKind::MisplacedSeparator, 5);
        check_err("ceil()", ParseErrorKind::EmptyArgument, 5);
        check_err("if(1,,2)", ParseErrorKind::EmptyArgument, 5);
        check_err("if(1,2,)", ParseErrorKind::EmptyArgument, 7);
    }

    #[test]
    fn test_err_lex() {
        check_err("1 + a", ParseErrorKind::Lex(LexErrorKind::UnexpectedInput), 4);
        check_err("ceil$", ParseErrorKind::Lex(LexErrorKind::UnexpectedInput), 4);
        assert!(Parser::new("1 $ 2").parse().unwrap_err().is_lex_error());
    }
}
