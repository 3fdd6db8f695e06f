use super::num::Value;
use crate::common::Int;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("(at position {position}): {symbol:?} needs {expected} operands, found {found}")]
    MissingOperands {
        symbol: String,
        position: usize,
        expected: usize,
        found: usize,
    },
    #[error("malformed expression: expected a single value after evaluation, found {0}")]
    MalformedExpression(usize),
    #[error("(at position {position}): invalid die sides {sides}; a die needs at least one side")]
    InvalidDieSides { sides: Int, position: usize },
    #[error("(at position {position}): cannot roll a negative number of dice ({count})")]
    InvalidDiceCount { count: Int, position: usize },
    #[error("(at position {position}): dice can only be rolled with integers, found {value}")]
    NonIntegerDice { value: Value, position: usize },
    #[error("too many dice rolled (the limit is {0})")]
    TooManyRolls(usize),
    #[error("cannot divide by zero")]
    ZeroDivision,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("result is not a real number")]
    NotReal,
    #[error("(at position {position}): unknown function {name:?}")]
    UnknownFunction { name: String, position: usize },
    #[error("(at position {position}): {slice:?} cannot appear in a postfix expression")]
    UnexpectedToken { slice: String, position: usize },
}

impl EvalError {
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::MissingOperands { position, .. }
            | Self::InvalidDieSides { position, .. }
            | Self::InvalidDiceCount { position, .. }
            | Self::NonIntegerDice { position, .. }
            | Self::UnknownFunction { position, .. }
            | Self::UnexpectedToken { position, .. } => Some(*position),
            Self::MalformedExpression(_)
            | Self::TooManyRolls(_)
            | Self::ZeroDivision
            | Self::Overflow
            | Self::NotReal => None,
        }
    }
}
