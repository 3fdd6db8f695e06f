use super::{
    error::EvalError,
    num::Value,
    record::{Evaluation, RollRecord},
    roller::Roller,
    RResult,
};
use crate::common::*;
use crate::parse::{to_postfix, Postfix, Token, TokenKind};
use log::{debug, trace};

pub type DefaultRoller = rand::prelude::ThreadRng;

/// Aggregate draw limit used by [`RollContext::default`].
pub const DEFAULT_MAX_ROLLS: usize = 1000;

/// Evaluates postfix expressions, rolling dice with `R`.
///
/// The context only holds configuration and the random source; every call to
/// [`evaluate`](Self::evaluate) starts from an empty stack and a fresh roll count.
pub struct RollContext<R = DefaultRoller> {
    max_rolls: Option<usize>,
    roller: R,
}

impl<R: Roller> RollContext<R> {
    pub fn new(max_rolls: Option<usize>, roller: R) -> Self {
        Self { max_rolls, roller }
    }

    pub fn new_bounded(max_rolls: usize, roller: R) -> Self {
        Self::new(Some(max_rolls), roller)
    }

    pub fn new_unbounded(roller: R) -> Self {
        Self::new(None, roller)
    }

    pub fn max_rolls(&self) -> Option<usize> {
        self.max_rolls
    }

    pub fn set_max_rolls(&mut self, max_rolls: Option<usize>) {
        self.max_rolls = max_rolls;
    }

    /// Converts `expression` to postfix and evaluates it.
    ///
    /// # Errors
    /// Fails with [`crate::Error::Parse`] if the expression does not parse and
    /// with [`crate::Error::Eval`] if evaluating it fails.
    pub fn roll(&mut self, expression: &str) -> Result<Evaluation, crate::Error> {
        let postfix = to_postfix(expression)?;
        Ok(self.evaluate(&postfix)?)
    }

    /// Evaluates a postfix sequence in a single pass.
    ///
    /// # Errors
    /// Fails if an operator or function lacks operands, if the sequence does
    /// not reduce to exactly one value, if a roll is invalid or exceeds the
    /// draw limit, or if arithmetic fails.
    pub fn evaluate(&mut self, postfix: &Postfix<'_>) -> RResult<Evaluation> {
        let mut stack: Vec<Value> = Vec::with_capacity(postfix.len());
        let mut rolls = Vec::new();
        let mut rolled = 0;

        for token in postfix {
            trace!("eval {:?} with stack {:?}", token.text, stack);
            let value = match token.kind {
                TokenKind::Integer(x) => Value::Int(x),
                TokenKind::Function => {
                    let spec = lookup_function(token.text).ok_or_else(|| {
                        EvalError::UnknownFunction {
                            name: token.text.to_string(),
                            position: token.position(),
                        }
                    })?;
                    let args = pop_operands(&mut stack, token, spec.arity)?;
                    (spec.apply)(&args)?
                }
                TokenKind::Operator(op) => {
                    let args = pop_operands(&mut stack, token, OperatorSpec::ARITY)?;
                    let (lhs, rhs) = (args[0], args[1]);
                    match op.spec().operation {
                        Operation::Roll => {
                            let record = self.roll_dice(lhs, rhs, token, &mut rolled)?;
                            let total = record.total;
                            rolls.push(record);
                            Value::Int(total)
                        }
                        Operation::Binary(apply) => apply(lhs, rhs)?,
                    }
                }
                TokenKind::ArgSeparator | TokenKind::LeftParen | TokenKind::RightParen => {
                    return Err(EvalError::UnexpectedToken {
                        slice: token.text.to_string(),
                        position: token.position(),
                    })
                }
            };
            stack.push(value);
        }

        match stack[..] {
            [total] => {
                debug!("evaluated `{}` to {} with {} roll(s)", postfix, total, rolls.len());
                Ok(Evaluation { rolls, total })
            }
            _ => Err(EvalError::MalformedExpression(stack.len())),
        }
    }

    fn roll_dice(
        &mut self,
        count: Value,
        sides: Value,
        token: &Token<'_>,
        rolled: &mut usize,
    ) -> RResult<RollRecord> {
        let position = token.position();
        let count = dice_operand(count, position)?;
        let sides = dice_operand(sides, position)?;
        if sides <= 0 {
            return Err(EvalError::InvalidDieSides { sides, position });
        }
        let num = usize::try_from(count)
            .map_err(|_| EvalError::InvalidDiceCount { count, position })?;
        self.count_rolls(rolled, num)?;

        let results: Vec<Int> = (0..num).map(|_| self.roller.roll(sides)).collect();
        let total = results
            .iter()
            .try_fold(0, |acc: Int, &x| acc.checked_add(x))
            .ok_or(EvalError::Overflow)?;
        let record = RollRecord {
            count,
            sides,
            results,
            total,
        };
        debug!("rolled {}", record);
        Ok(record)
    }

    fn count_rolls(&self, rolled: &mut usize, n: usize) -> RResult<()> {
        *rolled = rolled.saturating_add(n);
        match self.max_rolls {
            Some(max) if *rolled > max => Err(EvalError::TooManyRolls(max)),
            _ => Ok(()),
        }
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_ROLLS), rand::thread_rng())
    }
}

/// Pops the top `n` values, returned in the order they were pushed.
fn pop_operands(stack: &mut Vec<Value>, token: &Token<'_>, n: usize) -> RResult<Vec<Value>> {
    if stack.len() < n {
        return Err(EvalError::MissingOperands {
            symbol: token.text.to_string(),
            position: token.position(),
            expected: n,
            found: stack.len(),
        });
    }
    Ok(stack.split_off(stack.len() - n))
}

fn dice_operand(value: Value, position: usize) -> RResult<Int> {
    value
        .as_int()
        .ok_or(EvalError::NonIntegerDice { value, position })
}
