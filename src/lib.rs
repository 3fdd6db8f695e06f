//! Evaluates tabletop dice expressions such as `2d6 + 3` or `if(1d20 >= 15, 2d8, 1d8)`.
//!
//! An expression is tokenized, converted to postfix with the shunting-yard
//! algorithm and evaluated on a value stack, rolling dice along the way.
//!
//! ```
//! let result = dice_postfix::roll("1+2-3*4/2+1").unwrap();
//! assert_eq!(result.to_string(), "Total: -2.0");
//! ```

mod common;
mod error;
pub mod parse;
pub mod roll;

pub use common::{
    lookup_function, Associativity, Float, FunctionSpec, Int, Operation, Operator, OperatorSpec,
    FUNCTIONS, OPERATORS,
};
pub use error::Error;
pub use parse::{to_postfix, tokenize, ParseError, Postfix, Token, TokenKind};
pub use roll::{EvalError, Evaluation, RollContext, RollRecord, Roller, Value};

/// Evaluates `expression` with a default [`RollContext`].
///
/// # Errors
/// Fails if the expression does not parse or cannot be evaluated.
pub fn roll(expression: &str) -> Result<Evaluation, Error> {
    RollContext::default().roll(expression)
}
