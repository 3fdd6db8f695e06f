use crate::roll::{EvalError, Value};
use std::fmt;

pub type Int = i64;
pub type Float = f64;

/// A pure binary operation on two evaluated operands.
pub type BinaryFn = fn(Value, Value) -> Result<Value, EvalError>;

/// A built-in function; receives exactly `arity` arguments in call order.
pub type FunctionFn = fn(&[Value]) -> Result<Value, EvalError>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Associativity {
    Left,
    Right,
    NonAssociative,
}

/// What an operator does once both operands are on the stack.
#[derive(Debug, Copy, Clone)]
pub enum Operation {
    /// `NdM`: roll the dice and record the draws.
    Roll,
    Binary(BinaryFn),
}

#[derive(Debug)]
pub struct OperatorSpec {
    pub symbol: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub operation: Operation,
}

impl OperatorSpec {
    /// Every operator is binary.
    pub const ARITY: usize = 2;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    Dice,
    Pow,
    Mul,
    Div,
    Add,
    Sub,
    Gt,
    Lt,
    Eq,
    Ne,
    Ge,
    Le,
}

impl Operator {
    pub const ALL: [Self; 12] = [
        Self::Dice,
        Self::Pow,
        Self::Mul,
        Self::Div,
        Self::Add,
        Self::Sub,
        Self::Gt,
        Self::Lt,
        Self::Eq,
        Self::Ne,
        Self::Ge,
        Self::Le,
    ];

    pub fn spec(self) -> &'static OperatorSpec {
        &OPERATORS[self as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.spec().symbol
    }

    pub fn precedence(self) -> u8 {
        self.spec().precedence
    }

    pub fn associativity(self) -> Associativity {
        self.spec().associativity
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

macro_rules! operator {
    ($symbol:literal, $precedence:literal, $assoc:ident, $operation:expr) => {
        OperatorSpec {
            symbol: $symbol,
            precedence: $precedence,
            associativity: Associativity::$assoc,
            operation: $operation,
        }
    };
}

/// Indexed by `Operator as usize`.
pub static OPERATORS: [OperatorSpec; 12] = [
    operator!("d", 5, NonAssociative, Operation::Roll),
    operator!("^", 4, Right, Operation::Binary(Value::pow)),
    operator!("*", 3, Left, Operation::Binary(Value::mul)),
    operator!("/", 3, Left, Operation::Binary(Value::div)),
    operator!("+", 2, Left, Operation::Binary(Value::add)),
    operator!("-", 2, Left, Operation::Binary(Value::sub)),
    operator!(">", 1, NonAssociative, Operation::Binary(Value::greater)),
    operator!("<", 1, NonAssociative, Operation::Binary(Value::less)),
    operator!("==", 1, NonAssociative, Operation::Binary(Value::equal)),
    operator!("!=", 1, NonAssociative, Operation::Binary(Value::not_equal)),
    operator!(">=", 1, NonAssociative, Operation::Binary(Value::greater_equal)),
    operator!("<=", 1, NonAssociative, Operation::Binary(Value::less_equal)),
];

#[derive(Debug)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub arity: usize,
    pub apply: FunctionFn,
}

pub static FUNCTIONS: [FunctionSpec; 3] = [
    FunctionSpec {
        name: "ceil",
        arity: 1,
        apply: ceil,
    },
    FunctionSpec {
        name: "floor",
        arity: 1,
        apply: floor,
    },
    FunctionSpec {
        name: "if",
        arity: 3,
        apply: if_then_else,
    },
];

pub fn lookup_function(name: &str) -> Option<&'static FunctionSpec> {
    FUNCTIONS.iter().find(|spec| spec.name == name)
}

fn ceil(args: &[Value]) -> Result<Value, EvalError> {
    args[0].ceil()
}

fn floor(args: &[Value]) -> Result<Value, EvalError> {
    args[0].floor()
}

fn if_then_else(args: &[Value]) -> Result<Value, EvalError> {
    Ok(if args[0].is_truthy() { args[1] } else { args[2] })
}
