use super::{error::EvalError, RResult};
use crate::common::*;
use std::cmp::Ordering;
use std::fmt;

/// A value on the evaluation stack.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Value {
    Int(Int),
    Float(Float),
    Bool(bool),
}

impl Value {
    /// The integer view of this value; bools count as `0`/`1`, floats have none.
    pub fn as_int(self) -> Option<Int> {
        match self {
            Self::Int(x) => Some(x),
            Self::Bool(b) => Some(b as Int),
            Self::Float(_) => None,
        }
    }

    pub fn as_float(self) -> Float {
        match self {
            Self::Int(x) => x as Float,
            Self::Float(x) => x,
            Self::Bool(b) => b as Int as Float,
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Self::Int(x) => x != 0,
            Self::Float(x) => x != 0.0,
            Self::Bool(b) => b,
        }
    }

    pub(crate) fn div(self, rhs: Self) -> RResult<Self> {
        let divisor = rhs.as_float();
        if divisor == 0.0 {
            Err(EvalError::ZeroDivision)
        } else {
            real(self.as_float() / divisor)
        }
    }

    pub(crate) fn pow(self, rhs: Self) -> RResult<Self> {
        match (self.as_int(), rhs.as_int()) {
            (Some(base), Some(exp)) if exp >= 0 => match base {
                // These never grow, whatever the exponent.
                0 => Ok(Self::Int(if exp == 0 { 1 } else { 0 })),
                1 => Ok(Self::Int(1)),
                -1 => Ok(Self::Int(if exp % 2 == 0 { 1 } else { -1 })),
                _ => u32::try_from(exp)
                    .ok()
                    .and_then(|exp| base.checked_pow(exp))
                    .map(Self::Int)
                    .ok_or(EvalError::Overflow),
            },
            _ => {
                let (base, exp) = (self.as_float(), rhs.as_float());
                if base == 0.0 && exp < 0.0 {
                    Err(EvalError::ZeroDivision)
                } else {
                    real(base.powf(exp))
                }
            }
        }
    }

    pub(crate) fn ceil(self) -> RResult<Self> {
        self.round_with(Float::ceil)
    }

    pub(crate) fn floor(self) -> RResult<Self> {
        self.round_with(Float::floor)
    }

    fn round_with(self, round: fn(Float) -> Float) -> RResult<Self> {
        match self {
            Self::Float(x) => float_to_int(round(x)).map(Self::Int),
            other => other.as_int().map(Self::Int).ok_or(EvalError::Overflow),
        }
    }

    fn compare(self, rhs: Self) -> Option<Ordering> {
        match (self.as_int(), rhs.as_int()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => self.as_float().partial_cmp(&rhs.as_float()),
        }
    }
}

/// Rejects float results that are not a finite real number.
fn real(x: Float) -> RResult<Value> {
    if x.is_nan() {
        Err(EvalError::NotReal)
    } else if x.is_infinite() {
        Err(EvalError::Overflow)
    } else {
        Ok(Value::Float(x))
    }
}

fn float_to_int(x: Float) -> RResult<Int> {
    // `Int::MAX as Float` rounds up to 2^63, which no longer fits.
    if x.is_finite() && x >= Int::MIN as Float && x < Int::MAX as Float {
        Ok(x as Int)
    } else {
        Err(EvalError::Overflow)
    }
}

macro_rules! val_impl_checked_op {
    ($name:ident, $checked:ident, $op:tt) => {
        impl Value {
            pub(crate) fn $name(self, rhs: Self) -> RResult<Self> {
                match (self.as_int(), rhs.as_int()) {
                    (Some(x), Some(y)) => x.$checked(y).map(Self::Int).ok_or(EvalError::Overflow),
                    _ => real(self.as_float() $op rhs.as_float()),
                }
            }
        }
    };
}

val_impl_checked_op!(add, checked_add, +);
val_impl_checked_op!(sub, checked_sub, -);
val_impl_checked_op!(mul, checked_mul, *);

macro_rules! val_impl_cmp_op {
    ($name:ident, $($ordering:pat_param)|+) => {
        impl Value {
            pub(crate) fn $name(self, rhs: Self) -> RResult<Self> {
                Ok(Self::Bool(matches!(self.compare(rhs), $(Some($ordering))|+)))
            }
        }
    };
}

val_impl_cmp_op!(less, Ordering::Less);
val_impl_cmp_op!(greater, Ordering::Greater);
val_impl_cmp_op!(equal, Ordering::Equal);
val_impl_cmp_op!(less_equal, Ordering::Less | Ordering::Equal);
val_impl_cmp_op!(greater_equal, Ordering::Greater | Ordering::Equal);

impl Value {
    pub(crate) fn not_equal(self, rhs: Self) -> RResult<Self> {
        Ok(Self::Bool(!matches!(self.compare(rhs), Some(Ordering::Equal))))
    }
}

impl From<Int> for Value {
    fn from(x: Int) -> Self {
        Self::Int(x)
    }
}

impl From<Float> for Value {
    fn from(x: Float) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => fmt::Display::fmt(x, f),
            Self::Float(x) => fmt_float(*x, f),
            Self::Bool(b) => fmt::Display::fmt(b, f),
        }
    }
}

/// Shortest round-trip form, with a signed two-digit exponent (`1e+16`, `2.5e-05`).
fn fmt_float(x: Float, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = format!("{:?}", x);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => f.write_str(&s),
    }
}

#[cfg(test)]
mod tests {
    use super::{EvalError, Value::*};

    #[test]
    fn test_int_arithmetic_stays_int() {
        assert_eq!(Int(2).add(Int(3)), Ok(Int(5)));
        assert_eq!(Int(2).sub(Int(3)), Ok(Int(-1)));
        assert_eq!(Int(4).mul(Int(3)), Ok(Int(12)));
        assert_eq!(Int(2).pow(Int(10)), Ok(Int(1024)));
    }

    #[test]
    fn test_float_contaminates() {
        assert_eq!(Int(3).sub(Float(6.0)), Ok(Float(-3.0)));
        assert_eq!(Float(0.5).mul(Int(4)), Ok(Float(2.0)));
        assert_eq!(Int(4).pow(Float(0.5)), Ok(Float(2.0)));
    }

    #[test]
    fn test_division_is_always_float() {
        assert_eq!(Int(12).div(Int(2)), Ok(Float(6.0)));
        assert_eq!(Int(7).div(Int(2)), Ok(Float(3.5)));
        assert_eq!(Int(1).div(Int(0)), Err(EvalError::ZeroDivision));
        assert_eq!(Int(1).div(Float(0.0)), Err(EvalError::ZeroDivision));
    }

    #[test]
    fn test_pow_edge_cases() {
        assert_eq!(Int(2).pow(Int(-1)), Ok(Float(0.5)));
        assert_eq!(Int(0).pow(Int(-1)), Err(EvalError::ZeroDivision));
        assert_eq!(Int(10).pow(Int(30)), Err(EvalError::Overflow));
        assert_eq!(Int(0).pow(Int(0)), Ok(Int(1)));
    }

    #[test]
    fn test_pow_huge_exponent_with_small_base() {
        let huge = Int(1 << 40);
        assert_eq!(Int(1).pow(huge), Ok(Int(1)));
        assert_eq!(Int(0).pow(huge), Ok(Int(0)));
        assert_eq!(Int(-1).pow(huge), Ok(Int(1)));
        assert_eq!(Int(-1).pow(Int((1 << 33) + 1)), Ok(Int(-1)));
        assert_eq!(Int(2).pow(huge), Err(EvalError::Overflow));
    }

    #[test]
    fn test_float_results_must_be_real() {
        assert_eq!(Int(2).pow(Float(1024.0)), Err(EvalError::Overflow));
        assert_eq!(Float(-8.0).pow(Float(1.0 / 3.0)), Err(EvalError::NotReal));
        assert_eq!(Float(1e300).mul(Float(1e300)), Err(EvalError::Overflow));
        assert_eq!(Float(1e308).div(Float(1e-308)), Err(EvalError::Overflow));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(Int(i64::MAX).add(Int(1)), Err(EvalError::Overflow));
        assert_eq!(Int(i64::MIN).sub(Int(1)), Err(EvalError::Overflow));
    }

    #[test]
    fn test_bools_count_as_integers() {
        assert_eq!(Bool(true).add(Int(1)), Ok(Int(2)));
        assert_eq!(Bool(true).equal(Int(1)), Ok(Bool(true)));
        assert_eq!(Bool(false).ceil(), Ok(Int(0)));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(Int(1).less(Int(2)), Ok(Bool(true)));
        assert_eq!(Int(2).less_equal(Int(2)), Ok(Bool(true)));
        assert_eq!(Int(2).greater(Float(2.5)), Ok(Bool(false)));
        assert_eq!(Float(2.0).equal(Int(2)), Ok(Bool(true)));
        assert_eq!(Int(3).not_equal(Int(2)), Ok(Bool(true)));
        assert_eq!(Float(f64::NAN).not_equal(Float(f64::NAN)), Ok(Bool(true)));
        assert_eq!(Float(f64::NAN).greater_equal(Int(0)), Ok(Bool(false)));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(Float(3.5).ceil(), Ok(Int(4)));
        assert_eq!(Float(3.5).floor(), Ok(Int(3)));
        assert_eq!(Float(-3.5).floor(), Ok(Int(-4)));
        assert_eq!(Int(7).ceil(), Ok(Int(7)));
        assert_eq!(Float(f64::INFINITY).floor(), Err(EvalError::Overflow));
    }

    #[test]
    fn test_display() {
        assert_eq!(Int(-2).to_string(), "-2");
        assert_eq!(Float(-2.0).to_string(), "-2.0");
        assert_eq!(Float(3.5).to_string(), "3.5");
        assert_eq!(Bool(true).to_string(), "true");
    }

    #[test]
    fn test_display_exponent() {
        assert_eq!(Float(1e16).to_string(), "1e+16");
        assert_eq!(Float(-1.5e20).to_string(), "-1.5e+20");
        assert_eq!(Float(2.5e-5).to_string(), "2.5e-05");
        assert_eq!(Float(1e-123).to_string(), "1e-123");
        assert_eq!(Float(0.0001).to_string(), "0.0001");
    }
}
