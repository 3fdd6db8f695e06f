use super::num::Value;
use crate::common::Int;
use std::fmt;

/// One `NdM` roll performed during evaluation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RollRecord {
    pub count: Int,
    pub sides: Int,
    /// Individual draws, in the order they were rolled.
    pub results: Vec<Int>,
    pub total: Int,
}

impl fmt::Display for RollRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}: {} = ", self.count, self.sides, self.total)?;
        for (i, x) in self.results.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", x)?;
        }
        Ok(())
    }
}

/// The outcome of evaluating one expression.
///
/// Its `Display` form is the roll trace followed by a `Total:` line:
///
/// ```text
/// 2d6: 7 = 3, 4
/// Total: 9
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub rolls: Vec<RollRecord>,
    pub total: Value,
}

impl Evaluation {
    pub fn total(&self) -> Value {
        self.total
    }

    pub fn rolls(&self) -> &[RollRecord] {
        &self.rolls
    }

    /// The trace lines, one per roll, in roll order.
    pub fn trace(&self) -> impl Iterator<Item = String> + '_ {
        self.rolls.iter().map(ToString::to_string)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for roll in &self.rolls {
            writeln!(f, "{}", roll)?;
        }
        write!(f, "Total: {}", self.total)
    }
}
