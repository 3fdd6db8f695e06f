mod ctx;
mod error;
mod num;
mod record;
mod roller;

type RResult<T> = Result<T, EvalError>;

pub use ctx::{DefaultRoller, RollContext, DEFAULT_MAX_ROLLS};
pub use error::EvalError;
pub use num::Value;
pub use record::{Evaluation, RollRecord};
pub use roller::Roller;
