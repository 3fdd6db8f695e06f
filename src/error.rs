use crate::parse::ParseError;
use crate::roll::EvalError;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Eval(#[from] EvalError),
}

impl Error {
    /// The source offset the error refers to, when it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Parse(err) => Some(err.position()),
            Self::Eval(err) => err.position(),
        }
    }
}
