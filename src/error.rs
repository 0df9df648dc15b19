//! Errors raised by the model constructors and the inference routines.
use thiserror::Error;

/// Shorthand used throughout this crate.
pub type Result<T> = std::result::Result<T, HMMError>;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HMMError {
    /// Dimensions or values of the model or the observation sequence do not agree.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Sum of alpha*beta over the states vanished at `time`, so the posterior can not be normalized.
    #[error("degenerate distribution at time {time}: the normalizing factor is zero")]
    DegenerateDistribution { time: usize },
}

impl HMMError {
    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        HMMError::InvalidInput(message.into())
    }
}

impl std::convert::From<HMMError> for std::io::Error {
    fn from(why: HMMError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::InvalidData, why)
    }
}
