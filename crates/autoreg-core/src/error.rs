use thiserror::Error;

use crate::solver::SolveError;

/// Every fatal condition the synthesis pipeline can raise.
///
/// None of these are retried: they all come from the configuration or from
/// properties of the fitted model, never from transient resource issues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutoregError {
    #[error("invalid {field}: {value}")]
    InvalidConfig { field: &'static str, value: String },

    #[error("variance is negative or not finite: {0}")]
    NegativeVariance(f64),

    #[error("AR process is not stationary: {count} coefficient(s) with |phi| > 1 (max |phi| = {max_abs})")]
    NonStationary { count: usize, max_abs: f64 },

    #[error("Yule-Walker matrix is singular: pivot {pivot} is zero")]
    SingularMatrix { pivot: usize },

    #[error("white noise generator produced NaN at element {index}")]
    NanInNoise { index: usize },

    #[error("{required} or more samples required, got {len}")]
    TooFewSamples { len: usize, required: usize },
}

impl AutoregError {
    pub(crate) fn invalid(field: &'static str, value: impl std::fmt::Display) -> Self {
        Self::InvalidConfig { field, value: value.to_string() }
    }
}

impl From<SolveError> for AutoregError {
    fn from(e: SolveError) -> Self {
        match e {
            SolveError::Singular { pivot } => Self::SingularMatrix { pivot },
        }
    }
}

pub type Result<T> = std::result::Result<T, AutoregError>;
