//! Error types for the evaluation module.

use crate::agent::AgentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    /// An [`Eval`](super::Eval) was built with different criteria in `scores` and `denoms`.
    #[error("scores and denoms have different sets of keys: {scores:?}, {denoms:?}")]
    KeyMismatch {
        scores: Vec<String>,
        denoms: Vec<String>,
    },

    /// A criterion claims to aggregate zero ratings.
    #[error("criterion {key} has a zero denominator")]
    ZeroDenominator { key: String },

    /// The dialogue cannot be evaluated as requested.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl EvalError {
    /// Returns true when only the current trial should be abandoned.
    pub fn is_precondition(&self) -> bool {
        match self {
            EvalError::Precondition(_) => true,
            EvalError::Agent(err) => err.is_precondition(),
            EvalError::KeyMismatch { .. } | EvalError::ZeroDenominator { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_preconditions_count_as_preconditions() {
        let err: EvalError = AgentError::Precondition("empty corpus".to_string()).into();
        assert!(err.is_precondition());

        let err: EvalError = AgentError::Generation("HTTP 500".to_string()).into();
        assert!(!err.is_precondition());
        assert_eq!(err.to_string(), "Generation failed: HTTP 500");
    }
}
