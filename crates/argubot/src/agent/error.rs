//! Error types for the agent module.

use thiserror::Error;

/// Errors that can occur while an agent produces a turn.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The text-generation backend failed (transport, rate limit, malformed request).
    ///
    /// These are propagated uninterpreted and never retried.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// A requirement on the agent's inputs or backing data was violated.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// A prompt template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The claims service failed.
    #[error("Claim store error: {0}")]
    ClaimStore(String),

    /// A generic error for other cases.
    #[error("Agent error: {0}")]
    Other(String),
}

impl AgentError {
    /// Returns true for precondition violations.
    ///
    /// These abort the current dialogue or evaluation only, never a whole campaign.
    pub fn is_precondition(&self) -> bool {
        matches!(self, AgentError::Precondition(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_precondition() {
        assert!(AgentError::Precondition("empty corpus".to_string()).is_precondition());
        assert!(!AgentError::Generation("timeout".to_string()).is_precondition());
        assert!(!AgentError::Other("unknown".to_string()).is_precondition());
    }

    #[test]
    fn test_display_messages() {
        let err = AgentError::Generation("HTTP 429".to_string());
        assert_eq!(err.to_string(), "Generation failed: HTTP 429");
    }
}
