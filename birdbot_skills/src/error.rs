use thiserror::Error;

/// Failure categories for skill execution.
///
/// Skill output is always narrated text, so every variant carries the final
/// human-readable message. The variants stay distinguishable inside the
/// crate; the narration edge in [`crate::skill`] flattens them to plain
/// strings for the agent.
#[derive(Debug, Error)]
pub enum SkillError {
    /// Arguments failed validation before the skill body ran.
    #[error("{0}")]
    InvalidArgs(String),

    /// The client-side rate limit refused the action.
    #[error("{0}")]
    RateLimited(String),

    /// No authenticated platform client is available.
    #[error("{0}")]
    ClientUnavailable(String),

    /// The platform call failed or returned something unusable.
    #[error("{0}")]
    Platform(String),
}
