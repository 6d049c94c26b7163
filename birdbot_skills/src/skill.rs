use async_trait::async_trait;
use serde_json::Value;

use crate::error::SkillError;

/// An action an agent can take, described with a JSON-schema interface.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Unique name of the skill, e.g. `reply_tweet`.
    fn name(&self) -> &str;

    /// Human-readable description of what the skill does.
    fn description(&self) -> &str;

    /// JSON schema for the arguments object.
    fn args_schema(&self) -> Value;

    /// Execute the skill. `Ok` carries the success narration shown to the
    /// agent; errors stay tagged until the narration edge.
    async fn execute(&self, args: Value) -> Result<String, SkillError>;
}

/// Narration edge: flatten a skill result into the string contract.
///
/// Skill output is always text, so no error escapes past this point.
pub async fn run(skill: &dyn Skill, args: Value) -> String {
    match skill.execute(args).await {
        Ok(message) => message,
        Err(err) => {
            tracing::warn!(skill = skill.name(), error = %err, "skill failed");
            err.to_string()
        }
    }
}

/// Synchronous entry point with the same contract as [`run`].
///
/// Drives the async sequence to completion on a dedicated runtime; the
/// caller blocks for the duration of the platform call.
pub fn run_blocking(skill: &dyn Skill, args: Value) -> String {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(run(skill, args)),
        Err(err) => format!("Error executing skill {}: {err}", skill.name()),
    }
}
