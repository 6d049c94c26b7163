//! Agent skills for acting on Twitter.
//!
//! Each skill is a thin wrapper over one platform API call: validate the
//! arguments, consult the client-side rate limiter, delegate the network
//! call to an authenticated client, and narrate the outcome as text. The
//! collaborators (auth, rate limiting, the HTTP client) are injected at
//! construction so skills stay testable without the network.

pub mod config;
pub mod error;
pub mod rate_limiter;
pub mod skill;
pub mod twitter;

pub use error::SkillError;
pub use skill::{run, run_blocking, Skill};
