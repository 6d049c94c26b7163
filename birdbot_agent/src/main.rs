use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use birdbot_skills::config::BirdbotConfig;
use birdbot_skills::rate_limiter::{RateLimiter, SqliteRateLimiter};
use birdbot_skills::twitter::{self, AuthProvider, TwitterAuth};
use birdbot_skills::Skill;

#[derive(Parser)]
#[command(name = "birdbot", about = "Run Twitter agent skills from the command line")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered skills with their argument schemas
    List,
    /// Execute one skill and print its narrated result
    Run {
        /// Skill name, e.g. reply_tweet
        skill: String,
        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = BirdbotConfig::load(cli.config.as_deref())?;

    let auth: Arc<dyn AuthProvider> = Arc::new(TwitterAuth::new(config.twitter.clone()));
    if let Some(parent) = config.rate_limit_db.parent() {
        std::fs::create_dir_all(parent).context("Failed to create data directory")?;
    }
    let limiter: Arc<dyn RateLimiter> =
        Arc::new(SqliteRateLimiter::open(&config.rate_limit_db)?);
    let skills = twitter::twitter_skills(config.agent_id().to_string(), auth, limiter);

    match cli.command {
        Command::List => {
            let listing: Vec<Value> = skills
                .iter()
                .map(|skill| {
                    serde_json::json!({
                        "name": skill.name(),
                        "description": skill.description(),
                        "parameters": skill.args_schema(),
                    })
                })
                .collect();
            let payload = serde_json::json!({ "skills": listing });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Run { skill: name, args } => {
            let args: Value =
                serde_json::from_str(&args).context("--args must be a JSON object")?;
            let skill = skills
                .iter()
                .find(|skill| skill.name() == name)
                .ok_or_else(|| anyhow!("Unknown skill: {name}"))?;

            tracing::info!(skill = name.as_str(), "executing skill");
            // The narrated string is the whole contract; failures are text,
            // not exit codes.
            let output = birdbot_skills::run(skill.as_ref(), args).await;
            println!("{output}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,birdbot=debug"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
