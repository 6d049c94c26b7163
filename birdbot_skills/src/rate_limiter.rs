use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { reason: String },
}

impl RateLimitDecision {
    pub fn is_limited(&self) -> bool {
        matches!(self, RateLimitDecision::Limited { .. })
    }
}

/// Tracks how many times each agent performed an action inside a trailing
/// window and says whether the next one is allowed.
///
/// Counters are shared by every skill holding the same limiter, so
/// concurrent callers draw from one budget per `(agent_id, action)` pair.
pub trait RateLimiter: Send + Sync {
    /// Check, and on success record, one invocation of `action` by
    /// `agent_id` under a policy of `max_requests` per `window_minutes`.
    fn check(
        &self,
        agent_id: &str,
        action: &str,
        max_requests: u32,
        window_minutes: i64,
    ) -> Result<RateLimitDecision>;
}

/// SQLite-backed window store. One row per `(agent_id, action)` holding the
/// running count and the window start time; when the window start falls out
/// of the trailing interval the counter resets.
pub struct SqliteRateLimiter {
    conn: Mutex<Connection>,
}

impl SqliteRateLimiter {
    /// Create or open the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path).context("Failed to open rate limit store")?;
        Self::with_connection(conn)
    }

    /// In-memory store for tests and one-shot runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory store")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"CREATE TABLE IF NOT EXISTS action_windows (
                agent_id TEXT NOT NULL,
                action TEXT NOT NULL,
                count INTEGER NOT NULL,
                window_start TEXT NOT NULL,
                PRIMARY KEY (agent_id, action)
            )"#,
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn check_at(
        &self,
        agent_id: &str,
        action: &str,
        max_requests: u32,
        window_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("rate limit store mutex poisoned"))?;

        let row = match conn.query_row(
            "SELECT count, window_start FROM action_windows WHERE agent_id = ?1 AND action = ?2",
            params![agent_id, action],
            |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)),
        ) {
            Ok(row) => Some(row),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        let window = Duration::minutes(window_minutes);
        if let Some((count, start_raw)) = row {
            let window_start: DateTime<Utc> = start_raw
                .parse()
                .context("Failed to parse rate limit window start")?;

            if now - window_start < window {
                if count >= max_requests {
                    let resets_at = window_start + window;
                    tracing::debug!(
                        agent_id,
                        action,
                        count,
                        max_requests,
                        "rate limit reached"
                    );
                    return Ok(RateLimitDecision::Limited {
                        reason: format!(
                            "Rate limit exceeded: {max_requests} requests per {window_minutes} minutes (resets at {})",
                            resets_at.to_rfc3339()
                        ),
                    });
                }

                conn.execute(
                    "UPDATE action_windows SET count = count + 1 WHERE agent_id = ?1 AND action = ?2",
                    params![agent_id, action],
                )?;
                return Ok(RateLimitDecision::Allowed);
            }
        }

        // First request ever, or the previous window has lapsed.
        conn.execute(
            "INSERT OR REPLACE INTO action_windows (agent_id, action, count, window_start)
             VALUES (?1, ?2, 1, ?3)",
            params![agent_id, action, now.to_rfc3339()],
        )?;
        Ok(RateLimitDecision::Allowed)
    }
}

impl RateLimiter for SqliteRateLimiter {
    fn check(
        &self,
        agent_id: &str,
        action: &str,
        max_requests: u32,
        window_minutes: i64,
    ) -> Result<RateLimitDecision> {
        self.check_at(agent_id, action, max_requests, window_minutes, Utc::now())
    }
}
