use anyhow::{Context, Result};
use chrono::{Duration, Utc};

use crate::database::{self, sessions, DbPool};
use crate::errors::EngineError;

use super::state::WizardState;

/// Keyed, TTL-bounded persistence for wizard sessions. Backed by the
/// database rather than process memory so concurrent wizards never share
/// state and a restart does not orphan in-flight uploads.
pub struct WizardStore<'a> {
    pool: &'a DbPool,
    ttl_minutes: i64,
}

impl<'a> WizardStore<'a> {
    pub fn new(pool: &'a DbPool, ttl_minutes: i64) -> Self {
        Self { pool, ttl_minutes }
    }

    /// Insert or refresh a session; every write extends the TTL. Expired
    /// rows are purged opportunistically on the way.
    pub fn put(&self, token: &str, state: &WizardState) -> Result<()> {
        let conn = database::get_connection(self.pool)?;
        let now = Utc::now().naive_utc();
        sessions::purge_expired(&conn, now)?;

        let state_json = serde_json::to_string(state).context("Failed to serialize session")?;
        let expires_at = now + Duration::minutes(self.ttl_minutes);
        sessions::upsert(&conn, token, &state_json, now, expires_at)
    }

    /// Load a live session. Unknown tokens and expired sessions both
    /// surface as `WizardStateExpired`; expiry is an implicit cancel.
    pub fn load(&self, token: &str) -> Result<WizardState> {
        let conn = database::get_connection(self.pool)?;
        let row = sessions::find(&conn, token)?.ok_or(EngineError::WizardStateExpired)?;

        let now = Utc::now().naive_utc();
        if row.expires_at < now {
            sessions::delete(&conn, token)?;
            return Err(EngineError::WizardStateExpired.into());
        }

        serde_json::from_str(&row.state_json).context("Failed to deserialize session")
    }

    pub fn delete(&self, token: &str) -> Result<()> {
        let conn = database::get_connection(self.pool)?;
        sessions::delete(&conn, token)
    }
}
