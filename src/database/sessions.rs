use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

/// Raw session row; TTL interpretation lives in the wizard store.
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub token: String,
    pub state_json: String,
    pub expires_at: NaiveDateTime,
}

pub fn upsert(
    conn: &Connection,
    token: &str,
    state_json: &str,
    created_at: NaiveDateTime,
    expires_at: NaiveDateTime,
) -> Result<()> {
    let sql = "INSERT INTO wizard_sessions (token, state_json, created_at, expires_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(token) DO UPDATE SET state_json = excluded.state_json, expires_at = excluded.expires_at";

    conn.execute(sql, params![token, state_json, created_at, expires_at])
        .context("Failed to store wizard session")
        .map(|_| ())
}

pub fn find(conn: &Connection, token: &str) -> Result<Option<SessionRow>> {
    let sql = "SELECT token, state_json, expires_at FROM wizard_sessions WHERE token = ?1";

    conn.query_row(sql, params![token], |row| {
        Ok(SessionRow {
            token: row.get(0)?,
            state_json: row.get(1)?,
            expires_at: row.get(2)?,
        })
    })
    .optional()
    .context("Failed to query wizard session")
}

pub fn delete(conn: &Connection, token: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM wizard_sessions WHERE token = ?1",
        params![token],
    )
    .context("Failed to delete wizard session")
    .map(|_| ())
}

pub fn purge_expired(conn: &Connection, now: NaiveDateTime) -> Result<usize> {
    conn.execute(
        "DELETE FROM wizard_sessions WHERE expires_at < ?1",
        params![now],
    )
    .context("Failed to purge expired wizard sessions")
}
