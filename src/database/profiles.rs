use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Profile;

/// Best-effort, case-insensitive name match against registered competitors.
/// Used only to enrich entries; never required for correctness.
pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Profile>> {
    let sql = "SELECT id, name, created_at FROM profiles WHERE name = ?1 COLLATE NOCASE LIMIT 1";

    conn.query_row(sql, params![name.trim()], parse_profile_row)
        .optional()
        .context("Failed to query profile by name")
}

pub fn create_profile(conn: &Connection, name: &str) -> Result<Profile> {
    let sql = "INSERT INTO profiles (name) VALUES (?1) RETURNING id, name, created_at";

    conn.query_row(sql, params![name], parse_profile_row)
        .context("Failed to insert new profile")
}

fn parse_profile_row(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}
