use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::{BracketEntry, UploadedResult};

const RESULT_COLUMNS: &str =
    "id, event_id, result_type, uploaded_by, raw_data, file_name, mapping_json, is_final, uploaded_at";

/// Clear the final flag on any previous final result of this (event, type).
/// Keeps the "at most one final result" invariant without erroring.
pub fn unfinalize_previous(conn: &Connection, event_id: i64, result_type: &str) -> Result<usize> {
    conn.execute(
        "UPDATE results SET is_final = 0 WHERE event_id = ?1 AND result_type = ?2 AND is_final = 1",
        params![event_id, result_type],
    )
    .context("Failed to unmark previous final result")
}

#[allow(clippy::too_many_arguments)]
pub fn insert_result(
    conn: &Connection,
    event_id: i64,
    result_type: &str,
    uploaded_by: Option<&str>,
    raw_data: &[u8],
    file_name: &str,
    mapping_json: &str,
    is_final: bool,
) -> Result<UploadedResult> {
    let sql = format!(
        "INSERT INTO results (event_id, result_type, uploaded_by, raw_data, file_name, mapping_json, is_final) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING {RESULT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            event_id,
            result_type,
            uploaded_by,
            raw_data,
            file_name,
            mapping_json,
            is_final
        ],
        parse_result_row,
    )
    .context("Failed to insert result upload")
}

/// Final results carrying a parse mapping, oldest first. Uploads of the
/// simpler single-pass result types have no mapping and are not replayed.
pub fn list_final_for_event(conn: &Connection, event_id: i64) -> Result<Vec<UploadedResult>> {
    let sql = format!(
        "SELECT {RESULT_COLUMNS} FROM results WHERE event_id = ?1 AND is_final = 1 AND mapping_json IS NOT NULL ORDER BY id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![event_id], parse_result_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_result_row(row: &rusqlite::Row) -> rusqlite::Result<UploadedResult> {
    Ok(UploadedResult {
        id: row.get(0)?,
        event_id: row.get(1)?,
        result_type: row.get(2)?,
        uploaded_by: row.get(3)?,
        raw_data: row.get(4)?,
        file_name: row.get(5)?,
        mapping_json: row.get(6)?,
        is_final: row.get(7)?,
        uploaded_at: row.get(8)?,
    })
}

pub fn insert_entry(
    conn: &Connection,
    result_id: i64,
    competitor_name: &str,
    profile_id: Option<i64>,
    position: i64,
    discipline: &str,
    points: i64,
) -> Result<BracketEntry> {
    let sql = "INSERT INTO bracket_entries (result_id, competitor_name, profile_id, position, discipline, points) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id, result_id, competitor_name, profile_id, position, discipline, points";

    conn.query_row(
        sql,
        params![
            result_id,
            competitor_name,
            profile_id,
            position,
            discipline,
            points
        ],
        parse_entry_row,
    )
    .context("Failed to insert bracket entry")
}

pub fn list_entries(conn: &Connection, result_id: i64) -> Result<Vec<BracketEntry>> {
    let sql = "SELECT id, result_id, competitor_name, profile_id, position, discipline, points FROM bracket_entries WHERE result_id = ?1 ORDER BY discipline, position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![result_id], parse_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_entry_row(row: &rusqlite::Row) -> rusqlite::Result<BracketEntry> {
    Ok(BracketEntry {
        id: row.get(0)?,
        result_id: row.get(1)?,
        competitor_name: row.get(2)?,
        profile_id: row.get(3)?,
        position: row.get(4)?,
        discipline: row.get(5)?,
        points: row.get(6)?,
    })
}
