use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::LeagueStanding;

const STANDING_COLUMNS: &str = "id, league_id, discipline, competitor_name, profile_id, points, events_competed, position, average_rank, event_results_json";

pub fn find(
    conn: &Connection,
    league_id: i64,
    discipline: &str,
    competitor_name: &str,
) -> Result<Option<LeagueStanding>> {
    let sql = format!(
        "SELECT {STANDING_COLUMNS} FROM league_standings WHERE league_id = ?1 AND discipline = ?2 AND competitor_name = ?3"
    );

    conn.query_row(
        &sql,
        params![league_id, discipline, competitor_name],
        parse_standing_row,
    )
    .optional()
    .context("Failed to query league standing")
}

pub fn insert(
    conn: &Connection,
    league_id: i64,
    discipline: &str,
    competitor_name: &str,
    profile_id: Option<i64>,
    points: i64,
    events_competed: i64,
    event_results_json: &str,
) -> Result<LeagueStanding> {
    let sql = format!(
        "INSERT INTO league_standings (league_id, discipline, competitor_name, profile_id, points, events_competed, event_results_json) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING {STANDING_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            league_id,
            discipline,
            competitor_name,
            profile_id,
            points,
            events_competed,
            event_results_json
        ],
        parse_standing_row,
    )
    .context("Failed to insert league standing")
}

pub fn update_contribution(
    conn: &Connection,
    id: i64,
    points: i64,
    events_competed: i64,
    event_results_json: &str,
) -> Result<()> {
    conn.execute(
        "UPDATE league_standings SET points = ?1, events_competed = ?2, event_results_json = ?3 WHERE id = ?4",
        params![points, events_competed, event_results_json, id],
    )
    .context("Failed to update league standing contribution")
    .map(|_| ())
}

pub fn update_ranking(conn: &Connection, id: i64, position: i64, average_rank: f64) -> Result<()> {
    conn.execute(
        "UPDATE league_standings SET position = ?1, average_rank = ?2 WHERE id = ?3",
        params![position, average_rank, id],
    )
    .context("Failed to update league standing ranking")
    .map(|_| ())
}

/// All standings of one (league, discipline), points descending. Rows carry
/// their stored dense positions, so this is also the read interface order.
pub fn list_for_discipline(
    conn: &Connection,
    league_id: i64,
    discipline: &str,
) -> Result<Vec<LeagueStanding>> {
    let sql = format!(
        "SELECT {STANDING_COLUMNS} FROM league_standings WHERE league_id = ?1 AND discipline = ?2 ORDER BY points DESC, average_rank ASC, competitor_name ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![league_id, discipline], parse_standing_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_for_league(conn: &Connection, league_id: i64) -> Result<Vec<LeagueStanding>> {
    let sql = format!(
        "SELECT {STANDING_COLUMNS} FROM league_standings WHERE league_id = ?1 ORDER BY discipline ASC, points DESC, average_rank ASC, competitor_name ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![league_id], parse_standing_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_for_league(conn: &Connection, league_id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM league_standings WHERE league_id = ?1",
        params![league_id],
    )
    .context("Failed to delete league standings")
}

fn parse_standing_row(row: &rusqlite::Row) -> rusqlite::Result<LeagueStanding> {
    Ok(LeagueStanding {
        id: row.get(0)?,
        league_id: row.get(1)?,
        discipline: row.get(2)?,
        competitor_name: row.get(3)?,
        profile_id: row.get(4)?,
        points: row.get(5)?,
        events_competed: row.get(6)?,
        position: row.get(7)?,
        average_rank: row.get(8)?,
        event_results_json: row.get(9)?,
    })
}
