use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Discipline, Event, League, LeagueEvent};
use crate::domain::slugify;

const LEAGUE_COLUMNS: &str = "id, name, slug, season, class, region, description, created_at";

pub fn create_league(
    conn: &Connection,
    name: &str,
    season: Option<&str>,
    class: Option<&str>,
    region: Option<&str>,
    description: Option<&str>,
) -> Result<League> {
    let slug = slugify(name);
    let sql = format!(
        "INSERT INTO leagues (name, slug, season, class, region, description) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {LEAGUE_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![name, slug, season, class, region, description],
        parse_league_row,
    )
    .context("Failed to insert new league")
}

pub fn find_by_slug(conn: &Connection, slug: &str) -> Result<Option<League>> {
    let sql = format!("SELECT {LEAGUE_COLUMNS} FROM leagues WHERE slug = ?1");

    conn.query_row(&sql, params![slug], parse_league_row)
        .optional()
        .context("Failed to query league by slug")
}

fn parse_league_row(row: &rusqlite::Row) -> rusqlite::Result<League> {
    Ok(League {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        season: row.get(3)?,
        class: row.get(4)?,
        region: row.get(5)?,
        description: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn delete_league(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM leagues WHERE id = ?1", params![id])
        .context("Failed to delete league")
        .map(|_| ())
}

pub fn create_event(conn: &Connection, name: &str) -> Result<Event> {
    let sql = "INSERT INTO events (name) VALUES (?1) RETURNING id, name, created_at";

    conn.query_row(sql, params![name], parse_event_row)
        .context("Failed to insert new event")
}

fn parse_event_row(row: &rusqlite::Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Attach an event to a league with its scoring factors. Re-linking an
/// already attached event updates multiplier and weight in place.
pub fn link_event(
    conn: &Connection,
    league_id: i64,
    event_id: i64,
    multiplier: f64,
    weight: i64,
) -> Result<LeagueEvent> {
    let sql = "INSERT INTO league_events (league_id, event_id, multiplier, weight) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(league_id, event_id) DO UPDATE SET multiplier = excluded.multiplier, weight = excluded.weight RETURNING id, league_id, event_id, multiplier, weight";

    conn.query_row(
        sql,
        params![league_id, event_id, multiplier, weight],
        parse_league_event_row,
    )
    .context("Failed to link event to league")
}

pub fn get_league_event(
    conn: &Connection,
    league_id: i64,
    event_id: i64,
) -> Result<Option<LeagueEvent>> {
    let sql = "SELECT id, league_id, event_id, multiplier, weight FROM league_events WHERE league_id = ?1 AND event_id = ?2";

    conn.query_row(sql, params![league_id, event_id], parse_league_event_row)
        .optional()
        .context("Failed to query league event")
}

/// League events in attach order; the replay order of the recalculation engine.
pub fn list_league_events(conn: &Connection, league_id: i64) -> Result<Vec<LeagueEvent>> {
    let sql = "SELECT id, league_id, event_id, multiplier, weight FROM league_events WHERE league_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![league_id], parse_league_event_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_league_event_row(row: &rusqlite::Row) -> rusqlite::Result<LeagueEvent> {
    Ok(LeagueEvent {
        id: row.get(0)?,
        league_id: row.get(1)?,
        event_id: row.get(2)?,
        multiplier: row.get(3)?,
        weight: row.get(4)?,
    })
}

/// Disciplines may be pre-declared or auto-created during ingestion; the
/// (league, slug) pair is unique either way.
pub fn ensure_discipline(conn: &Connection, league_id: i64, name: &str) -> Result<Discipline> {
    let slug = slugify(name);
    if let Some(existing) = find_discipline(conn, league_id, &slug)? {
        return Ok(existing);
    }

    let sql = "INSERT INTO disciplines (league_id, name, slug) VALUES (?1, ?2, ?3) RETURNING id, league_id, name, slug";

    conn.query_row(sql, params![league_id, name, slug], parse_discipline_row)
        .context("Failed to insert new discipline")
}

fn find_discipline(conn: &Connection, league_id: i64, slug: &str) -> Result<Option<Discipline>> {
    let sql = "SELECT id, league_id, name, slug FROM disciplines WHERE league_id = ?1 AND slug = ?2";

    conn.query_row(sql, params![league_id, slug], parse_discipline_row)
        .optional()
        .context("Failed to query discipline")
}

pub fn list_disciplines(conn: &Connection, league_id: i64) -> Result<Vec<Discipline>> {
    let sql = "SELECT id, league_id, name, slug FROM disciplines WHERE league_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![league_id], parse_discipline_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_discipline_row(row: &rusqlite::Row) -> rusqlite::Result<Discipline> {
    Ok(Discipline {
        id: row.get(0)?,
        league_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
    })
}
