use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::database::models::{LeagueEvent, LeagueStanding};
use crate::database::{profiles, standings};
use crate::domain::ParsedEntry;

/// One event's contribution to a standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventScore {
    pub points: i64,
    pub position: u32,
}

/// Per-event contributions keyed by event id. BTreeMap keeps the JSON
/// encoding stable, which the rebuild idempotence guarantee relies on.
pub type EventResults = BTreeMap<i64, EventScore>;

/// Merge one discipline's parsed entries into the league standings.
///
/// Points are scaled by the league event's multiplier. A repeat contribution
/// from the same event replaces that event's slot instead of double counting;
/// total points are always recomputed as the sum over all contributions.
/// Afterwards the whole (league, discipline) gets fresh average ranks and a
/// dense 1..N position ordering.
pub fn apply(
    conn: &Connection,
    league_event: &LeagueEvent,
    discipline: &str,
    entries: &[ParsedEntry],
) -> Result<()> {
    for entry in entries {
        let adjusted = adjust_points(entry.points, league_event.multiplier);
        let score = EventScore {
            points: adjusted,
            position: entry.position,
        };
        upsert_contribution(conn, league_event, discipline, entry, score)?;
    }

    finalize_discipline(conn, league_event.league_id, discipline)
}

/// `floor(raw_points * multiplier)`.
pub fn adjust_points(raw_points: i64, multiplier: f64) -> i64 {
    (raw_points as f64 * multiplier).floor() as i64
}

fn upsert_contribution(
    conn: &Connection,
    league_event: &LeagueEvent,
    discipline: &str,
    entry: &ParsedEntry,
    score: EventScore,
) -> Result<()> {
    let existing = standings::find(
        conn,
        league_event.league_id,
        discipline,
        &entry.competitor_name,
    )?;

    match existing {
        Some(standing) => {
            let mut results = decode_event_results(&standing.event_results_json)?;
            results.insert(league_event.event_id, score);
            let points = total_points(&results);
            let events_competed = results.len() as i64;
            standings::update_contribution(
                conn,
                standing.id,
                points,
                events_competed,
                &encode_event_results(&results)?,
            )?;
        }
        None => {
            let results = EventResults::from([(league_event.event_id, score)]);
            let profile = profiles::find_by_name(conn, &entry.competitor_name)?;
            standings::insert(
                conn,
                league_event.league_id,
                discipline,
                &entry.competitor_name,
                profile.map(|p| p.id),
                total_points(&results),
                1,
                &encode_event_results(&results)?,
            )?;
        }
    }

    Ok(())
}

/// Recompute average ranks and reassign dense positions for a discipline.
fn finalize_discipline(conn: &Connection, league_id: i64, discipline: &str) -> Result<()> {
    let mut rows = standings::list_for_discipline(conn, league_id, discipline)?;

    for row in &mut rows {
        let results = decode_event_results(&row.event_results_json)?;
        row.average_rank = average_rank(&results);
    }

    rows.sort_by(compare_standings);

    for (idx, row) in rows.iter().enumerate() {
        standings::update_ranking(conn, row.id, idx as i64 + 1, row.average_rank)?;
    }

    Ok(())
}

/// Points descending, then better (lower) average rank, then name. A strict
/// total order, so positions come out 1..N with no arbitrary gaps.
pub fn compare_standings(a: &LeagueStanding, b: &LeagueStanding) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(a.average_rank.total_cmp(&b.average_rank))
        .then_with(|| a.competitor_name.cmp(&b.competitor_name))
}

pub fn total_points(results: &EventResults) -> i64 {
    results.values().map(|score| score.points).sum()
}

pub fn average_rank(results: &EventResults) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let sum: u32 = results.values().map(|score| score.position).sum();
    f64::from(sum) / results.len() as f64
}

pub fn decode_event_results(json: &str) -> Result<EventResults> {
    serde_json::from_str(json).context("Failed to decode event results")
}

pub fn encode_event_results(results: &EventResults) -> Result<String> {
    serde_json::to_string(results).context("Failed to encode event results")
}

/// Read interface for collaborators: standings of one (league, discipline)
/// in stored ranking order.
pub fn get_standings(
    conn: &Connection,
    league_id: i64,
    discipline: &str,
) -> Result<Vec<LeagueStanding>> {
    standings::list_for_discipline(conn, league_id, discipline)
}
