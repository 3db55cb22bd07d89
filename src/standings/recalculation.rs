use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use rusqlite::TransactionBehavior;
use serde::Serialize;

use crate::config::AppConfig;
use crate::database::{self, DbPool};
use crate::domain::ColumnMapping;
use crate::mapping;
use crate::parser;
use crate::points::PointsSystem;
use crate::services::locks::LeagueLocks;

use super::aggregator;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildSummary {
    pub events: usize,
    pub results_replayed: usize,
    pub standings: usize,
}

/// Rebuild every standing of a league from its stored raw results.
///
/// Deletes the league's standings, then replays the parser and aggregator
/// over every final result of every league event in attach order, all in one
/// transaction under the league lock. Running it twice with no intervening
/// uploads produces identical rows: parsing is deterministic and the stored
/// mappings are replayed as-is.
pub fn rebuild(
    pool: &DbPool,
    locks: &LeagueLocks,
    config: &AppConfig,
    league_id: i64,
) -> Result<RebuildSummary> {
    let _guard = locks.acquire(
        league_id,
        config.wizard.lock_retries,
        Duration::from_millis(config.wizard.lock_retry_delay_ms),
    )?;

    let mut conn = database::get_connection(pool)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let removed = database::standings::delete_for_league(&tx, league_id)?;
    info!("Rebuild for league {league_id}: cleared {removed} standing(s)");

    let league_events = database::leagues::list_league_events(&tx, league_id)?;
    let points = PointsSystem::new(config.points.overrides.clone());
    let mut results_replayed = 0;

    for league_event in &league_events {
        for result in database::results::list_final_for_event(&tx, league_event.event_id)? {
            let Some(mapping_json) = result.mapping_json.as_deref() else {
                continue;
            };
            let stored: ColumnMapping = serde_json::from_str(mapping_json)
                .with_context(|| format!("Corrupt mapping on result {}", result.id))?;
            let validated = mapping::validate(stored)?;

            let content = String::from_utf8(result.raw_data)
                .with_context(|| format!("Result {} raw data is not UTF-8", result.id))?;
            let table = parser::read_table(&content)?;
            let detected = parser::detect(&table, &validated);
            let outcome = parser::parse(&table, &validated, &detected, &points);

            for group in &outcome.disciplines {
                if !group.entries.is_empty() {
                    aggregator::apply(&tx, league_event, &group.discipline, &group.entries)?;
                }
            }
            results_replayed += 1;
        }
    }

    let standings = database::standings::list_for_league(&tx, league_id)?.len();
    tx.commit()?;

    info!(
        "Rebuild for league {league_id} complete: {} event(s), {results_replayed} result(s), {standings} standing(s)",
        league_events.len()
    );

    Ok(RebuildSummary {
        events: league_events.len(),
        results_replayed,
        standings,
    })
}
