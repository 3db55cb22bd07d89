use std::time::Duration;

use anyhow::Result;
use log::info;
use rusqlite::TransactionBehavior;
use serde::Serialize;

use crate::config::WizardSettings;
use crate::database::{self, DbPool};
use crate::domain::{ColumnMapping, ParseOutcome};
use crate::errors::EngineError;

use super::locks::LeagueLocks;

/// Everything needed to turn a confirmed wizard session into durable rows.
pub struct CommitRequest<'a> {
    pub league_id: i64,
    pub event_id: i64,
    pub result_type: &'a str,
    pub is_final: bool,
    pub uploaded_by: Option<&'a str>,
    pub file_name: &'a str,
    pub content: &'a str,
    pub mapping: &'a ColumnMapping,
    pub outcome: &'a ParseOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub result_id: i64,
    pub entries: usize,
    pub disciplines: usize,
    pub skipped_rows: usize,
}

/// Atomically persist one upload: the Result row, its bracket entries, and
/// the updated standings, all inside one immediate transaction under the
/// league's exclusive lock. Either everything lands or nothing does.
pub fn commit_upload(
    pool: &DbPool,
    locks: &LeagueLocks,
    settings: &WizardSettings,
    request: &CommitRequest<'_>,
) -> Result<CommitSummary> {
    let _guard = locks.acquire(
        request.league_id,
        settings.lock_retries,
        Duration::from_millis(settings.lock_retry_delay_ms),
    )?;

    let mut conn = database::get_connection(pool)?;

    let league_event =
        database::leagues::get_league_event(&conn, request.league_id, request.event_id)?.ok_or(
            EngineError::EventNotInLeague {
                league_id: request.league_id,
                event_id: request.event_id,
            },
        )?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if request.is_final {
        let cleared =
            database::results::unfinalize_previous(&tx, request.event_id, request.result_type)?;
        if cleared > 0 {
            info!(
                "Unmarked {cleared} previous final result(s) for event {} / {}",
                request.event_id, request.result_type
            );
        }
    }

    let mapping_json = serde_json::to_string(request.mapping)?;
    let result = database::results::insert_result(
        &tx,
        request.event_id,
        request.result_type,
        request.uploaded_by,
        request.content.as_bytes(),
        request.file_name,
        &mapping_json,
        request.is_final,
    )?;

    let mut entries_written = 0;
    let mut disciplines_affected = 0;

    for group in &request.outcome.disciplines {
        database::leagues::ensure_discipline(&tx, request.league_id, &group.discipline)?;
        if group.entries.is_empty() {
            continue;
        }
        disciplines_affected += 1;

        for entry in &group.entries {
            let profile = database::profiles::find_by_name(&tx, &entry.competitor_name)?;
            database::results::insert_entry(
                &tx,
                result.id,
                &entry.competitor_name,
                profile.map(|p| p.id),
                i64::from(entry.position),
                &group.discipline,
                entry.points,
            )?;
            entries_written += 1;
        }

        crate::standings::apply(&tx, &league_event, &group.discipline, &group.entries)?;
    }

    database::mappings::save_rules(&tx, request.league_id, request.mapping)?;

    tx.commit()?;

    info!(
        "Committed result {} for event {}: {entries_written} entries across {disciplines_affected} discipline(s), {} row(s) skipped",
        result.id, request.event_id, request.outcome.skipped_rows
    );

    Ok(CommitSummary {
        result_id: result.id,
        entries: entries_written,
        disciplines: disciplines_affected,
        skipped_rows: request.outcome.skipped_rows,
    })
}
