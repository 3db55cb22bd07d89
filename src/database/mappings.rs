use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::{ColumnMapping, FieldTag};
use crate::mapping::normalize_header;

/// Saved header -> tag rules for a league, keyed by normalized header.
/// Pre-fills the interactive mapping step on repeat uploads.
pub fn rules_for_league(conn: &Connection, league_id: i64) -> Result<HashMap<String, FieldTag>> {
    let sql = "SELECT header, tag FROM csv_column_mappings WHERE league_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![league_id], |row| {
            let header: String = row.get(0)?;
            let tag: String = row.get(1)?;
            Ok((header, tag))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load saved column mappings")?;

    let mut rules = HashMap::new();
    for (header, tag) in rows {
        if let Some(tag) = FieldTag::parse(&tag) {
            rules.insert(header, tag);
        }
    }
    Ok(rules)
}

/// Persist a confirmed mapping as the league's rules for next time.
/// Last confirmation wins per header.
pub fn save_rules(conn: &Connection, league_id: i64, mapping: &ColumnMapping) -> Result<()> {
    let sql = "INSERT INTO csv_column_mappings (league_id, header, tag) VALUES (?1, ?2, ?3) ON CONFLICT(league_id, header) DO UPDATE SET tag = excluded.tag";

    for column in &mapping.columns {
        let header = normalize_header(&column.header);
        if header.is_empty() {
            continue;
        }
        conn.execute(sql, params![league_id, header, column.tag.as_str()])
            .context("Failed to save column mapping rule")?;
    }

    Ok(())
}
