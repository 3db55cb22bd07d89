use log::debug;

use crate::domain::{
    DetectedDisciplines, DisciplineEntries, DisciplinePlan, FieldTag, ParseOutcome, ParsedEntry,
    RawTable,
};
use crate::mapping::ValidatedMapping;
use crate::points::PointsSystem;

/// Normalize raw rows into per-discipline ranked entries.
///
/// Rows failing type coercion are skipped and counted, never fatal. Within
/// each discipline, entries get dense 1-based positions ordered by their
/// source rank; entries without a usable POINTS cell fall back to the points
/// formula applied to that dense position.
pub fn parse(
    table: &RawTable,
    mapping: &ValidatedMapping,
    detected: &DetectedDisciplines,
    points: &PointsSystem,
) -> ParseOutcome {
    match &detected.plan {
        DisciplinePlan::FromHeaderSet { columns } => {
            parse_wide(table, mapping, &detected.names, columns, points)
        }
        plan => parse_long(table, mapping, detected, plan, points),
    }
}

/// A row as it looks before dense positions are assigned.
struct RankedRow {
    competitor_name: String,
    source_rank: u32,
    raw_points: Option<i64>,
}

/// One-entry-per-row layouts: a discipline column, or the implicit "Open".
fn parse_long(
    table: &RawTable,
    mapping: &ValidatedMapping,
    detected: &DetectedDisciplines,
    plan: &DisciplinePlan,
    points: &PointsSystem,
) -> ParseOutcome {
    let points_column = mapping.first_index_of(FieldTag::Points);
    let mut groups: Vec<(String, Vec<RankedRow>)> = detected
        .names
        .iter()
        .map(|name| (name.clone(), Vec::new()))
        .collect();
    let mut skipped_rows = 0;

    for (line, row) in table.rows.iter().enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let name = RawTable::cell(row, mapping.name_column()).trim();
        if name.is_empty() {
            debug!("Skipping row {}: empty competitor name", line + 2);
            skipped_rows += 1;
            continue;
        }

        let rank_cell = RawTable::cell(row, mapping.rank_column()).trim();
        let Ok(source_rank) = rank_cell.parse::<u32>() else {
            debug!("Skipping row {}: unparseable rank '{rank_cell}'", line + 2);
            skipped_rows += 1;
            continue;
        };

        let discipline = match plan {
            DisciplinePlan::FromColumn { column } => {
                let value = RawTable::cell(row, *column).trim();
                if value.is_empty() {
                    debug!("Skipping row {}: empty discipline", line + 2);
                    skipped_rows += 1;
                    continue;
                }
                value.to_string()
            }
            _ => super::DEFAULT_DISCIPLINE.to_string(),
        };

        let raw_points = points_column
            .map(|column| RawTable::cell(row, column).trim())
            .and_then(|cell| cell.parse::<i64>().ok());

        let Some((_, rows)) = groups.iter_mut().find(|(name, _)| *name == discipline) else {
            // Discipline set is fixed by the detector for this upload.
            debug!("Skipping row {}: unknown discipline '{discipline}'", line + 2);
            skipped_rows += 1;
            continue;
        };
        rows.push(RankedRow {
            competitor_name: name.to_string(),
            source_rank,
            raw_points,
        });
    }

    build_outcome(groups, points, skipped_rows)
}

/// Wide layouts: each discipline column cell is that competitor's finishing
/// position in the discipline; empty cells mean "did not compete".
fn parse_wide(
    table: &RawTable,
    mapping: &ValidatedMapping,
    names: &[String],
    columns: &[usize],
    points: &PointsSystem,
) -> ParseOutcome {
    let mut groups: Vec<(String, Vec<RankedRow>)> = names
        .iter()
        .map(|name| (name.clone(), Vec::new()))
        .collect();
    let mut skipped_rows = 0;

    for (line, row) in table.rows.iter().enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let name = RawTable::cell(row, mapping.name_column()).trim();
        if name.is_empty() {
            debug!("Skipping row {}: empty competitor name", line + 2);
            skipped_rows += 1;
            continue;
        }

        for (group, &column) in groups.iter_mut().zip(columns) {
            let cell = RawTable::cell(row, column).trim();
            if cell.is_empty() {
                continue;
            }
            let Ok(source_rank) = cell.parse::<u32>() else {
                debug!(
                    "Skipping row {} for discipline '{}': unparseable position '{cell}'",
                    line + 2,
                    group.0
                );
                skipped_rows += 1;
                continue;
            };
            group.1.push(RankedRow {
                competitor_name: name.to_string(),
                source_rank,
                raw_points: None,
            });
        }
    }

    build_outcome(groups, points, skipped_rows)
}

fn build_outcome(
    groups: Vec<(String, Vec<RankedRow>)>,
    points: &PointsSystem,
    skipped_rows: usize,
) -> ParseOutcome {
    let disciplines = groups
        .into_iter()
        .map(|(discipline, rows)| DisciplineEntries {
            discipline,
            entries: rank_densely(rows, points),
        })
        .collect();

    ParseOutcome {
        disciplines,
        skipped_rows,
    }
}

/// Sort by source rank and assign dense positions: distinct rank values map
/// to 1, 2, 3, ...; equal source ranks share a position.
fn rank_densely(mut rows: Vec<RankedRow>, points: &PointsSystem) -> Vec<ParsedEntry> {
    rows.sort_by_key(|row| row.source_rank);

    let mut entries = Vec::with_capacity(rows.len());
    let mut dense_position = 0u32;
    let mut previous_rank = None;

    for row in rows {
        if previous_rank != Some(row.source_rank) {
            dense_position += 1;
            previous_rank = Some(row.source_rank);
        }
        let points_value = row
            .raw_points
            .unwrap_or_else(|| points.points_for_position(dense_position));
        entries.push(ParsedEntry {
            competitor_name: row.competitor_name,
            position: dense_position,
            points: points_value,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping;
    use crate::parser::{detect, read_table};

    fn validated_for(table: &RawTable) -> ValidatedMapping {
        let proposed = mapping::suggest(&table.headers, &Default::default());
        mapping::validate(proposed).expect("headers should map")
    }

    fn parse_csv(content: &str) -> ParseOutcome {
        let table = read_table(content).expect("csv should read");
        let mapping = validated_for(&table);
        let detected = detect(&table, &mapping);
        parse(&table, &mapping, &detected, &PointsSystem::default())
    }

    #[test]
    fn simple_file_parses_into_open() {
        let outcome = parse_csv("Pos,Rider,Pts\n1,Alice,1000\n2,Bob,900\n3,Cara,800\n");
        assert_eq!(outcome.skipped_rows, 0);
        assert_eq!(outcome.disciplines.len(), 1);

        let open = &outcome.disciplines[0];
        assert_eq!(open.discipline, "Open");
        assert_eq!(
            open.entries[0],
            ParsedEntry {
                competitor_name: "Alice".to_string(),
                position: 1,
                points: 1000
            }
        );
        assert_eq!(open.entries[2].competitor_name, "Cara");
        assert_eq!(open.entries[2].points, 800);
    }

    #[test]
    fn bad_rows_are_skipped_and_counted() {
        let outcome = parse_csv("Pos,Rider,Pts\n1,Alice,1000\nDNF,Bob,900\n3,,700\n4,Dan,650\n");
        assert_eq!(outcome.skipped_rows, 2);
        assert_eq!(outcome.disciplines[0].entries.len(), 2);
    }

    #[test]
    fn missing_points_column_falls_back_to_formula() {
        let outcome = parse_csv("Pos,Rider\n1,Alice\n2,Bob\n11,Cara\n");
        let entries = &outcome.disciplines[0].entries;
        assert_eq!(entries[0].points, 1000);
        assert_eq!(entries[1].points, 961);
        // Cara's source rank is 11 but her dense position in this file is 3.
        assert_eq!(entries[2].position, 3);
        assert_eq!(entries[2].points, 943);
    }

    #[test]
    fn discipline_column_groups_rows() {
        let outcome = parse_csv(
            "Pos,Rider,Pts,Category\n1,Alice,1000,Open\n1,Bea,1000,Women's\n2,Bob,900,Open\n",
        );
        assert_eq!(outcome.disciplines.len(), 2);
        assert_eq!(outcome.disciplines[0].discipline, "Open");
        assert_eq!(outcome.disciplines[0].entries.len(), 2);
        assert_eq!(outcome.disciplines[1].discipline, "Women's");
        assert_eq!(outcome.disciplines[1].entries.len(), 1);
    }

    #[test]
    fn wide_format_reads_positions_per_column() {
        let outcome = parse_csv("Pos,Rider,Open,Masters\n1,Alice,1,\n2,Bob,2,1\n3,Cara,,2\n");
        assert_eq!(outcome.disciplines.len(), 2);

        let open = &outcome.disciplines[0];
        assert_eq!(open.discipline, "Open");
        assert_eq!(open.entries.len(), 2);
        assert_eq!(open.entries[0].competitor_name, "Alice");
        assert_eq!(open.entries[0].points, 1000);

        let masters = &outcome.disciplines[1];
        assert_eq!(masters.entries.len(), 2);
        assert_eq!(masters.entries[0].competitor_name, "Bob");
        assert_eq!(masters.entries[0].position, 1);
    }

    #[test]
    fn tied_source_ranks_share_a_dense_position() {
        let outcome = parse_csv("Pos,Rider\n1,Alice\n1,Bea\n3,Cara\n");
        let entries = &outcome.disciplines[0].entries;
        assert_eq!(entries[0].position, 1);
        assert_eq!(entries[1].position, 1);
        assert_eq!(entries[2].position, 2);
    }
}
