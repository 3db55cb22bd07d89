use crate::domain::{DetectedDisciplines, DisciplinePlan, FieldTag, RawTable};
use crate::mapping::ValidatedMapping;

pub const DEFAULT_DISCIPLINE: &str = "Open";

/// Determine the set of disciplines represented by an upload.
///
/// A DISCIPLINE-tagged column wins; otherwise every header not mapped to
/// RANK/NAME/POINTS becomes a candidate discipline (wide formats where each
/// discipline is its own column). With no candidates, or no data at all, the
/// set is the single "Open" discipline; the output is never empty.
pub fn detect(table: &RawTable, mapping: &ValidatedMapping) -> DetectedDisciplines {
    if let Some(column) = mapping.first_index_of(FieldTag::Discipline) {
        let names = distinct_column_values(table, column);
        if !names.is_empty() {
            return DetectedDisciplines {
                plan: DisciplinePlan::FromColumn { column },
                names,
            };
        }
    }

    let columns = candidate_columns(mapping);
    if !columns.is_empty() {
        let names = columns
            .iter()
            .map(|&idx| mapping.as_mapping().columns[idx].header.trim().to_string())
            .collect();
        return DetectedDisciplines {
            plan: DisciplinePlan::FromHeaderSet { columns },
            names,
        };
    }

    DetectedDisciplines {
        plan: DisciplinePlan::DefaultSingle,
        names: vec![DEFAULT_DISCIPLINE.to_string()],
    }
}

/// Distinct non-empty trimmed values of one column, in first-seen order.
fn distinct_column_values(table: &RawTable, column: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in &table.rows {
        let value = RawTable::cell(row, column).trim();
        if !value.is_empty() && !names.iter().any(|n| n == value) {
            names.push(value.to_string());
        }
    }
    names
}

/// Headers usable as discipline names: everything not carrying the row-level
/// RANK/NAME/POINTS semantics. Blank headers are never candidates.
fn candidate_columns(mapping: &ValidatedMapping) -> Vec<usize> {
    mapping
        .as_mapping()
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            !matches!(c.tag, FieldTag::Rank | FieldTag::Name | FieldTag::Points)
                && c.tag != FieldTag::Discipline
                && !c.header.trim().is_empty()
        })
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnMapping, MappedColumn};
    use crate::mapping;

    fn validated(columns: Vec<(&str, FieldTag)>) -> ValidatedMapping {
        let mapping = ColumnMapping {
            columns: columns
                .into_iter()
                .map(|(header, tag)| MappedColumn {
                    header: header.to_string(),
                    tag,
                })
                .collect(),
        };
        mapping::validate(mapping).expect("test mapping should validate")
    }

    fn table(rows: Vec<Vec<&str>>) -> RawTable {
        RawTable {
            headers: vec![],
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    #[test]
    fn discipline_column_yields_distinct_values_in_order() {
        let mapping = validated(vec![
            ("Pos", FieldTag::Rank),
            ("Rider", FieldTag::Name),
            ("Category", FieldTag::Discipline),
        ]);
        let table = table(vec![
            vec!["1", "Alice", "Open"],
            vec!["2", "Bob", "Luge"],
            vec!["3", "Cara", " Open "],
            vec!["4", "Dan", ""],
        ]);

        let detected = detect(&table, &mapping);
        assert_eq!(detected.plan, DisciplinePlan::FromColumn { column: 2 });
        assert_eq!(detected.names, vec!["Open", "Luge"]);
    }

    #[test]
    fn leftover_headers_become_disciplines() {
        let mapping = validated(vec![
            ("Pos", FieldTag::Rank),
            ("Rider", FieldTag::Name),
            ("Open", FieldTag::Ignore),
            ("Women's", FieldTag::Ignore),
        ]);
        let detected = detect(&table(vec![vec!["1", "Alice", "1", ""]]), &mapping);
        assert_eq!(
            detected.plan,
            DisciplinePlan::FromHeaderSet {
                columns: vec![2, 3]
            }
        );
        assert_eq!(detected.names, vec!["Open", "Women's"]);
    }

    #[test]
    fn bare_mapping_defaults_to_open() {
        let mapping = validated(vec![("Pos", FieldTag::Rank), ("Rider", FieldTag::Name)]);
        let detected = detect(&table(vec![vec!["1", "Alice"]]), &mapping);
        assert_eq!(detected.plan, DisciplinePlan::DefaultSingle);
        assert_eq!(detected.names, vec![DEFAULT_DISCIPLINE]);
    }

    #[test]
    fn empty_input_still_yields_open() {
        let mapping = validated(vec![
            ("Pos", FieldTag::Rank),
            ("Rider", FieldTag::Name),
            ("Category", FieldTag::Discipline),
        ]);
        let detected = detect(&table(vec![]), &mapping);
        assert_eq!(detected.plan, DisciplinePlan::DefaultSingle);
        assert_eq!(detected.names, vec![DEFAULT_DISCIPLINE]);
    }
}
