use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic meaning assigned to one column of an uploaded result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldTag {
    Rank,
    Name,
    Points,
    Discipline,
    Event,
    Time,
    Country,
    Ignore,
}

impl FieldTag {
    /// Full catalog of legal tags, exposed so callers can offer manual overrides.
    pub const ALL: [FieldTag; 8] = [
        FieldTag::Rank,
        FieldTag::Name,
        FieldTag::Points,
        FieldTag::Discipline,
        FieldTag::Event,
        FieldTag::Time,
        FieldTag::Country,
        FieldTag::Ignore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldTag::Rank => "RANK",
            FieldTag::Name => "NAME",
            FieldTag::Points => "POINTS",
            FieldTag::Discipline => "DISCIPLINE",
            FieldTag::Event => "EVENT",
            FieldTag::Time => "TIME",
            FieldTag::Country => "COUNTRY",
            FieldTag::Ignore => "IGNORE",
        }
    }

    pub fn parse(s: &str) -> Option<FieldTag> {
        FieldTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One header with the tag assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedColumn {
    pub header: String,
    pub tag: FieldTag,
}

/// Ordered header -> tag assignment for one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub columns: Vec<MappedColumn>,
}

impl ColumnMapping {
    pub fn first_index_of(&self, tag: FieldTag) -> Option<usize> {
        self.columns.iter().position(|c| c.tag == tag)
    }
}

/// Header row plus body rows of an uploaded file, as plain strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cell accessor tolerant of ragged rows.
    pub fn cell<'a>(row: &'a [String], column: usize) -> &'a str {
        row.get(column).map(String::as_str).unwrap_or("")
    }
}

/// How the discipline set of an upload was determined. Selected once per
/// upload and carried explicitly through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisciplinePlan {
    /// A column is tagged DISCIPLINE; each row names its own discipline.
    FromColumn { column: usize },
    /// Wide format: every leftover header is one discipline, its cells holding
    /// per-competitor finishing positions.
    FromHeaderSet { columns: Vec<usize> },
    /// Nothing to go on: the single "Open" discipline.
    DefaultSingle,
}

/// Detector output: the plan plus the ordered, de-duplicated discipline names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedDisciplines {
    pub plan: DisciplinePlan,
    pub names: Vec<String>,
}

/// One normalized ranked row for one discipline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEntry {
    pub competitor_name: String,
    /// Dense 1-based position within the discipline for this file.
    pub position: u32,
    /// Raw points for this file, before any league multiplier.
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisciplineEntries {
    pub discipline: String,
    pub entries: Vec<ParsedEntry>,
}

/// Parser output for a whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub disciplines: Vec<DisciplineEntries>,
    /// Rows dropped because of failed type coercion; ingestion continues.
    pub skipped_rows: usize,
}
