use std::collections::HashMap;

use crate::domain::{ColumnMapping, FieldTag, MappedColumn};
use crate::errors::EngineError;

use super::rules;

/// Canonical form used to match headers against saved per-league rules.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Propose a tag for every header. Saved per-league rules take precedence
/// over the keyword heuristics; the result is only a suggestion and must be
/// confirmed (possibly edited) by the uploader before it is validated.
pub fn suggest(headers: &[String], saved_rules: &HashMap<String, FieldTag>) -> ColumnMapping {
    let columns = headers
        .iter()
        .map(|header| {
            let tag = saved_rules
                .get(&normalize_header(header))
                .copied()
                .unwrap_or_else(|| rules::suggest_tag(header));
            MappedColumn {
                header: header.clone(),
                tag,
            }
        })
        .collect();

    ColumnMapping { columns }
}

/// A mapping that passed validation: it has at least one RANK and one NAME
/// column, with their indices resolved up front.
#[derive(Debug, Clone)]
pub struct ValidatedMapping {
    mapping: ColumnMapping,
    rank_column: usize,
    name_column: usize,
}

impl ValidatedMapping {
    pub fn as_mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn rank_column(&self) -> usize {
        self.rank_column
    }

    pub fn name_column(&self) -> usize {
        self.name_column
    }

    pub fn first_index_of(&self, tag: FieldTag) -> Option<usize> {
        self.mapping.first_index_of(tag)
    }
}

/// A mapping is invalid unless it tags at least one header RANK and one NAME.
pub fn validate(mapping: ColumnMapping) -> Result<ValidatedMapping, EngineError> {
    let rank_column = mapping.first_index_of(FieldTag::Rank);
    let name_column = mapping.first_index_of(FieldTag::Name);

    let mut missing = Vec::new();
    if rank_column.is_none() {
        missing.push(FieldTag::Rank);
    }
    if name_column.is_none() {
        missing.push(FieldTag::Name);
    }
    if !missing.is_empty() {
        return Err(EngineError::MappingIncomplete { missing });
    }

    Ok(ValidatedMapping {
        rank_column: rank_column.unwrap_or_default(),
        name_column: name_column.unwrap_or_default(),
        mapping,
    })
}
