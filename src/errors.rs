use thiserror::Error;

use crate::domain::FieldTag;

/// Typed failures of the ingestion and standings engine. Everything else is
/// propagated as `anyhow::Error` with context.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The mapping lacks a required tag; blocks advancing past the mapping step.
    #[error("column mapping is incomplete: missing {}", format_tags(.missing))]
    MappingIncomplete { missing: Vec<FieldTag> },

    /// Continuation token unknown or past its TTL. The caller must restart
    /// the upload from step 1; not a fatal error.
    #[error("upload session not found or expired; restart the upload from step 1")]
    WizardStateExpired,

    /// The wizard is not in the state this action expects.
    #[error("upload session is in state {state} and cannot accept this action")]
    WrongWizardStep { state: String },

    /// Per-league lock could not be acquired within the retry budget.
    #[error("another upload or rebuild is in progress for league {league_id}; try again")]
    AggregationConflict { league_id: i64 },

    #[error("uploaded file is empty")]
    EmptyFile,

    #[error("uploaded file has no usable header row")]
    NoHeaders,

    #[error("league {league_id} has no linked event {event_id}")]
    EventNotInLeague { league_id: i64, event_id: i64 },

    #[error("no league found for slug '{slug}'")]
    UnknownLeague { slug: String },
}

fn format_tags(tags: &[FieldTag]) -> String {
    tags.iter()
        .map(FieldTag::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
