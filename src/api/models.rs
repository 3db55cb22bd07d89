use serde::{Deserialize, Serialize};

use crate::database::models::LeagueStanding;
use crate::domain::{ColumnMapping, FieldTag, MappedColumn, ParseOutcome};
use crate::wizard::{StartedUpload, WizardState};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
pub struct MappingRequest {
    pub mapping: Vec<MappedColumn>,
}

impl MappingRequest {
    pub fn into_mapping(self) -> ColumnMapping {
        ColumnMapping {
            columns: self.mapping,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartUploadResponse {
    pub token: String,
    pub proposed_mapping: Vec<MappedColumn>,
    pub field_catalog: Vec<&'static str>,
}

impl StartUploadResponse {
    pub fn from_started(started: &StartedUpload) -> Self {
        Self {
            token: started.token.clone(),
            proposed_mapping: started.state.proposed_mapping.columns.clone(),
            field_catalog: FieldTag::ALL.iter().map(FieldTag::as_str).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEntry {
    pub competitor_name: String,
    pub position: u32,
    pub points: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplinePreview {
    pub name: String,
    pub entries: Vec<PreviewEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub token: String,
    pub step: String,
    pub disciplines: Vec<DisciplinePreview>,
    pub skipped_rows: usize,
}

impl PreviewResponse {
    pub fn from_state(token: &str, state: &WizardState) -> Self {
        let outcome = state.preview.as_ref();
        Self {
            token: token.to_string(),
            step: state.step.as_str().to_string(),
            disciplines: outcome.map(disciplines_of).unwrap_or_default(),
            skipped_rows: outcome.map(|o| o.skipped_rows).unwrap_or_default(),
        }
    }
}

fn disciplines_of(outcome: &ParseOutcome) -> Vec<DisciplinePreview> {
    outcome
        .disciplines
        .iter()
        .map(|group| DisciplinePreview {
            name: group.discipline.clone(),
            entries: group
                .entries
                .iter()
                .map(|entry| PreviewEntry {
                    competitor_name: entry.competitor_name.clone(),
                    position: entry.position,
                    points: entry.points,
                })
                .collect(),
        })
        .collect()
}

/// Returned by "go back": the prior step's inputs, usable as form defaults.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardStateResponse {
    pub token: String,
    pub step: String,
    pub league_id: i64,
    pub event_id: i64,
    pub result_type: String,
    pub is_final: bool,
    pub file_name: String,
    pub mapping: Vec<MappedColumn>,
}

impl WizardStateResponse {
    pub fn from_state(token: &str, state: &WizardState) -> Self {
        let mapping = state
            .confirmed_mapping
            .as_ref()
            .unwrap_or(&state.proposed_mapping);
        Self {
            token: token.to_string(),
            step: state.step.as_str().to_string(),
            league_id: state.league_id,
            event_id: state.event_id,
            result_type: state.result_type.clone(),
            is_final: state.is_final,
            file_name: state.file_name.clone(),
            mapping: mapping.columns.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct StandingsParams {
    pub discipline: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingItem {
    pub competitor_name: String,
    pub points: i64,
    pub position: Option<i64>,
    pub events_competed: i64,
    pub average_rank: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsResponse {
    pub league: String,
    pub discipline: String,
    pub items: Vec<StandingItem>,
}

impl StandingItem {
    pub fn from_row(row: &LeagueStanding) -> Self {
        Self {
            competitor_name: row.competitor_name.clone(),
            points: row.points,
            position: row.position,
            events_competed: row.events_competed,
            average_rank: row.average_rank,
        }
    }
}
