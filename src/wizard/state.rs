use serde::{Deserialize, Serialize};

use crate::domain::{ColumnMapping, ParseOutcome, RawTable};
use crate::errors::EngineError;

/// Where a wizard session is in the upload workflow. File intake happens
/// inside `start`, before a session exists, so stored sessions begin at the
/// mapping step. The two terminal states never appear in the store either:
/// committed and cancelled sessions are deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    AwaitingMapping,
    AwaitingConfirmation,
    Committed,
    Cancelled,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::AwaitingMapping => "AWAITING_MAPPING",
            WizardStep::AwaitingConfirmation => "AWAITING_CONFIRMATION",
            WizardStep::Committed => "COMMITTED",
            WizardStep::Cancelled => "CANCELLED",
        }
    }
}

/// Everything step 1 needs to open a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub league_id: i64,
    pub event_id: i64,
    pub result_type: String,
    pub is_final: bool,
    pub uploaded_by: Option<String>,
    pub file_name: String,
    pub content: String,
}

/// The explicit cross-request session value object. Persisted as JSON in the
/// session store and passed by value on every wizard call; never ambient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardState {
    pub step: WizardStep,
    pub league_id: i64,
    pub event_id: i64,
    pub result_type: String,
    pub is_final: bool,
    pub uploaded_by: Option<String>,
    pub file_name: String,
    /// Original file content, kept verbatim for the Result's raw data.
    pub content: String,
    pub table: RawTable,
    pub proposed_mapping: ColumnMapping,
    pub confirmed_mapping: Option<ColumnMapping>,
    pub preview: Option<ParseOutcome>,
}

impl WizardState {
    pub fn expect_step(&self, expected: WizardStep) -> Result<(), EngineError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(EngineError::WrongWizardStep {
                state: self.step.as_str().to_string(),
            })
        }
    }
}
