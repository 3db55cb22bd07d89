pub mod state;
pub mod store;

pub use state::{StartRequest, WizardState, WizardStep};
pub use store::WizardStore;

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::{self, DbPool};
use crate::domain::{ColumnMapping, ParseOutcome};
use crate::errors::EngineError;
use crate::mapping;
use crate::parser;
use crate::points::PointsSystem;
use crate::services::locks::LeagueLocks;
use crate::services::upload::{self, CommitRequest, CommitSummary};

/// The multi-step upload workflow. Each method is one independent request;
/// all cross-request state lives in the TTL-bounded session store, keyed by
/// an opaque continuation token.
pub struct UploadWizard<'a> {
    pool: &'a DbPool,
    config: &'a AppConfig,
    locks: &'a LeagueLocks,
    store: WizardStore<'a>,
}

/// Outcome of step 1: the token to continue with and the proposed mapping.
#[derive(Debug, Clone)]
pub struct StartedUpload {
    pub token: String,
    pub state: WizardState,
}

impl<'a> UploadWizard<'a> {
    pub fn new(pool: &'a DbPool, config: &'a AppConfig, locks: &'a LeagueLocks) -> Self {
        Self {
            pool,
            config,
            locks,
            store: WizardStore::new(pool, config.wizard.session_ttl_minutes),
        }
    }

    /// Step 1: accept the file and target league, parse the header row, and
    /// propose a mapping. Saved league rules pre-fill the proposal.
    pub fn start(&self, request: StartRequest) -> Result<StartedUpload> {
        let table = parser::read_table(&request.content)?;

        let conn = database::get_connection(self.pool)?;
        database::leagues::get_league_event(&conn, request.league_id, request.event_id)?.ok_or(
            EngineError::EventNotInLeague {
                league_id: request.league_id,
                event_id: request.event_id,
            },
        )?;

        let saved_rules = database::mappings::rules_for_league(&conn, request.league_id)?;
        let proposed_mapping = mapping::suggest(&table.headers, &saved_rules);

        let state = WizardState {
            step: WizardStep::AwaitingMapping,
            league_id: request.league_id,
            event_id: request.event_id,
            result_type: request.result_type,
            is_final: request.is_final,
            uploaded_by: request.uploaded_by,
            file_name: request.file_name,
            content: request.content,
            table,
            proposed_mapping,
            confirmed_mapping: None,
            preview: None,
        };

        let token = Uuid::new_v4().to_string();
        self.store.put(&token, &state)?;

        Ok(StartedUpload { token, state })
    }

    /// Step 2: validate the (possibly edited) mapping and compute a preview.
    /// An invalid mapping fails without advancing the session.
    pub fn submit_mapping(&self, token: &str, mapping: ColumnMapping) -> Result<WizardState> {
        let mut state = self.store.load(token)?;
        state.expect_step(WizardStep::AwaitingMapping)?;

        let validated = mapping::validate(mapping.clone())?;

        let points = PointsSystem::new(self.config.points.overrides.clone());
        let detected = parser::detect(&state.table, &validated);
        let outcome = parser::parse(&state.table, &validated, &detected, &points);

        state.confirmed_mapping = Some(mapping);
        state.preview = Some(outcome);
        state.step = WizardStep::AwaitingConfirmation;
        self.store.put(token, &state)?;

        Ok(state)
    }

    /// Step 3: the explicit confirm action. Re-checks that the session still
    /// exists, commits atomically, and clears the session.
    pub fn confirm(&self, token: &str) -> Result<CommitSummary> {
        let state = self.store.load(token)?;
        state.expect_step(WizardStep::AwaitingConfirmation)?;

        let mapping = state
            .confirmed_mapping
            .as_ref()
            .context("Session is missing its confirmed mapping")?;
        let outcome: &ParseOutcome = state
            .preview
            .as_ref()
            .context("Session is missing its preview")?;

        let summary = upload::commit_upload(
            self.pool,
            self.locks,
            &self.config.wizard,
            &CommitRequest {
                league_id: state.league_id,
                event_id: state.event_id,
                result_type: &state.result_type,
                is_final: state.is_final,
                uploaded_by: state.uploaded_by.as_deref(),
                file_name: &state.file_name,
                content: &state.content,
                mapping,
                outcome,
            },
        )?;

        self.store.delete(token)?;
        Ok(summary)
    }

    /// Step one state backward without discarding already-entered data, so
    /// the prior step can re-display its inputs as defaults. The mapping
    /// step is the earliest reachable one: the file defines the session, so
    /// changing it means cancel and start over.
    pub fn go_back(&self, token: &str) -> Result<WizardState> {
        let mut state = self.store.load(token)?;

        state.step = match state.step {
            WizardStep::AwaitingConfirmation => WizardStep::AwaitingMapping,
            other => {
                return Err(EngineError::WrongWizardStep {
                    state: other.as_str().to_string(),
                }
                .into())
            }
        };

        self.store.put(token, &state)?;
        Ok(state)
    }

    /// Abandon the upload. Deleting an already-gone session is fine.
    pub fn cancel(&self, token: &str) -> Result<()> {
        self.store.delete(token)
    }
}
