use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::api::models::ErrorResponse;
use crate::config::AppConfig;
use crate::database::DbPool;
use crate::errors::EngineError;
use crate::services::locks::LeagueLocks;

pub mod standings;
pub mod upload;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub locks: LeagueLocks,
}

/// Map engine failures onto the wire. Typed errors carry enough context to
/// resume (missing tags, restart instruction); anything untyped is a 500.
pub fn error_response(err: anyhow::Error) -> Response {
    let status = match err.downcast_ref::<EngineError>() {
        Some(
            EngineError::MappingIncomplete { .. }
            | EngineError::EmptyFile
            | EngineError::NoHeaders,
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(EngineError::WizardStateExpired) => StatusCode::GONE,
        Some(EngineError::WrongWizardStep { .. }) => StatusCode::CONFLICT,
        Some(EngineError::AggregationConflict { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        Some(EngineError::EventNotInLeague { .. } | EngineError::UnknownLeague { .. }) => {
            StatusCode::NOT_FOUND
        }
        None => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        log::error!("Request failed: {err:?}");
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
