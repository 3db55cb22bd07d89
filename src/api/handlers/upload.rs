use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::handlers::{error_response, AppState};
use crate::api::models::{
    MappingRequest, PreviewResponse, StartUploadResponse, WizardStateResponse,
};
use crate::wizard::{StartRequest, UploadWizard};

fn wizard(state: &AppState) -> UploadWizard<'_> {
    UploadWizard::new(&state.pool, &state.config, &state.locks)
}

pub async fn start_upload(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> impl IntoResponse {
    match wizard(&state).start(request) {
        Ok(started) => Json(StartUploadResponse::from_started(&started)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn submit_mapping(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(request): Json<MappingRequest>,
) -> impl IntoResponse {
    match wizard(&state).submit_mapping(&token, request.into_mapping()) {
        Ok(session) => Json(PreviewResponse::from_state(&token, &session)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn confirm_upload(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> impl IntoResponse {
    match wizard(&state).confirm(&token) {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn go_back(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> impl IntoResponse {
    match wizard(&state).go_back(&token) {
        Ok(session) => Json(WizardStateResponse::from_state(&token, &session)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn cancel_upload(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> impl IntoResponse {
    match wizard(&state).cancel(&token) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
