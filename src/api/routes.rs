use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    standings::{get_standings, recalculate_league},
    upload::{cancel_upload, confirm_upload, go_back, start_upload, submit_mapping},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/upload", post(start_upload))
        .route("/api/upload/:token/mapping", post(submit_mapping))
        .route("/api/upload/:token/confirm", post(confirm_upload))
        .route("/api/upload/:token/back", post(go_back))
        .route("/api/upload/:token", delete(cancel_upload))
        .route("/api/league/:slug/standings", get(get_standings))
        .route("/api/league/:slug/recalculate", post(recalculate_league))
        .with_state(state)
}
