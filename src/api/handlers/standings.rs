use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::handlers::{error_response, AppState};
use crate::api::models::{StandingItem, StandingsParams, StandingsResponse};
use crate::database::{self, models::League};
use crate::errors::EngineError;
use crate::parser::DEFAULT_DISCIPLINE;
use crate::standings;

fn league_by_slug(conn: &rusqlite::Connection, slug: &str) -> anyhow::Result<League> {
    database::leagues::find_by_slug(conn, slug)?
        .ok_or_else(|| {
            EngineError::UnknownLeague {
                slug: slug.to_string(),
            }
            .into()
        })
}

pub async fn get_standings(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<StandingsParams>,
) -> impl IntoResponse {
    let result = (|| {
        let conn = database::get_connection(&state.pool)?;
        let league = league_by_slug(&conn, &slug)?;
        let discipline = params
            .discipline
            .unwrap_or_else(|| DEFAULT_DISCIPLINE.to_string());
        let rows = standings::get_standings(&conn, league.id, &discipline)?;

        anyhow::Ok(StandingsResponse {
            league: league.slug,
            discipline,
            items: rows.iter().map(StandingItem::from_row).collect(),
        })
    })();

    match result {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn recalculate_league(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let result = (|| {
        let league = {
            let conn = database::get_connection(&state.pool)?;
            league_by_slug(&conn, &slug)?
        };
        standings::rebuild(&state.pool, &state.locks, &state.config, league.id)
    })();

    match result {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => error_response(e),
    }
}
