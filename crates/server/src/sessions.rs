//! Session lifecycle and review API endpoints.

use api_types::count::{LocationReview, ReviewResponse, ReviewRow};
use api_types::session::{
    CurrentSessionResponse, SessionStart, SessionStatus as ApiStatus, SessionView,
    SessionsResponse,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_status(status: engine::SessionStatus) -> ApiStatus {
    match status {
        engine::SessionStatus::InProgress => ApiStatus::InProgress,
        engine::SessionStatus::Finalized => ApiStatus::Finalized,
    }
}

pub(crate) fn view(session: engine::Session) -> SessionView {
    SessionView {
        id: session.id,
        count_type: session.count_type,
        status: map_status(session.status),
        started_at: session.started_at.fixed_offset(),
        ended_at: session.ended_at.map(|dt| dt.fixed_offset()),
    }
}

pub async fn start(
    State(state): State<ServerState>,
    Json(payload): Json<SessionStart>,
) -> Result<(StatusCode, Json<SessionView>), ServerError> {
    let session = state.engine.start_session(&payload.count_type).await?;
    Ok((StatusCode::CREATED, Json(view(session))))
}

pub async fn current(
    State(state): State<ServerState>,
) -> Result<Json<CurrentSessionResponse>, ServerError> {
    let session = state.engine.current_session().await?;
    Ok(Json(CurrentSessionResponse {
        session: session.map(view),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state.engine.session(session_id).await?;
    Ok(Json(view(session)))
}

/// Finalized sessions, newest first (the history dropdown).
pub async fn list_finalized(
    State(state): State<ServerState>,
) -> Result<Json<SessionsResponse>, ServerError> {
    let sessions = state.engine.list_finalized_sessions().await?;
    Ok(Json(SessionsResponse {
        sessions: sessions.into_iter().map(view).collect(),
    }))
}

pub async fn finalize(
    State(state): State<ServerState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state.engine.finalize_session(session_id).await?;
    Ok(Json(view(session)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_session(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The review screen: every saved record of the session grouped per
/// location, with names resolved for display.
pub async fn review(
    State(state): State<ServerState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, ServerError> {
    let session = state.engine.session(session_id).await?;
    let records = state.engine.session_counts(session_id).await?;

    let location_names: HashMap<Uuid, String> = state
        .engine
        .list_locations()
        .await?
        .into_iter()
        .map(|loc| (loc.id, loc.name))
        .collect();
    let nicknames: HashMap<Uuid, String> = state
        .engine
        .list_items()
        .await?
        .into_iter()
        .map(|item| (item.id, item.nickname))
        .collect();

    // Records arrive ordered by location then item, so grouping is a single
    // linear pass.
    let mut locations: Vec<LocationReview> = Vec::new();
    for record in records {
        let row = ReviewRow {
            item_id: record.item_id,
            nickname: nicknames
                .get(&record.item_id)
                .cloned()
                .unwrap_or_else(|| record.item_id.to_string()),
            total: record.total,
            value_cents: record.value.cents(),
        };

        match locations.last_mut() {
            Some(group) if group.location_id == record.location_id => group.rows.push(row),
            _ => locations.push(LocationReview {
                location_id: record.location_id,
                location_name: location_names
                    .get(&record.location_id)
                    .cloned()
                    .unwrap_or_else(|| record.location_id.to_string()),
                rows: vec![row],
            }),
        }
    }

    Ok(Json(ReviewResponse {
        session: view(session),
        locations,
    }))
}
