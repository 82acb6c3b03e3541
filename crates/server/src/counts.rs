//! Count save/read endpoints for one location of a session.

use api_types::count::{CompletionResponse, CountRowView, CountsResponse, CountsSave};
use axum::{
    Json,
    extract::{Path, State},
};
use engine::{CountEntry, TierCounts, ValuedCount};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn row_view(record: ValuedCount) -> CountRowView {
    let [t1, t2, t3] = record.counts.as_array();
    CountRowView {
        item_id: record.item_id,
        total: record.total,
        value_cents: record.value.cents(),
        t1,
        t2,
        t3,
        counted_at: record.counted_at.fixed_offset(),
    }
}

/// Replaces the saved set for this (session, location) with the submitted
/// entries; zero-total entries are dropped. Responds with what was persisted
/// so the client can re-render totals from the authoritative values.
pub async fn save(
    State(state): State<ServerState>,
    Path((session_id, location_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CountsSave>,
) -> Result<Json<CountsResponse>, ServerError> {
    let entries: Vec<CountEntry> = payload
        .entries
        .iter()
        .map(|entry| CountEntry {
            item_id: entry.item_id,
            counts: TierCounts::new(entry.t1, entry.t2, entry.t3),
        })
        .collect();

    let records = state
        .engine
        .save_location_counts(session_id, location_id, &entries)
        .await?;
    Ok(Json(CountsResponse {
        counts: records.into_iter().map(row_view).collect(),
    }))
}

pub async fn read(
    State(state): State<ServerState>,
    Path((session_id, location_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CountsResponse>, ServerError> {
    let records = state
        .engine
        .location_counts(session_id, location_id)
        .await?;
    Ok(Json(CountsResponse {
        counts: records.into_iter().map(row_view).collect(),
    }))
}

pub async fn completion(
    State(state): State<ServerState>,
    Path((session_id, location_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CompletionResponse>, ServerError> {
    let percent = state
        .engine
        .location_completion(session_id, location_id)
        .await?;
    Ok(Json(CompletionResponse { percent }))
}
