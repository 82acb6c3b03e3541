//! Locations and item-assignment API endpoints.

use api_types::location::{
    LocationCreated, LocationItemsResponse, LocationNew, LocationUpdate, LocationView,
    LocationsResponse,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, items, server::ServerState};

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<LocationNew>,
) -> Result<(StatusCode, Json<LocationCreated>), ServerError> {
    let id = state.engine.new_location(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(LocationCreated { id })))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(location_id): Path<Uuid>,
    Json(payload): Json<LocationUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .rename_location(location_id, &payload.name)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(location_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_location(location_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<LocationsResponse>, ServerError> {
    let locations = state.engine.list_locations().await?;
    Ok(Json(LocationsResponse {
        locations: locations
            .into_iter()
            .map(|loc| LocationView {
                id: loc.id,
                name: loc.name,
            })
            .collect(),
    }))
}

/// Items assigned to the location, ordered the way the counting screen
/// renders them.
pub async fn list_items(
    State(state): State<ServerState>,
    Path(location_id): Path<Uuid>,
) -> Result<Json<LocationItemsResponse>, ServerError> {
    let assigned = state.engine.items_for_location(location_id).await?;
    Ok(Json(LocationItemsResponse {
        items: assigned.into_iter().map(items::view).collect(),
    }))
}

pub async fn assign(
    State(state): State<ServerState>,
    Path((location_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state.engine.assign_item(location_id, item_id).await?;
    Ok(StatusCode::CREATED)
}

pub async fn unassign(
    State(state): State<ServerState>,
    Path((location_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state.engine.unassign_item(location_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
