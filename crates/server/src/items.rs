//! Items API endpoints.

use api_types::item::{ItemCreated, ItemPayload, ItemView, ItemsResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::MoneyCents;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn draft_from(payload: ItemPayload) -> engine::ItemDraft {
    engine::ItemDraft {
        nickname: payload.nickname,
        category: payload.category,
        vendor: payload.vendor,
        purchase_unit: payload.purchase_unit,
        tier1_unit: payload.tier1_unit,
        tier1_factor: payload.tier1_factor,
        tier2_unit: payload.tier2_unit,
        tier2_factor: payload.tier2_factor,
        tier3_unit: payload.tier3_unit,
        tier3_factor: payload.tier3_factor,
        master_unit: payload.master_unit,
        price: payload.price_cents.map(MoneyCents::new),
        last_purchase_cost: payload.last_cost_cents.map(MoneyCents::new),
        par_level: payload.par_level,
    }
}

pub(crate) fn view(item: engine::Item) -> ItemView {
    ItemView {
        id: item.id,
        nickname: item.nickname,
        category: item.category,
        vendor: item.vendor,
        purchase_unit: item.purchase_unit,
        tier1_unit: item.tier1_unit,
        tier1_factor: item.tier1_factor,
        tier2_unit: item.tier2_unit,
        tier2_factor: item.tier2_factor,
        tier3_unit: item.tier3_unit,
        tier3_factor: item.tier3_factor,
        master_unit: item.master_unit,
        price_cents: item.price.map(MoneyCents::cents),
        last_cost_cents: item.last_purchase_cost.map(MoneyCents::cents),
        par_level: item.par_level,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ItemPayload>,
) -> Result<(StatusCode, Json<ItemCreated>), ServerError> {
    let id = state.engine.new_item(draft_from(payload)).await?;
    Ok((StatusCode::CREATED, Json(ItemCreated { id })))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<ItemPayload>,
) -> Result<StatusCode, ServerError> {
    state.engine.update_item(item_id, draft_from(payload)).await?;
    Ok(StatusCode::OK)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_item(item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ItemsResponse>, ServerError> {
    let items = state.engine.list_items().await?;
    Ok(Json(ItemsResponse {
        items: items.into_iter().map(view).collect(),
    }))
}
