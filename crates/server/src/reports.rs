//! Usage report endpoint.

use api_types::report::{UsageQuery, UsageReportResponse, UsageRowView};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

use crate::{ServerError, server::ServerState};

pub async fn usage(
    State(state): State<ServerState>,
    Query(query): Query<UsageQuery>,
) -> Result<Json<UsageReportResponse>, ServerError> {
    let report = state
        .engine
        .usage_report(
            query.start.with_timezone(&Utc),
            query.end.with_timezone(&Utc),
        )
        .await?;

    Ok(Json(UsageReportResponse {
        earlier_session_id: report.earlier_session_id,
        later_session_id: report.later_session_id,
        rows: report
            .rows
            .into_iter()
            .map(|row| UsageRowView {
                item_id: row.item_id,
                nickname: row.nickname,
                used: row.used,
                usage_cost_cents: row.cost.cents(),
            })
            .collect(),
    }))
}
