// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage-history ledger endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use carthub_core::history::{HistoryFilter, filter_entries};
use carthub_core::types::{HistoryEntry, HistoryReturn, NewHistoryEntry};
use carthub_core::validate;

use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::server::GatewayState;

/// Query string for GET /cart-history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Restrict to overdue or on-time returns; open entries only appear
    /// in the unfiltered view.
    #[serde(default)]
    pub filter: Option<HistoryFilter>,
}

/// GET /cart-history
pub async fn list_history(
    State(state): State<GatewayState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let entries = state.store.history_all().await?;
    let filter = query.filter.unwrap_or(HistoryFilter::All);
    let filtered = filter_entries(&entries, filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(filtered))
}

/// GET /cart-history/{cart_id}
pub async fn for_cart(
    State(state): State<GatewayState>,
    Path(cart_id): Path<i64>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    Ok(Json(state.store.history_for_cart(cart_id).await?))
}

/// GET /cart-history/person/{person_id}
pub async fn for_person(
    State(state): State<GatewayState>,
    Path(person_id): Path<i64>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    Ok(Json(state.store.history_for_person(person_id).await?))
}

/// POST /cart-history
pub async fn create_entry(
    State(state): State<GatewayState>,
    Json(body): Json<NewHistoryEntry>,
) -> ApiResult<(StatusCode, Json<HistoryEntry>)> {
    validate::validate_battery_level(body.battery_level_start)?;
    validate::validate_return_window(body.checkout_time, body.expected_return_time)?;
    let entry = state.store.create_history_entry(body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /cart-history/{id}/return
pub async fn record_return(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<HistoryReturn>,
) -> ApiResult<Json<HistoryEntry>> {
    validate::validate_battery_level(body.battery_level_end)?;
    Ok(Json(state.store.record_return(id, body).await?))
}
