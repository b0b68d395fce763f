// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cart endpoints: CRUD, bulk operations, and the checkout lifecycle.
//!
//! Input validation happens here at the boundary; the store only sees
//! well-formed payloads. A rejected request never reaches the database.

use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carthub_core::types::{Cart, CartUpdate, NewCart, ReturnRequest};
use carthub_core::validate;

use crate::error::ApiResult;
use crate::extract::{Json, Path};
use crate::server::GatewayState;

/// Request body for POST /carts/bulk.
#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    /// Cart number prefix, e.g. `CART` yields `CART-001`, `CART-002`, ...
    pub prefix: String,
    /// First sequence number; defaults to 1.
    #[serde(default = "default_bulk_start")]
    pub start: u32,
    /// How many carts to create.
    pub count: u32,
}

fn default_bulk_start() -> u32 {
    1
}

/// Response body for DELETE /carts/bulk.
#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    /// Number of carts removed.
    pub deleted: u64,
}

/// Request body for PUT /carts/{id}/time.
#[derive(Debug, Deserialize)]
pub struct ReturnTimeRequest {
    pub return_by_time: DateTime<Utc>,
}

/// GET /carts
pub async fn list_carts(State(state): State<GatewayState>) -> ApiResult<Json<Vec<Cart>>> {
    Ok(Json(state.store.list_carts().await?))
}

/// POST /carts
pub async fn create_cart(
    State(state): State<GatewayState>,
    Json(body): Json<NewCart>,
) -> ApiResult<(StatusCode, Json<Cart>)> {
    validate::validate_cart_number(&body.cart_number)?;
    validate::validate_battery_level(body.battery_level)?;
    let cart = state.store.create_cart(body).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// PUT /carts/{id}
pub async fn update_cart(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<CartUpdate>,
) -> ApiResult<Json<Cart>> {
    if let Some(number) = &body.cart_number {
        validate::validate_cart_number(number)?;
    }
    if let Some(level) = body.battery_level {
        validate::validate_battery_level(level)?;
    }
    Ok(Json(state.store.update_cart(id, body).await?))
}

/// DELETE /carts/{id}
pub async fn delete_cart(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.delete_cart(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /carts/bulk
pub async fn bulk_create(
    State(state): State<GatewayState>,
    Json(body): Json<BulkCreateRequest>,
) -> ApiResult<(StatusCode, Json<Vec<Cart>>)> {
    validate::validate_bulk_request(&body.prefix, body.start, body.count)?;
    let numbers = validate::bulk_cart_numbers(&body.prefix, body.start, body.count);
    let carts = state.store.bulk_create_carts(numbers).await?;
    Ok((StatusCode::CREATED, Json(carts)))
}

/// DELETE /carts/bulk
pub async fn delete_all(State(state): State<GatewayState>) -> ApiResult<Json<BulkDeleteResponse>> {
    let deleted = state.store.delete_all_carts().await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}

/// POST /carts/{id}/assign/{person_id}
pub async fn assign_person(
    State(state): State<GatewayState>,
    Path((id, person_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Cart>> {
    Ok(Json(state.store.assign_person(id, person_id).await?))
}

/// POST /carts/{id}/unassign/{person_id}
pub async fn unassign_person(
    State(state): State<GatewayState>,
    Path((id, person_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Cart>> {
    Ok(Json(state.store.unassign_person(id, person_id).await?))
}

/// POST /carts/{id}/return
pub async fn return_cart(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<ReturnRequest>,
) -> ApiResult<Json<Cart>> {
    validate::validate_battery_level(body.battery_level)?;
    Ok(Json(state.store.return_cart(id, body).await?))
}

/// PUT /carts/{id}/time
pub async fn update_return_time(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<ReturnTimeRequest>,
) -> ApiResult<Json<Cart>> {
    Ok(Json(
        state.store.update_return_time(id, body.return_by_time).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_request_start_defaults_to_one() {
        let body: BulkCreateRequest =
            serde_json::from_str(r#"{"prefix": "CART", "count": 3}"#).unwrap();
        assert_eq!(body.start, 1);
        assert_eq!(body.count, 3);
    }

    #[test]
    fn return_time_request_parses_rfc3339() {
        let body: ReturnTimeRequest =
            serde_json::from_str(r#"{"return_by_time": "2026-08-29T15:00:00Z"}"#).unwrap();
        assert_eq!(body.return_by_time.to_rfc3339(), "2026-08-29T15:00:00+00:00");
    }
}
