// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Person endpoints.

use axum::extract::State;
use axum::http::StatusCode;

use carthub_core::types::{NewPerson, PersonUpdate, PersonWithCarts};
use carthub_core::validate;

use crate::error::ApiResult;
use crate::extract::{Json, Path};
use crate::server::GatewayState;

/// GET /persons
pub async fn list_persons(
    State(state): State<GatewayState>,
) -> ApiResult<Json<Vec<PersonWithCarts>>> {
    Ok(Json(state.store.list_persons().await?))
}

/// GET /persons/{id}
pub async fn get_person(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PersonWithCarts>> {
    Ok(Json(state.store.get_person(id).await?))
}

/// POST /persons
pub async fn create_person(
    State(state): State<GatewayState>,
    Json(body): Json<NewPerson>,
) -> ApiResult<(StatusCode, Json<PersonWithCarts>)> {
    validate::validate_person(&body.name, body.email.as_deref(), body.phone.as_deref())?;
    let person = state.store.create_person(body).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// PUT /persons/{id}
pub async fn update_person(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<PersonUpdate>,
) -> ApiResult<Json<PersonWithCarts>> {
    // A missing name means "unchanged", so only check the present fields.
    validate::validate_person(
        body.name.as_deref().unwrap_or("unchanged"),
        body.email.as_deref(),
        body.phone.as_deref(),
    )?;
    Ok(Json(state.store.update_person(id, body).await?))
}

/// DELETE /persons/{id}
pub async fn delete_person(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.delete_person(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
