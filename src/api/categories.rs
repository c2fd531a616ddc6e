//! Category endpoints.

use crate::{api::AppState, core::category, entities, errors::Result};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// `GET /api/categories`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<entities::category::Model>>> {
    let categories = category::get_all_categories(&state.db).await?;
    Ok(Json(categories))
}

/// `POST /api/categories`
pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<category::NewCategory>,
) -> Result<(StatusCode, Json<entities::category::Model>)> {
    let created = category::create_category(&state.db, data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/categories/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<category::CategoryPatch>,
) -> Result<Json<entities::category::Model>> {
    let updated = category::update_category(&state.db, id, patch).await?;
    Ok(Json(updated))
}

/// `DELETE /api/categories/{id}`
///
/// Referencing expenses survive with their category cleared.
pub async fn remove(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    category::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
