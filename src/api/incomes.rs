//! Income endpoints.

use crate::{api::AppState, core::income, entities, errors::Result};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

/// Optional month filter for income listings.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// When present, only incomes scoped to this month are returned
    pub year_month: Option<i32>,
}

/// `GET /api/incomes?year_month=`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<entities::income::Model>>> {
    let incomes = income::get_incomes(&state.db, params.year_month).await?;
    Ok(Json(incomes))
}

/// `POST /api/incomes`
pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<income::NewIncome>,
) -> Result<(StatusCode, Json<entities::income::Model>)> {
    let created = income::create_income(&state.db, data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/incomes/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<income::IncomePatch>,
) -> Result<Json<entities::income::Model>> {
    let updated = income::update_income(&state.db, id, patch).await?;
    Ok(Json(updated))
}

/// `DELETE /api/incomes/{id}`
pub async fn remove(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    income::delete_income(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
