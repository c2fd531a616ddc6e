//! Expense endpoints, including the per-month override routes.

use crate::{
    api::AppState,
    core::{expense, resolve},
    entities,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

/// Optional month filter for expense listings.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// When present, the listing is the resolved effective set for this month
    pub year_month: Option<i32>,
}

/// `GET /api/expenses?year_month=`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<entities::expense::Model>>> {
    let expenses = match params.year_month {
        Some(ym) => expense::get_expenses_for_month(&state.db, ym).await?,
        None => expense::get_all_expenses(&state.db).await?,
    };
    Ok(Json(expenses))
}

/// `POST /api/expenses`
pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<expense::NewExpense>,
) -> Result<(StatusCode, Json<entities::expense::Model>)> {
    let created = expense::create_expense(&state.db, data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/expenses/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<expense::ExpensePatch>,
) -> Result<Json<entities::expense::Model>> {
    let updated = expense::update_expense(&state.db, id, patch).await?;
    Ok(Json(updated))
}

/// `DELETE /api/expenses/{id}`
pub async fn remove(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    expense::delete_expense(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/expenses/{id}/override/{year_month}`
///
/// Find-or-create: patches the existing override row for the month, or
/// synthesizes one inheriting unpatched fields from the base.
pub async fn create_override(
    State(state): State<AppState>,
    Path((id, year_month)): Path<(i32, i32)>,
    Json(patch): Json<expense::ExpensePatch>,
) -> Result<(StatusCode, Json<entities::expense::Model>)> {
    let row = resolve::create_expense_override(&state.db, id, year_month, patch).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `DELETE /api/expenses/{id}/override/{year_month}`
///
/// Hides the base expense for that month without touching other months.
pub async fn hide_for_month(
    State(state): State<AppState>,
    Path((id, year_month)): Path<(i32, i32)>,
) -> Result<Json<entities::expense::Model>> {
    let row = resolve::create_deleted_override(&state.db, id, year_month).await?;
    Ok(Json(row))
}
