//! Monthly overview endpoints.

use crate::{
    api::AppState,
    core::{
        expense, income,
        overview::{self, MonthlyOverview},
        settings,
    },
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
};

/// `GET /api/overview/{year_month}`
///
/// Runs the full monthly pipeline: month-scoped incomes plus the
/// resolved effective expense set feed the aggregator, with the split
/// ratio read from settings.
pub async fn for_month(
    State(state): State<AppState>,
    Path(year_month): Path<i32>,
) -> Result<Json<MonthlyOverview>> {
    let expenses = expense::get_expenses_for_month(&state.db, year_month).await?;
    let incomes = income::get_incomes(&state.db, Some(year_month)).await?;
    let split_ratio = settings::get_transfer_split_ratio(&state.db).await?;

    Ok(Json(overview::calculate_monthly_overview(
        &incomes,
        &expenses,
        year_month,
        split_ratio,
    )))
}

/// `GET /api/overview`
///
/// Lists the distinct months that carry dated expenses, newest first,
/// for the month picker.
pub async fn months(State(state): State<AppState>) -> Result<Json<Vec<i32>>> {
    let months = expense::months_with_expenses(&state.db).await?;
    Ok(Json(months))
}
