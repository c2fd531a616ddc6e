//! Range statistics endpoints.

use crate::{
    api::AppState,
    core::statistics::{self, MonthlyStats},
    errors::Result,
};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

/// Inclusive month range for the trend view.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    /// First month (YYYYMM)
    pub start: i32,
    /// Last month (YYYYMM), inclusive
    pub end: i32,
}

/// `GET /api/statistics/monthly?start=&end=`
pub async fn monthly(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<MonthlyStats>>> {
    let stats = statistics::monthly_statistics(&state.db, params.start, params.end).await?;
    Ok(Json(stats))
}
