//! Settings endpoints.

use crate::{api::AppState, core::settings, errors::Result};
use axum::{Json, extract::State};
use std::collections::BTreeMap;

/// `GET /api/settings`
pub async fn list(State(state): State<AppState>) -> Result<Json<BTreeMap<String, String>>> {
    let settings = settings::get_settings(&state.db).await?;
    Ok(Json(settings))
}

/// `PUT /api/settings`
///
/// Upserts the given key/value pairs and returns the full settings map.
pub async fn update(
    State(state): State<AppState>,
    Json(values): Json<BTreeMap<String, String>>,
) -> Result<Json<BTreeMap<String, String>>> {
    let settings = settings::update_settings(&state.db, values).await?;
    Ok(Json(settings))
}
