//! HTTP interface - axum router, shared state, and error mapping.
//!
//! The handlers stay thin: deserialize, call the core layer, serialize.
//! Status codes are decided here, not in core.

use crate::errors::Error;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower_http::cors::CorsLayer;

/// Category endpoints
pub mod categories;
/// Expense and override endpoints
pub mod expenses;
/// Income endpoints
pub mod incomes;
/// Monthly overview endpoints
pub mod overview;
/// Settings endpoints
pub mod settings;
/// Range statistics endpoints
pub mod statistics;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The live database connection
    pub db: DatabaseConnection,
}

/// Builds the full application router with all `/api` routes mounted.
///
/// CORS is permissive: the API serves a single household on a private
/// network and carries no credentials.
pub fn router(db: DatabaseConnection) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            axum::routing::put(categories::update).delete(categories::remove),
        )
        .route("/incomes", get(incomes::list).post(incomes::create))
        .route(
            "/incomes/{id}",
            axum::routing::put(incomes::update).delete(incomes::remove),
        )
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            axum::routing::put(expenses::update).delete(expenses::remove),
        )
        .route(
            "/expenses/{id}/override/{year_month}",
            axum::routing::post(expenses::create_override).delete(expenses::hide_for_month),
        )
        .route("/overview", get(overview::months))
        .route("/overview/{year_month}", get(overview::for_month))
        .route("/statistics/monthly", get(statistics::monthly))
        .route("/settings", get(settings::list).put(settings::update));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(AppState { db })
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation { .. }
            | Self::InvalidMonth { .. }
            | Self::InvalidRange { .. }
            | Self::InvalidAmount { .. }
            | Self::DuplicateCategory { .. } => StatusCode::BAD_REQUEST,
            Self::ExpenseNotFound { .. }
            | Self::IncomeNotFound { .. }
            | Self::CategoryNotFound { .. } => StatusCode::NOT_FOUND,
            _ => {
                tracing::error!("request failed: {self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
