//! Dashboard route.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use tracing::error;

use crate::{AppState, middleware::AuthUser, routes::app_error_response};
use cofre_shared::AppError;
use cofre_db::DashboardRepository;

/// Creates the dashboard routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// GET `/dashboard` - Aggregate figures: amounts due today and this month,
/// donations received this month, per-account balances.
async fn dashboard(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = DashboardRepository::new((*state.db).clone());

    match repo.summary().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to build dashboard summary");
            app_error_response(&AppError::Internal(e.to_string()))
        }
    }
}
