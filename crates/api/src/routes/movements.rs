//! Movement ledger routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    middleware::AuthUser,
    routes::{app_error_response, repo_error_response},
};
use cofre_core::ledger::OriginKind;
use cofre_db::{MovementRepository, repositories::MovementFilter};
use cofre_shared::{AppError, types::PaginationParams};

/// Creates the movement routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/movements", get(list_movements))
}

/// Query parameters for listing movements.
#[derive(Debug, Deserialize)]
pub struct ListMovementsQuery {
    /// Filter by account.
    pub account_id: Option<Uuid>,
    /// Filter by origin kind.
    pub origin_kind: Option<String>,
    /// Occurred on or after this date.
    pub from: Option<NaiveDate>,
    /// Occurred on or before this date.
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
}

fn string_to_origin_kind(s: &str) -> Option<OriginKind> {
    match s.to_lowercase().as_str() {
        "payable" => Some(OriginKind::Payable),
        "receivable" => Some(OriginKind::Receivable),
        "donation" => Some(OriginKind::Donation),
        "adjustment" => Some(OriginKind::Adjustment),
        _ => None,
    }
}

/// GET `/movements` - List ledger movements, newest first.
async fn list_movements(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListMovementsQuery>,
) -> impl IntoResponse {
    let origin_kind = match &query.origin_kind {
        Some(s) => match string_to_origin_kind(s) {
            Some(kind) => Some(kind),
            None => {
                return app_error_response(&AppError::Validation(
                    "Invalid origin kind. Must be one of: payable, receivable, \
                     donation, adjustment"
                        .to_string(),
                ));
            }
        },
        None => None,
    };

    let repo = MovementRepository::new((*state.db).clone());
    let filter = MovementFilter {
        account_id: query.account_id,
        origin_kind,
        from: query.from,
        to: query.to,
    };
    let params = PaginationParams::new(query.page.unwrap_or(1), query.limit.unwrap_or(20));

    match repo.list(filter, params).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}
