//! Payable and receivable routes.
//!
//! Both kinds share one handler family; the route prefix fixes the kind so
//! `/payables` can never touch a receivable and vice versa.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    middleware::AuthUser,
    routes::{app_error_response, error_response, repo_error_response},
};
use cofre_db::{
    ObligationRepository,
    entities::sea_orm_active_enums::{ObligationKind, ObligationStatus},
    repositories::{CreateObligationInput, ObligationError, ObligationFilter, UpdateObligationInput},
};
use cofre_shared::{AppError, types::PaginationParams};

/// Creates the obligation routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payables", get(list_payables).post(create_payable))
        .route(
            "/payables/{id}",
            get(get_payable).put(update_payable).delete(delete_payable),
        )
        .route("/payables/{id}/settle", post(settle_payable))
        .route("/payables/{id}/reopen", post(reopen_payable))
        .route("/receivables", get(list_receivables).post(create_receivable))
        .route(
            "/receivables/{id}",
            get(get_receivable)
                .put(update_receivable)
                .delete(delete_receivable),
        )
        .route("/receivables/{id}/settle", post(settle_receivable))
        .route("/receivables/{id}/reopen", post(reopen_receivable))
}

/// Request body for creating an obligation.
#[derive(Debug, Deserialize)]
pub struct CreateObligationRequest {
    /// Counterparty on the other side.
    pub counterparty_id: Uuid,
    /// Payables only.
    pub beneficiary_id: Option<Uuid>,
    /// Initial status: pending or settled (defaults to pending).
    pub status: Option<String>,
    /// Category label.
    pub category: String,
    /// Account the settlement affects.
    pub account_id: Uuid,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Due date.
    pub due_on: NaiveDate,
    /// Settlement date when created settled.
    pub settled_on: Option<NaiveDate>,
    /// Positive amount.
    pub amount: Decimal,
    /// Payables only.
    pub payment_method: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
    /// Whether to expand into monthly installments.
    pub recurring: Option<bool>,
    /// Number of installments when recurring.
    pub installment_count: Option<u32>,
}

/// Request body for updating an obligation.
#[derive(Debug, Deserialize)]
pub struct UpdateObligationRequest {
    /// Counterparty on the other side.
    pub counterparty_id: Option<Uuid>,
    /// Payables only.
    pub beneficiary_id: Option<Uuid>,
    /// New status: pending or settled.
    pub status: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Account the settlement affects.
    pub account_id: Option<Uuid>,
    /// Issue date.
    pub issued_on: Option<NaiveDate>,
    /// Due date.
    pub due_on: Option<NaiveDate>,
    /// Settlement date.
    pub settled_on: Option<NaiveDate>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Payables only.
    pub payment_method: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Request body for settling an obligation.
#[derive(Debug, Default, Deserialize)]
pub struct SettleRequest {
    /// Settlement date (defaults to today).
    pub settled_on: Option<NaiveDate>,
}

/// Query parameters for listing obligations.
#[derive(Debug, Deserialize)]
pub struct ListObligationsQuery {
    /// Filter by status: pending or settled.
    pub status: Option<String>,
    /// Due on or after this date.
    pub due_from: Option<NaiveDate>,
    /// Due on or before this date.
    pub due_to: Option<NaiveDate>,
    /// All installments of one recurring series.
    pub recurrence_group_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
}

fn string_to_status(s: &str) -> Option<ObligationStatus> {
    match s.to_lowercase().as_str() {
        "pending" => Some(ObligationStatus::Pending),
        "settled" => Some(ObligationStatus::Settled),
        _ => None,
    }
}

fn invalid_status_response() -> axum::response::Response {
    app_error_response(&AppError::Validation(
        "Invalid status. Must be one of: pending, settled".to_string(),
    ))
}

async fn list(
    state: AppState,
    kind: ObligationKind,
    query: ListObligationsQuery,
) -> axum::response::Response {
    let status = match &query.status {
        Some(s) => match string_to_status(s) {
            Some(status) => Some(status),
            None => return invalid_status_response(),
        },
        None => None,
    };

    let repo = ObligationRepository::new((*state.db).clone());
    let filter = ObligationFilter {
        kind: Some(kind),
        status,
        due_from: query.due_from,
        due_to: query.due_to,
        recurrence_group_id: query.recurrence_group_id,
    };
    let params = PaginationParams::new(query.page.unwrap_or(1), query.limit.unwrap_or(20));

    match repo.list(filter, params).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

async fn create(
    state: AppState,
    auth: &AuthUser,
    kind: ObligationKind,
    payload: CreateObligationRequest,
) -> axum::response::Response {
    let status = match payload.status.as_deref() {
        Some(s) => match string_to_status(s) {
            Some(status) => status,
            None => return invalid_status_response(),
        },
        None => ObligationStatus::Pending,
    };

    let repo = ObligationRepository::new((*state.db).clone());
    let input = CreateObligationInput {
        kind,
        counterparty_id: payload.counterparty_id,
        beneficiary_id: payload.beneficiary_id,
        status,
        category: payload.category,
        account_id: payload.account_id,
        issued_on: payload.issued_on,
        due_on: payload.due_on,
        settled_on: payload.settled_on,
        amount: payload.amount,
        payment_method: payload.payment_method,
        note: payload.note,
        recurring: payload.recurring.unwrap_or(false),
        installment_count: payload.installment_count,
    };

    match repo.create(input, auth.user_id()).await {
        Ok(obligation) => {
            info!(
                obligation_id = %obligation.id,
                kind = ?kind,
                amount = %obligation.amount,
                "Obligation created"
            );
            (StatusCode::CREATED, Json(obligation)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

async fn get_one(state: AppState, kind: ObligationKind, id: Uuid) -> axum::response::Response {
    let repo = ObligationRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(obligation) if obligation.kind == kind => {
            (StatusCode::OK, Json(obligation)).into_response()
        }
        Ok(_) => {
            let e = ObligationError::NotFound(id);
            error_response(e.http_status_code(), e.error_code(), e.to_string())
        }
        Err(e) => repo_error_response!(e),
    }
}

async fn update(
    state: AppState,
    auth: &AuthUser,
    kind: ObligationKind,
    id: Uuid,
    payload: UpdateObligationRequest,
) -> axum::response::Response {
    let status = match payload.status.as_deref() {
        Some(s) => match string_to_status(s) {
            Some(status) => Some(status),
            None => return invalid_status_response(),
        },
        None => None,
    };

    if let Err(response) = ensure_kind(&state, kind, id).await {
        return response;
    }

    let repo = ObligationRepository::new((*state.db).clone());
    let input = UpdateObligationInput {
        counterparty_id: payload.counterparty_id,
        beneficiary_id: payload.beneficiary_id.map(Some),
        status,
        category: payload.category,
        account_id: payload.account_id,
        issued_on: payload.issued_on,
        due_on: payload.due_on,
        settled_on: payload.settled_on.map(Some),
        amount: payload.amount,
        payment_method: payload.payment_method.map(Some),
        note: payload.note.map(Some),
    };

    match repo.update(id, input, auth.user_id()).await {
        Ok(obligation) => {
            info!(obligation_id = %id, "Obligation updated");
            (StatusCode::OK, Json(obligation)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

async fn settle(
    state: AppState,
    auth: &AuthUser,
    kind: ObligationKind,
    id: Uuid,
    payload: SettleRequest,
) -> axum::response::Response {
    if let Err(response) = ensure_kind(&state, kind, id).await {
        return response;
    }

    let repo = ObligationRepository::new((*state.db).clone());
    match repo.settle(id, payload.settled_on, auth.user_id()).await {
        Ok(obligation) => {
            info!(obligation_id = %id, "Obligation settled");
            (StatusCode::OK, Json(obligation)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

async fn reopen(state: AppState, kind: ObligationKind, id: Uuid) -> axum::response::Response {
    if let Err(response) = ensure_kind(&state, kind, id).await {
        return response;
    }

    let repo = ObligationRepository::new((*state.db).clone());
    match repo.revert_to_pending(id).await {
        Ok(obligation) => {
            info!(obligation_id = %id, "Obligation reopened");
            (StatusCode::OK, Json(obligation)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

async fn delete(state: AppState, kind: ObligationKind, id: Uuid) -> axum::response::Response {
    if let Err(response) = ensure_kind(&state, kind, id).await {
        return response;
    }

    let repo = ObligationRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => {
            info!(obligation_id = %id, "Obligation deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// Rejects ids that exist under the other kind's prefix with a 404.
async fn ensure_kind(
    state: &AppState,
    kind: ObligationKind,
    id: Uuid,
) -> Result<(), axum::response::Response> {
    let repo = ObligationRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(obligation) if obligation.kind == kind => Ok(()),
        Ok(_) => {
            let e = ObligationError::NotFound(id);
            Err(error_response(
                e.http_status_code(),
                e.error_code(),
                e.to_string(),
            ))
        }
        Err(e) => Err(repo_error_response!(e)),
    }
}

// Thin kind-fixing wrappers.

/// GET `/payables` - List payables.
async fn list_payables(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListObligationsQuery>,
) -> impl IntoResponse {
    list(state, ObligationKind::Payable, query).await
}

/// POST `/payables` - Create a payable.
async fn create_payable(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateObligationRequest>,
) -> impl IntoResponse {
    create(state, &auth, ObligationKind::Payable, payload).await
}

/// GET `/payables/{id}` - Get a payable.
async fn get_payable(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    get_one(state, ObligationKind::Payable, id).await
}

/// PUT `/payables/{id}` - Update a payable.
async fn update_payable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateObligationRequest>,
) -> impl IntoResponse {
    update(state, &auth, ObligationKind::Payable, id, payload).await
}

/// POST `/payables/{id}/settle` - Settle a payable.
async fn settle_payable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<SettleRequest>>,
) -> impl IntoResponse {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    settle(state, &auth, ObligationKind::Payable, id, payload).await
}

/// POST `/payables/{id}/reopen` - Reopen a payable.
async fn reopen_payable(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    reopen(state, ObligationKind::Payable, id).await
}

/// DELETE `/payables/{id}` - Delete a payable.
async fn delete_payable(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    delete(state, ObligationKind::Payable, id).await
}

/// GET `/receivables` - List receivables.
async fn list_receivables(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListObligationsQuery>,
) -> impl IntoResponse {
    list(state, ObligationKind::Receivable, query).await
}

/// POST `/receivables` - Create a receivable.
async fn create_receivable(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateObligationRequest>,
) -> impl IntoResponse {
    create(state, &auth, ObligationKind::Receivable, payload).await
}

/// GET `/receivables/{id}` - Get a receivable.
async fn get_receivable(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    get_one(state, ObligationKind::Receivable, id).await
}

/// PUT `/receivables/{id}` - Update a receivable.
async fn update_receivable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateObligationRequest>,
) -> impl IntoResponse {
    update(state, &auth, ObligationKind::Receivable, id, payload).await
}

/// POST `/receivables/{id}/settle` - Settle a receivable.
async fn settle_receivable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<SettleRequest>>,
) -> impl IntoResponse {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    settle(state, &auth, ObligationKind::Receivable, id, payload).await
}

/// POST `/receivables/{id}/reopen` - Reopen a receivable.
async fn reopen_receivable(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    reopen(state, ObligationKind::Receivable, id).await
}

/// DELETE `/receivables/{id}` - Delete a receivable.
async fn delete_receivable(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    delete(state, ObligationKind::Receivable, id).await
}
