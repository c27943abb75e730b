//! Account management routes.

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
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    AppState,
    middleware::AuthUser,
    routes::{app_error_response, repo_error_response},
};
use cofre_db::{
    AccountRepository, MovementRepository,
    entities::sea_orm_active_enums::AccountKind,
    repositories::{CreateAccountInput, MovementFilter, UpdateAccountInput},
};
use cofre_shared::{AppError, types::PaginationParams};

/// Creates the account routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/{id}/adjust-balance", post(adjust_balance))
        .route("/accounts/{id}/movements", get(account_movements))
        .route("/accounts/reset-balances", post(reset_balances))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account name.
    pub name: String,
    /// Account kind: cash or bank.
    pub kind: String,
    /// Opening balance (defaults to zero).
    pub initial_balance: Option<Decimal>,
    /// Date the balance was established.
    pub opened_on: Option<NaiveDate>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// Account name.
    pub name: Option<String>,
    /// Account kind: cash or bank.
    pub kind: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Request body for a manual balance adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustBalanceRequest {
    /// Signed amount: positive deposits, negative withdraws.
    pub amount: Decimal,
    /// Free-text note used as the movement description.
    pub note: Option<String>,
}

/// Query parameters for an account's movement listing.
#[derive(Debug, Deserialize)]
pub struct AccountMovementsQuery {
    /// Occurred on or after this date.
    pub from: Option<NaiveDate>,
    /// Occurred on or before this date.
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
}

fn string_to_account_kind(s: &str) -> Option<AccountKind> {
    match s.to_lowercase().as_str() {
        "cash" => Some(AccountKind::Cash),
        "bank" => Some(AccountKind::Bank),
        _ => None,
    }
}

/// GET `/accounts` - List accounts with balances.
async fn list_accounts(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(accounts) => (StatusCode::OK, Json(accounts)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let Some(kind) = string_to_account_kind(&payload.kind) else {
        return app_error_response(&AppError::Validation(
            "Invalid account kind. Must be one of: cash, bank".to_string(),
        ));
    };

    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        name: payload.name,
        kind,
        initial_balance: payload.initial_balance.unwrap_or(Decimal::ZERO),
        opened_on: payload.opened_on,
        note: payload.note,
    };

    match repo.create(input).await {
        Ok(account) => {
            info!(account_id = %account.id, name = %account.name, "Account created");
            (StatusCode::CREATED, Json(account)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// GET `/accounts/{id}` - Get account detail.
async fn get_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

/// PUT `/accounts/{id}` - Update account descriptive fields.
async fn update_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    let kind = match &payload.kind {
        Some(s) => match string_to_account_kind(s) {
            Some(kind) => Some(kind),
            None => {
                return app_error_response(&AppError::Validation(
                    "Invalid account kind. Must be one of: cash, bank".to_string(),
                ));
            }
        },
        None => None,
    };

    let repo = AccountRepository::new((*state.db).clone());
    let input = UpdateAccountInput {
        name: payload.name,
        kind,
        note: payload.note.map(Some),
    };

    match repo.update(id, input).await {
        Ok(account) => {
            info!(account_id = %id, "Account updated");
            (StatusCode::OK, Json(account)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// DELETE `/accounts/{id}` - Delete an account with no movements.
async fn delete_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(account_id = %id, "Account deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// POST `/accounts/{id}/adjust-balance` - Manual deposit or withdrawal.
async fn adjust_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustBalanceRequest>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo
        .adjust_balance(id, payload.amount, payload.note, auth.user_id())
        .await
    {
        Ok((account, movement)) => {
            info!(
                account_id = %id,
                movement_id = %movement.id,
                amount = %payload.amount,
                "Balance adjusted"
            );
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "account": account,
                    "movement": movement
                })),
            )
                .into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// GET `/accounts/{id}/movements` - The account's slice of the ledger.
async fn account_movements(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AccountMovementsQuery>,
) -> impl IntoResponse {
    // 404 for unknown accounts rather than an empty page.
    let account_repo = AccountRepository::new((*state.db).clone());
    if let Err(e) = account_repo.find_by_id(id).await {
        return repo_error_response!(e);
    }

    let repo = MovementRepository::new((*state.db).clone());
    let filter = MovementFilter {
        account_id: Some(id),
        origin_kind: None,
        from: query.from,
        to: query.to,
    };
    let params = PaginationParams::new(query.page.unwrap_or(1), query.limit.unwrap_or(20));

    match repo.list(filter, params).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

/// POST `/accounts/reset-balances` - Destructive reset: removes every
/// movement and zeroes all balances. Reports counts so the caller can
/// confirm the scope of what was destroyed.
async fn reset_balances(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());

    match repo.reset_all().await {
        Ok(summary) => {
            warn!(
                acting_user = %auth.user_id(),
                accounts_updated = summary.accounts_updated,
                movements_removed = summary.movements_removed,
                "All balances reset"
            );
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "message": "All balances reset to zero",
                    "accounts_updated": summary.accounts_updated,
                    "movements_removed": summary.movements_removed
                })),
            )
                .into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}
