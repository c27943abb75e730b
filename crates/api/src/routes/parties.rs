//! Counterparty and beneficiary routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    middleware::AuthUser,
    routes::{app_error_response, repo_error_response},
};
use cofre_db::{
    BeneficiaryRepository, CounterpartyRepository,
    entities::sea_orm_active_enums::CounterpartyKind,
    repositories::{BeneficiaryInput, CounterpartyInput},
};
use cofre_shared::{AppError, types::PaginationParams};

/// Creates the party routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/counterparties",
            get(list_counterparties).post(create_counterparty),
        )
        .route(
            "/counterparties/{id}",
            get(get_counterparty)
                .put(update_counterparty)
                .delete(delete_counterparty),
        )
        .route(
            "/beneficiaries",
            get(list_beneficiaries).post(create_beneficiary),
        )
        .route(
            "/beneficiaries/{id}",
            get(get_beneficiary)
                .put(update_beneficiary)
                .delete(delete_beneficiary),
        )
}

/// Request body for creating or replacing a counterparty.
#[derive(Debug, Deserialize)]
pub struct CounterpartyRequest {
    /// Counterparty kind: supplier or donor.
    pub kind: String,
    /// Display name.
    pub name: String,
    /// National tax id.
    pub tax_id: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Request body for creating or replacing a beneficiary.
#[derive(Debug, Deserialize)]
pub struct BeneficiaryRequest {
    /// Display name.
    pub name: String,
    /// National tax id.
    pub tax_id: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Responsible guardian, for minors.
    pub guardian_name: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
}

impl PageQuery {
    fn params(&self) -> PaginationParams {
        PaginationParams::new(self.page.unwrap_or(1), self.limit.unwrap_or(20))
    }
}

fn string_to_counterparty_kind(s: &str) -> Option<CounterpartyKind> {
    match s.to_lowercase().as_str() {
        "supplier" => Some(CounterpartyKind::Supplier),
        "donor" => Some(CounterpartyKind::Donor),
        _ => None,
    }
}

fn counterparty_input(payload: CounterpartyRequest) -> Result<CounterpartyInput, axum::response::Response> {
    let Some(kind) = string_to_counterparty_kind(&payload.kind) else {
        return Err(app_error_response(&AppError::Validation(
            "Invalid counterparty kind. Must be one of: supplier, donor".to_string(),
        )));
    };
    Ok(CounterpartyInput {
        kind,
        name: payload.name,
        tax_id: payload.tax_id,
        phone: payload.phone,
        note: payload.note,
    })
}

/// GET `/counterparties` - List counterparties.
async fn list_counterparties(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let repo = CounterpartyRepository::new((*state.db).clone());

    match repo.list(query.params()).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

/// POST `/counterparties` - Create a counterparty.
async fn create_counterparty(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CounterpartyRequest>,
) -> impl IntoResponse {
    let input = match counterparty_input(payload) {
        Ok(input) => input,
        Err(response) => return response,
    };

    let repo = CounterpartyRepository::new((*state.db).clone());
    match repo.create(input).await {
        Ok(counterparty) => {
            info!(counterparty_id = %counterparty.id, "Counterparty created");
            (StatusCode::CREATED, Json(counterparty)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// GET `/counterparties/{id}` - Get a counterparty.
async fn get_counterparty(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CounterpartyRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(counterparty) => (StatusCode::OK, Json(counterparty)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

/// PUT `/counterparties/{id}` - Replace a counterparty's fields.
async fn update_counterparty(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CounterpartyRequest>,
) -> impl IntoResponse {
    let input = match counterparty_input(payload) {
        Ok(input) => input,
        Err(response) => return response,
    };

    let repo = CounterpartyRepository::new((*state.db).clone());
    match repo.update(id, input).await {
        Ok(counterparty) => {
            info!(counterparty_id = %id, "Counterparty updated");
            (StatusCode::OK, Json(counterparty)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// DELETE `/counterparties/{id}` - Delete a counterparty.
async fn delete_counterparty(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CounterpartyRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(counterparty_id = %id, "Counterparty deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// GET `/beneficiaries` - List beneficiaries.
async fn list_beneficiaries(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let repo = BeneficiaryRepository::new((*state.db).clone());

    match repo.list(query.params()).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

/// POST `/beneficiaries` - Create a beneficiary.
async fn create_beneficiary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<BeneficiaryRequest>,
) -> impl IntoResponse {
    let repo = BeneficiaryRepository::new((*state.db).clone());
    let input = BeneficiaryInput {
        name: payload.name,
        tax_id: payload.tax_id,
        phone: payload.phone,
        guardian_name: payload.guardian_name,
        note: payload.note,
    };

    match repo.create(input).await {
        Ok(beneficiary) => {
            info!(beneficiary_id = %beneficiary.id, "Beneficiary created");
            (StatusCode::CREATED, Json(beneficiary)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// GET `/beneficiaries/{id}` - Get a beneficiary.
async fn get_beneficiary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BeneficiaryRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(beneficiary) => (StatusCode::OK, Json(beneficiary)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

/// PUT `/beneficiaries/{id}` - Replace a beneficiary's fields.
async fn update_beneficiary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BeneficiaryRequest>,
) -> impl IntoResponse {
    let repo = BeneficiaryRepository::new((*state.db).clone());
    let input = BeneficiaryInput {
        name: payload.name,
        tax_id: payload.tax_id,
        phone: payload.phone,
        guardian_name: payload.guardian_name,
        note: payload.note,
    };

    match repo.update(id, input).await {
        Ok(beneficiary) => {
            info!(beneficiary_id = %id, "Beneficiary updated");
            (StatusCode::OK, Json(beneficiary)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// DELETE `/beneficiaries/{id}` - Delete a beneficiary.
async fn delete_beneficiary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BeneficiaryRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(beneficiary_id = %id, "Beneficiary deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}
