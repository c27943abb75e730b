//! One-off donation routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::repo_error_response};
use cofre_db::{
    DonationRepository,
    repositories::{CreateDonationInput, UpdateDonationInput},
};
use cofre_shared::types::PaginationParams;

/// Creates the donation routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/donations", get(list_donations).post(create_donation))
        .route(
            "/donations/{id}",
            get(get_donation).put(update_donation).delete(delete_donation),
        )
}

/// Request body for creating a donation.
#[derive(Debug, Deserialize)]
pub struct CreateDonationRequest {
    /// Donor's name.
    pub donor_name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Positive amount.
    pub amount: Decimal,
    /// Account the donation flows into.
    pub account_id: Uuid,
    /// Date the donation was given.
    pub given_on: NaiveDate,
    /// Whether the money has already arrived (defaults to false).
    pub received: Option<bool>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Request body for updating a donation.
#[derive(Debug, Deserialize)]
pub struct UpdateDonationRequest {
    /// Donor's name.
    pub donor_name: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Account the donation flows into.
    pub account_id: Option<Uuid>,
    /// Date the donation was given.
    pub given_on: Option<NaiveDate>,
    /// New received flag.
    pub received: Option<bool>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Query parameters for listing donations.
#[derive(Debug, Deserialize)]
pub struct ListDonationsQuery {
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
}

/// GET `/donations` - List donations.
async fn list_donations(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListDonationsQuery>,
) -> impl IntoResponse {
    let repo = DonationRepository::new((*state.db).clone());
    let params = PaginationParams::new(query.page.unwrap_or(1), query.limit.unwrap_or(20));

    match repo.list(params).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

/// POST `/donations` - Create a donation; created-as-received records the
/// inflow immediately.
async fn create_donation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateDonationRequest>,
) -> impl IntoResponse {
    let repo = DonationRepository::new((*state.db).clone());
    let input = CreateDonationInput {
        donor_name: payload.donor_name,
        phone: payload.phone,
        amount: payload.amount,
        account_id: payload.account_id,
        given_on: payload.given_on,
        received: payload.received.unwrap_or(false),
        note: payload.note,
    };

    match repo.create(input, auth.user_id()).await {
        Ok(donation) => {
            info!(
                donation_id = %donation.id,
                amount = %donation.amount,
                received = donation.received,
                "Donation created"
            );
            (StatusCode::CREATED, Json(donation)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// GET `/donations/{id}` - Get a donation.
async fn get_donation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DonationRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(donation) => (StatusCode::OK, Json(donation)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

/// PUT `/donations/{id}` - Update a donation; received flips route through
/// the ledger.
async fn update_donation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDonationRequest>,
) -> impl IntoResponse {
    let repo = DonationRepository::new((*state.db).clone());
    let input = UpdateDonationInput {
        donor_name: payload.donor_name,
        phone: payload.phone.map(Some),
        amount: payload.amount,
        account_id: payload.account_id,
        given_on: payload.given_on,
        received: payload.received,
        note: payload.note.map(Some),
    };

    match repo.update(id, input, auth.user_id()).await {
        Ok(donation) => {
            info!(donation_id = %id, "Donation updated");
            (StatusCode::OK, Json(donation)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// DELETE `/donations/{id}` - Delete a donation, reversing its movement
/// first when received.
async fn delete_donation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DonationRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(donation_id = %id, "Donation deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}
