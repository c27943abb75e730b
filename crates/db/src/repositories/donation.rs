//! Donation repository: the one-off donation lifecycle.
//!
//! A simpler mirror of the obligation lifecycle: a boolean `received`
//! instead of a status, no counterparty record, no recurrence. Marking a
//! donation received records an inflow movement; un-marking or deleting a
//! received donation reverses it. The un-mark reversal is symmetric by
//! design (see DESIGN.md).

use chrono::{NaiveDate, Utc};
use cofre_core::ledger::{
    DONATION_CATEGORY, LedgerError, MovementDraft, Origin, SettlementAction, describe_donation,
    plan_transition,
};
use cofre_shared::types::{Paginated, PaginationParams};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::movement::{self, MovementError};
use crate::entities::donations;

/// Error types for donation operations.
#[derive(Debug, thiserror::Error)]
pub enum DonationError {
    /// Donation not found.
    #[error("Donation not found: {0}")]
    NotFound(Uuid),

    /// A ledger rule was violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A movement operation failed.
    #[error(transparent)]
    Movement(#[from] MovementError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl DonationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Ledger(e) => e.error_code(),
            Self::Movement(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Ledger(e) => e.http_status_code(),
            Self::Movement(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// Input for creating a donation.
#[derive(Debug, Clone)]
pub struct CreateDonationInput {
    /// Donor's name (donations need no counterparty record).
    pub donor_name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Positive amount.
    pub amount: Decimal,
    /// Account the donation flows into.
    pub account_id: Uuid,
    /// Date the donation was given.
    pub given_on: NaiveDate,
    /// Whether the money has already arrived.
    pub received: bool,
    /// Free-text note.
    pub note: Option<String>,
}

/// Typed partial update for a donation.
#[derive(Debug, Clone, Default)]
pub struct UpdateDonationInput {
    /// Donor's name.
    pub donor_name: Option<String>,
    /// Contact phone (`Some(None)` clears it).
    pub phone: Option<Option<String>>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Account the donation flows into.
    pub account_id: Option<Uuid>,
    /// Date the donation was given.
    pub given_on: Option<NaiveDate>,
    /// New received flag; flips route through the settlement planner.
    pub received: Option<bool>,
    /// Free-text note (`Some(None)` clears it).
    pub note: Option<Option<String>>,
}

/// Donation repository for lifecycle operations.
#[derive(Debug, Clone)]
pub struct DonationRepository {
    db: DatabaseConnection,
}

impl DonationRepository {
    /// Creates a new donation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a donation, recording its movement immediately when created
    /// as received.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for non-positive amounts.
    pub async fn create(
        &self,
        input: CreateDonationInput,
        acting_user: Uuid,
    ) -> Result<donations::Model, DonationError> {
        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(input.amount).into());
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let donation = donations::ActiveModel {
            id: Set(Uuid::new_v4()),
            donor_name: Set(input.donor_name),
            phone: Set(input.phone),
            amount: Set(input.amount),
            account_id: Set(input.account_id),
            given_on: Set(input.given_on),
            received: Set(input.received),
            note: Set(input.note),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let donation = donation.insert(&txn).await?;

        if donation.received {
            receive_side_effect(&txn, &donation, acting_user).await?;
        }

        txn.commit().await?;
        Ok(donation)
    }

    /// Finds a donation by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the donation does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<donations::Model, DonationError> {
        donations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DonationError::NotFound(id))
    }

    /// Lists donations, newest first, with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        params: PaginationParams,
    ) -> Result<Paginated<donations::Model>, DonationError> {
        let params = params.clamped();

        let query = donations::Entity::find();
        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(donations::Column::GivenOn)
            .order_by_desc(donations::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit)
            .all(&self.db)
            .await?;

        Ok(Paginated::new(items, total, params))
    }

    /// Applies a typed partial update. Flipping `received` routes through
    /// the settlement planner: false→true records the movement with the
    /// updated values, true→false reverses it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the donation does not exist.
    /// - `InvalidAmount` for non-positive amounts.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateDonationInput,
        acting_user: Uuid,
    ) -> Result<donations::Model, DonationError> {
        if let Some(amount) = input.amount
            && amount <= Decimal::ZERO
        {
            return Err(LedgerError::InvalidAmount(amount).into());
        }

        let txn = self.db.begin().await?;
        let existing = donations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DonationError::NotFound(id))?;

        let action = plan_transition(
            existing.received,
            input.received.unwrap_or(existing.received),
        );

        if action == SettlementAction::Reverse {
            reverse_if_linked(&txn, existing.id).await?;
        }

        let mut active: donations::ActiveModel = existing.into();
        if let Some(donor_name) = input.donor_name {
            active.donor_name = Set(donor_name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(account_id) = input.account_id {
            active.account_id = Set(account_id);
        }
        if let Some(given_on) = input.given_on {
            active.given_on = Set(given_on);
        }
        if let Some(received) = input.received {
            active.received = Set(received);
        }
        if let Some(note) = input.note {
            active.note = Set(note);
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        if action == SettlementAction::Record {
            receive_side_effect(&txn, &updated, acting_user).await?;
        }

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a donation, reversing its movement first when received.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the donation does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), DonationError> {
        let txn = self.db.begin().await?;
        let donation = donations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DonationError::NotFound(id))?;

        if donation.received {
            reverse_if_linked(&txn, donation.id).await?;
        }

        donations::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }
}

/// Records the inflow movement for a received donation.
async fn receive_side_effect<C: ConnectionTrait>(
    conn: &C,
    donation: &donations::Model,
    acting_user: Uuid,
) -> Result<(), DonationError> {
    let draft = MovementDraft::new(
        donation.account_id,
        cofre_core::ledger::Direction::In,
        donation.amount,
        describe_donation(&donation.donor_name),
        Some(DONATION_CATEGORY.to_string()),
        Origin::donation(donation.id),
        acting_user,
        donation.note.clone(),
    )?;
    movement::record_on(conn, &draft).await?;
    Ok(())
}

/// Reverses the donation's movement if one is linked.
async fn reverse_if_linked<C: ConnectionTrait>(
    conn: &C,
    donation_id: Uuid,
) -> Result<(), DonationError> {
    let origin = Origin::donation(donation_id);
    if movement::find_by_origin_on(conn, origin).await?.is_some() {
        movement::reverse_on(conn, origin).await?;
    }
    Ok(())
}
