//! Obligation repository: the payable/receivable lifecycle.
//!
//! Every transition into or out of the settled state runs inside one
//! transaction together with its movement and balance effect. The decision
//! of which side effect a transition needs is delegated to the engine's
//! settlement planner so create, update, settle, reopen and delete cannot
//! disagree.

use chrono::{NaiveDate, Utc};
use cofre_core::ledger::{
    self, LedgerError, MovementDraft, SettlementAction, describe_payable, describe_receivable,
    plan_transition,
};
use cofre_core::recurrence;
use cofre_shared::types::{Paginated, PaginationParams};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::movement::{self, MovementError};
use crate::entities::{
    beneficiaries, counterparties, obligations,
    sea_orm_active_enums::{ObligationKind, ObligationStatus},
};

/// Error types for obligation operations.
#[derive(Debug, thiserror::Error)]
pub enum ObligationError {
    /// Obligation not found.
    #[error("Obligation not found: {0}")]
    NotFound(Uuid),

    /// Input rejected before any mutation.
    #[error("Validation error: {0}")]
    Validation(String),

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

impl ObligationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
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
            Self::Validation(_) => 400,
            Self::Ledger(e) => e.http_status_code(),
            Self::Movement(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// Input for creating an obligation.
#[derive(Debug, Clone)]
pub struct CreateObligationInput {
    /// Payable or receivable.
    pub kind: ObligationKind,
    /// The supplier/donor on the other side.
    pub counterparty_id: Uuid,
    /// Payables only: who the payment ultimately helps.
    pub beneficiary_id: Option<Uuid>,
    /// Initial status; creating directly as settled records the movement
    /// immediately.
    pub status: ObligationStatus,
    /// Category label.
    pub category: String,
    /// Account the settlement moves money in or out of.
    pub account_id: Uuid,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Due date.
    pub due_on: NaiveDate,
    /// Settlement date when created settled (defaults to today).
    pub settled_on: Option<NaiveDate>,
    /// Positive amount.
    pub amount: Decimal,
    /// Payables only.
    pub payment_method: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
    /// Whether this is a recurring request.
    pub recurring: bool,
    /// Number of monthly installments when recurring.
    pub installment_count: Option<u32>,
}

/// Typed partial update for an obligation.
///
/// Lineage fields (`kind`, installment numbering, recurrence group) are
/// deliberately absent: callers cannot rewrite them.
#[derive(Debug, Clone, Default)]
pub struct UpdateObligationInput {
    /// The supplier/donor on the other side.
    pub counterparty_id: Option<Uuid>,
    /// Payables only (`Some(None)` clears it).
    pub beneficiary_id: Option<Option<Uuid>>,
    /// New status; transitions route through the settlement planner.
    pub status: Option<ObligationStatus>,
    /// Category label.
    pub category: Option<String>,
    /// Account the settlement affects.
    pub account_id: Option<Uuid>,
    /// Issue date.
    pub issued_on: Option<NaiveDate>,
    /// Due date.
    pub due_on: Option<NaiveDate>,
    /// Settlement date (`Some(None)` clears it).
    pub settled_on: Option<Option<NaiveDate>>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Payables only (`Some(None)` clears it).
    pub payment_method: Option<Option<String>>,
    /// Free-text note (`Some(None)` clears it).
    pub note: Option<Option<String>>,
}

/// Filter options for listing obligations.
#[derive(Debug, Clone, Default)]
pub struct ObligationFilter {
    /// Filter by kind.
    pub kind: Option<ObligationKind>,
    /// Filter by status.
    pub status: Option<ObligationStatus>,
    /// Due on or after this date.
    pub due_from: Option<NaiveDate>,
    /// Due on or before this date.
    pub due_to: Option<NaiveDate>,
    /// All installments of one recurring series.
    pub recurrence_group_id: Option<Uuid>,
}

/// Obligation repository for lifecycle operations.
#[derive(Debug, Clone)]
pub struct ObligationRepository {
    db: DatabaseConnection,
}

impl ObligationRepository {
    /// Creates a new obligation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an obligation, settling it immediately when requested and
    /// expanding recurring requests into their monthly installments.
    ///
    /// Installments 2..=N are always created pending regardless of the
    /// template's status; only installment 1 keeps it.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` for non-positive amounts.
    /// - `Validation` for payable-only fields on a receivable.
    pub async fn create(
        &self,
        input: CreateObligationInput,
        acting_user: Uuid,
    ) -> Result<obligations::Model, ObligationError> {
        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(input.amount).into());
        }
        if input.kind == ObligationKind::Receivable {
            if input.beneficiary_id.is_some() {
                return Err(ObligationError::Validation(
                    "beneficiary applies only to payables".to_string(),
                ));
            }
            if input.payment_method.is_some() {
                return Err(ObligationError::Validation(
                    "payment method applies only to payables".to_string(),
                ));
            }
        }

        let plan = if input.recurring {
            input
                .installment_count
                .and_then(|n| recurrence::plan_installments(input.issued_on, input.due_on, n))
        } else {
            None
        };
        let installment_count = plan
            .as_ref()
            .map_or(1, |p| i32::try_from(p.installment_count).unwrap_or(1));
        let group_id = plan.as_ref().map(|p| p.group_id);

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let settled = input.status.is_settled();
        let settled_on = if settled {
            Some(input.settled_on.unwrap_or_else(|| now.date_naive()))
        } else {
            None
        };

        let primary = obligations::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(input.kind),
            counterparty_id: Set(input.counterparty_id),
            beneficiary_id: Set(input.beneficiary_id),
            status: Set(input.status),
            category: Set(input.category.clone()),
            account_id: Set(input.account_id),
            issued_on: Set(input.issued_on),
            due_on: Set(input.due_on),
            settled_on: Set(settled_on),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method.clone()),
            note: Set(input.note.clone()),
            recurring: Set(input.recurring),
            installment_count: Set(installment_count),
            installment_no: Set(1),
            recurrence_group_id: Set(group_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let primary = primary.insert(&txn).await?;

        if settled {
            settle_side_effect(&txn, &primary, acting_user).await?;
        }

        if let Some(plan) = &plan {
            for continuation in &plan.continuations {
                let row = obligations::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    kind: Set(input.kind),
                    counterparty_id: Set(input.counterparty_id),
                    beneficiary_id: Set(input.beneficiary_id),
                    status: Set(ObligationStatus::Pending),
                    category: Set(input.category.clone()),
                    account_id: Set(input.account_id),
                    issued_on: Set(continuation.issued_on),
                    due_on: Set(continuation.due_on),
                    settled_on: Set(None),
                    amount: Set(input.amount),
                    payment_method: Set(input.payment_method.clone()),
                    note: Set(input.note.clone()),
                    recurring: Set(true),
                    installment_count: Set(installment_count),
                    installment_no: Set(
                        i32::try_from(continuation.installment_no).unwrap_or(i32::MAX)
                    ),
                    recurrence_group_id: Set(group_id),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                };
                row.insert(&txn).await?;
            }
        }

        txn.commit().await?;

        if let Some(plan) = &plan {
            info!(
                obligation_id = %primary.id,
                group_id = %plan.group_id,
                installments = plan.installment_count,
                "Recurring obligation expanded"
            );
        }

        Ok(primary)
    }

    /// Finds an obligation by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the obligation does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<obligations::Model, ObligationError> {
        obligations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ObligationError::NotFound(id))
    }

    /// Lists obligations, soonest due first, with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: ObligationFilter,
        params: PaginationParams,
    ) -> Result<Paginated<obligations::Model>, ObligationError> {
        let params = params.clamped();

        let mut query = obligations::Entity::find();
        if let Some(kind) = filter.kind {
            query = query.filter(obligations::Column::Kind.eq(kind));
        }
        if let Some(status) = filter.status {
            query = query.filter(obligations::Column::Status.eq(status));
        }
        if let Some(from) = filter.due_from {
            query = query.filter(obligations::Column::DueOn.gte(from));
        }
        if let Some(to) = filter.due_to {
            query = query.filter(obligations::Column::DueOn.lte(to));
        }
        if let Some(group) = filter.recurrence_group_id {
            query = query.filter(obligations::Column::RecurrenceGroupId.eq(group));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_asc(obligations::Column::DueOn)
            .order_by_asc(obligations::Column::InstallmentNo)
            .offset(params.offset())
            .limit(params.limit)
            .all(&self.db)
            .await?;

        Ok(Paginated::new(items, total, params))
    }

    /// Settles a pending obligation: sets the settlement date and records
    /// the movement. Settling an already-settled obligation is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the obligation does not exist.
    pub async fn settle(
        &self,
        id: Uuid,
        settled_on: Option<NaiveDate>,
        acting_user: Uuid,
    ) -> Result<obligations::Model, ObligationError> {
        let txn = self.db.begin().await?;
        let obligation = obligations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ObligationError::NotFound(id))?;

        if plan_transition(obligation.status.is_settled(), true) != SettlementAction::Record {
            txn.commit().await?;
            return Ok(obligation);
        }

        let mut active: obligations::ActiveModel = obligation.into();
        active.status = Set(ObligationStatus::Settled);
        active.settled_on = Set(Some(settled_on.unwrap_or_else(|| Utc::now().date_naive())));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        settle_side_effect(&txn, &updated, acting_user).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Reopens a settled obligation: reverses its movement and clears the
    /// settlement date. Reopening a pending obligation is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the obligation does not exist.
    pub async fn revert_to_pending(
        &self,
        id: Uuid,
    ) -> Result<obligations::Model, ObligationError> {
        let txn = self.db.begin().await?;
        let obligation = obligations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ObligationError::NotFound(id))?;

        if plan_transition(obligation.status.is_settled(), false) != SettlementAction::Reverse {
            txn.commit().await?;
            return Ok(obligation);
        }

        reverse_if_linked(&txn, &obligation).await?;

        let mut active: obligations::ActiveModel = obligation.into();
        active.status = Set(ObligationStatus::Pending);
        active.settled_on = Set(None);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Applies a typed partial update. A status change routes through the
    /// settlement planner: flipping to settled records the movement with the
    /// updated field values, flipping back to pending reverses it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the obligation does not exist.
    /// - `InvalidAmount` for non-positive amounts.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateObligationInput,
        acting_user: Uuid,
    ) -> Result<obligations::Model, ObligationError> {
        if let Some(amount) = input.amount
            && amount <= Decimal::ZERO
        {
            return Err(LedgerError::InvalidAmount(amount).into());
        }

        let txn = self.db.begin().await?;
        let existing = obligations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ObligationError::NotFound(id))?;

        let was_settled = existing.status.is_settled();
        let now_settled = input
            .status
            .map_or(was_settled, ObligationStatus::is_settled);
        let action = plan_transition(was_settled, now_settled);

        if action == SettlementAction::Reverse {
            reverse_if_linked(&txn, &existing).await?;
        }

        let mut active: obligations::ActiveModel = existing.into();
        if let Some(counterparty_id) = input.counterparty_id {
            active.counterparty_id = Set(counterparty_id);
        }
        if let Some(beneficiary_id) = input.beneficiary_id {
            active.beneficiary_id = Set(beneficiary_id);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(account_id) = input.account_id {
            active.account_id = Set(account_id);
        }
        if let Some(issued_on) = input.issued_on {
            active.issued_on = Set(issued_on);
        }
        if let Some(due_on) = input.due_on {
            active.due_on = Set(due_on);
        }
        if let Some(settled_on) = input.settled_on {
            active.settled_on = Set(settled_on);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(payment_method) = input.payment_method {
            active.payment_method = Set(payment_method);
        }
        if let Some(note) = input.note {
            active.note = Set(note);
        }
        match action {
            SettlementAction::Record => {
                if !matches!(active.settled_on, ActiveValue::Set(Some(_))) {
                    active.settled_on = Set(Some(Utc::now().date_naive()));
                }
            }
            SettlementAction::Reverse => {
                active.settled_on = Set(None);
            }
            SettlementAction::None => {}
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        if action == SettlementAction::Record {
            settle_side_effect(&txn, &updated, acting_user).await?;
        }

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes an obligation, reversing its movement first when settled.
    /// Deleting a pending obligation has no ledger effect.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the obligation does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), ObligationError> {
        let txn = self.db.begin().await?;
        let obligation = obligations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ObligationError::NotFound(id))?;

        if obligation.status.is_settled() {
            reverse_if_linked(&txn, &obligation).await?;
        }

        obligations::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }
}

/// Records the settlement movement for an obligation, composing the
/// description from counterparty (and beneficiary) names with placeholder
/// fallbacks for dangling references.
async fn settle_side_effect<C: ConnectionTrait>(
    conn: &C,
    obligation: &obligations::Model,
    acting_user: Uuid,
) -> Result<(), ObligationError> {
    let core_kind = ledger::ObligationKind::from(obligation.kind);

    let description = match core_kind {
        ledger::ObligationKind::Payable => {
            let counterparty = counterparties::Entity::find_by_id(obligation.counterparty_id)
                .one(conn)
                .await?
                .map(|c| c.name);
            let beneficiary = match obligation.beneficiary_id {
                Some(beneficiary_id) => Some(
                    beneficiaries::Entity::find_by_id(beneficiary_id)
                        .one(conn)
                        .await?
                        .map(|b| b.name)
                        .unwrap_or_default(),
                ),
                None => None,
            };
            describe_payable(counterparty.as_deref(), beneficiary.as_deref())
        }
        ledger::ObligationKind::Receivable => describe_receivable(&obligation.category),
    };

    let draft = MovementDraft::new(
        obligation.account_id,
        core_kind.direction(),
        obligation.amount,
        description,
        Some(obligation.category.clone()),
        core_kind.origin(obligation.id),
        acting_user,
        obligation.note.clone(),
    )?;
    movement::record_on(conn, &draft).await?;
    Ok(())
}

/// Reverses the obligation's movement if one is linked; rows settled without
/// a movement (none was ever recorded) revert with no ledger effect.
async fn reverse_if_linked<C: ConnectionTrait>(
    conn: &C,
    obligation: &obligations::Model,
) -> Result<(), ObligationError> {
    let origin = ledger::ObligationKind::from(obligation.kind).origin(obligation.id);
    if movement::find_by_origin_on(conn, origin).await?.is_some() {
        movement::reverse_on(conn, origin).await?;
    }
    Ok(())
}
