//! Account repository.
//!
//! Accounts hold the running balances the ledger engine maintains. Callers
//! never write `current_balance` directly; the only mutation paths are the
//! movement helpers and the explicit manual adjustment below.

use chrono::Utc;
use cofre_core::ledger::{self, LedgerError, MovementDraft, Origin};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::movement::{self, MovementError};
use crate::entities::{accounts, movements, sea_orm_active_enums::AccountKind};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Cannot delete an account that has ledger movements.
    #[error("Cannot delete account: account has {0} movements")]
    HasMovements(u64),

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

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::HasMovements(_) => "HAS_MOVEMENTS",
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
            Self::HasMovements(_) => 409,
            Self::Ledger(e) => e.http_status_code(),
            Self::Movement(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Display name.
    pub name: String,
    /// Cash box or bank account.
    pub kind: AccountKind,
    /// Opening balance; the current balance starts equal to it.
    pub initial_balance: Decimal,
    /// Date the balance was established (defaults to today).
    pub opened_on: Option<chrono::NaiveDate>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Input for updating an account.
///
/// Balances are deliberately absent: they belong to the ledger engine.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Display name.
    pub name: Option<String>,
    /// Cash box or bank account.
    pub kind: Option<AccountKind>,
    /// Free-text note (`Some(None)` clears it).
    pub note: Option<Option<String>>,
}

/// Account repository for CRUD and manual adjustments.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateAccountInput) -> Result<accounts::Model, AccountError> {
        let now = Utc::now();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            kind: Set(input.kind),
            initial_balance: Set(input.initial_balance),
            current_balance: Set(input.initial_balance),
            opened_on: Set(input.opened_on.unwrap_or_else(|| now.date_naive())),
            note: Set(input.note),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Lists all accounts ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Updates an account's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = self.find_by_id(id).await?;

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(kind) = input.kind {
            active.kind = Set(kind);
        }
        if let Some(note) = input.note {
            active.note = Set(note);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account that has no ledger movements.
    ///
    /// # Errors
    ///
    /// Returns `HasMovements` if movements still reference the account.
    pub async fn delete(&self, id: Uuid) -> Result<(), AccountError> {
        let account = self.find_by_id(id).await?;

        let movement_count = movements::Entity::find()
            .filter(movements::Column::AccountId.eq(id))
            .count(&self.db)
            .await?;
        if movement_count > 0 {
            return Err(AccountError::HasMovements(movement_count));
        }

        accounts::Entity::delete_by_id(account.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Applies a manual balance adjustment: records an `adjustment` movement
    /// and the matching balance delta in one transaction.
    ///
    /// Positive amounts deposit, negative amounts withdraw. Only this path
    /// enforces the non-negative floor; settlements may overdraw.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the account does not exist.
    /// - `InvalidAmount` if the signed amount is zero.
    /// - `InsufficientBalance` if a withdrawal exceeds the current balance.
    pub async fn adjust_balance(
        &self,
        id: Uuid,
        signed_amount: Decimal,
        note: Option<String>,
        acting_user: Uuid,
    ) -> Result<(accounts::Model, movements::Model), AccountError> {
        let txn = self.db.begin().await?;

        // Lock the row so the floor check and the increment see the same
        // balance under concurrency.
        let account = accounts::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let (direction, amount) = ledger::check_adjustment(account.current_balance, signed_amount)?;

        let description = note.clone().unwrap_or_else(|| match direction {
            ledger::Direction::In => format!("Balance addition - {amount}"),
            ledger::Direction::Out => format!("Balance withdrawal - {amount}"),
        });

        let draft = MovementDraft::new(
            id,
            direction,
            amount,
            description,
            None,
            Origin::adjustment(),
            acting_user,
            note,
        )?;
        let recorded = movement::record_on(&txn, &draft).await?;

        let account = accounts::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        txn.commit().await?;
        Ok((account, recorded))
    }
}
