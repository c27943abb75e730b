//! Movement repository: the unified ledger.
//!
//! Recording and reversing movements always happens together with the
//! matching balance adjustment, inside whatever transaction the caller is
//! running. Balances are mutated with a SQL-level increment so concurrent
//! writers cannot lose updates to a read-modify-write race.

use chrono::{NaiveDate, NaiveTime, Utc};
use cofre_core::ledger::{self, LedgerError, MovementDraft, Origin};
use cofre_shared::types::{Paginated, PaginationParams};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{accounts, movements, sea_orm_active_enums::MovementOriginKind};

/// Error types for movement operations.
#[derive(Debug, thiserror::Error)]
pub enum MovementError {
    /// A ledger rule was violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl MovementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Ledger(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// Filter options for listing movements.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Filter by account.
    pub account_id: Option<Uuid>,
    /// Filter by origin kind.
    pub origin_kind: Option<ledger::OriginKind>,
    /// Occurred on or after this date.
    pub from: Option<NaiveDate>,
    /// Occurred on or before this date.
    pub to: Option<NaiveDate>,
}

/// Outcome of a destructive ledger reset.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ResetSummary {
    /// Number of accounts whose balances were zeroed.
    pub accounts_updated: u64,
    /// Number of movements deleted.
    pub movements_removed: u64,
}

/// Looks up the unique movement for a settlement origin, on any connection.
///
/// Manual adjustments have no origin id and never match.
pub(crate) async fn find_by_origin_on<C: ConnectionTrait>(
    conn: &C,
    origin: Origin,
) -> Result<Option<movements::Model>, DbErr> {
    let Some(origin_id) = origin.id else {
        return Ok(None);
    };

    movements::Entity::find()
        .filter(movements::Column::OriginKind.eq(MovementOriginKind::from(origin.kind)))
        .filter(movements::Column::OriginId.eq(origin_id))
        .one(conn)
        .await
}

/// Records a movement and applies its balance delta, on any connection.
///
/// The caller is responsible for wrapping this in a transaction together
/// with whatever row change triggered it.
pub(crate) async fn record_on<C: ConnectionTrait>(
    conn: &C,
    draft: &MovementDraft,
) -> Result<movements::Model, MovementError> {
    if let Some(origin_id) = draft.origin.id
        && find_by_origin_on(conn, draft.origin).await?.is_some()
    {
        return Err(LedgerError::DuplicateMovement {
            origin_kind: draft.origin.kind,
            origin_id,
        }
        .into());
    }

    let now = Utc::now();
    let movement = movements::ActiveModel {
        id: Set(Uuid::new_v4()),
        account_id: Set(draft.account_id),
        direction: Set(draft.direction.into()),
        amount: Set(draft.amount),
        occurred_at: Set(now.into()),
        description: Set(draft.description.clone()),
        category: Set(draft.category.clone()),
        origin_kind: Set(draft.origin.kind.into()),
        origin_id: Set(draft.origin.id),
        recorded_by: Set(draft.recorded_by),
        note: Set(draft.note.clone()),
        created_at: Set(now.into()),
    };

    let movement = movement.insert(conn).await?;
    apply_balance_delta(conn, draft.account_id, draft.signed_delta()).await?;
    Ok(movement)
}

/// Reverses the unique movement for a settlement origin, on any connection:
/// deletes the row and undoes its balance delta exactly.
pub(crate) async fn reverse_on<C: ConnectionTrait>(
    conn: &C,
    origin: Origin,
) -> Result<movements::Model, MovementError> {
    let Some(movement) = find_by_origin_on(conn, origin).await? else {
        return Err(LedgerError::MovementNotFound { origin }.into());
    };

    let delta = ledger::Direction::from(movement.direction).signed(movement.amount);
    movements::Entity::delete_by_id(movement.id).exec(conn).await?;
    apply_balance_delta(conn, movement.account_id, -delta).await?;
    Ok(movement)
}

/// Applies a signed delta to an account balance with a SQL-level increment.
pub(crate) async fn apply_balance_delta<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
    delta: Decimal,
) -> Result<(), MovementError> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::CurrentBalance,
            Expr::col(accounts::Column::CurrentBalance).add(delta),
        )
        .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(accounts::Column::Id.eq(account_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(LedgerError::AccountNotFound(account_id).into());
    }
    Ok(())
}

/// Movement repository for ledger operations.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a movement and its balance adjustment in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMovement` if the origin already has a movement,
    /// `AccountNotFound` if the account does not exist.
    pub async fn record(&self, draft: MovementDraft) -> Result<movements::Model, MovementError> {
        let txn = self.db.begin().await?;
        let movement = record_on(&txn, &draft).await?;
        txn.commit().await?;
        Ok(movement)
    }

    /// Reverses the unique movement for an origin in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `MovementNotFound` if no movement exists for the origin.
    pub async fn reverse(&self, origin: Origin) -> Result<movements::Model, MovementError> {
        let txn = self.db.begin().await?;
        let movement = reverse_on(&txn, origin).await?;
        txn.commit().await?;
        Ok(movement)
    }

    /// Returns the movement linked to an origin, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_origin(
        &self,
        origin: Origin,
    ) -> Result<Option<movements::Model>, MovementError> {
        Ok(find_by_origin_on(&self.db, origin).await?)
    }

    /// Lists movements, newest first, with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: MovementFilter,
        params: PaginationParams,
    ) -> Result<Paginated<movements::Model>, MovementError> {
        let params = params.clamped();

        let mut query = movements::Entity::find();
        if let Some(account_id) = filter.account_id {
            query = query.filter(movements::Column::AccountId.eq(account_id));
        }
        if let Some(kind) = filter.origin_kind {
            query = query.filter(movements::Column::OriginKind.eq(MovementOriginKind::from(kind)));
        }
        if let Some(from) = filter.from {
            let start = from.and_time(NaiveTime::MIN).and_utc();
            query = query.filter(movements::Column::OccurredAt.gte(start));
        }
        if let Some(to) = filter.to {
            let end = to.succ_opt().unwrap_or(to).and_time(NaiveTime::MIN).and_utc();
            query = query.filter(movements::Column::OccurredAt.lt(end));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(movements::Column::OccurredAt)
            .order_by_desc(movements::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit)
            .all(&self.db)
            .await?;

        Ok(Paginated::new(items, total, params))
    }

    /// Deletes every movement and zeroes every account balance (initial and
    /// current), in one transaction. Irreversible; intended for test and
    /// staging data resets.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operations fail.
    pub async fn reset_all(&self) -> Result<ResetSummary, MovementError> {
        let txn = self.db.begin().await?;

        let movements_removed = movements::Entity::delete_many()
            .exec(&txn)
            .await?
            .rows_affected;

        let accounts_updated = accounts::Entity::update_many()
            .col_expr(accounts::Column::InitialBalance, Expr::value(Decimal::ZERO))
            .col_expr(accounts::Column::CurrentBalance, Expr::value(Decimal::ZERO))
            .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;

        info!(
            movements_removed,
            accounts_updated, "All balances reset to zero"
        );

        Ok(ResetSummary {
            accounts_updated,
            movements_removed,
        })
    }
}
