//! Dashboard repository: aggregate figures for the landing page.

use chrono::{Datelike, NaiveDate, Utc};
use cofre_core::recurrence::add_months;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;

use crate::entities::{
    accounts, donations, obligations,
    sea_orm_active_enums::{ObligationKind, ObligationStatus},
};

/// One account's name and current balance.
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalanceSummary {
    /// Account name.
    pub name: String,
    /// Current balance.
    pub balance: Decimal,
}

/// Aggregate figures for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Pending payables due today.
    pub payables_due_today: Decimal,
    /// Pending payables due this month.
    pub payables_due_this_month: Decimal,
    /// Pending receivables due today.
    pub receivables_due_today: Decimal,
    /// Pending receivables due this month.
    pub receivables_due_this_month: Decimal,
    /// Donations received this month.
    pub donations_received_this_month: Decimal,
    /// Per-account balances.
    pub account_balances: Vec<AccountBalanceSummary>,
}

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the dashboard summary for today.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn summary(&self) -> Result<DashboardSummary, DbErr> {
        let today = Utc::now().date_naive();
        let month_start = today.with_day(1).unwrap_or(today);
        let month_end = add_months(month_start, 1).pred_opt().unwrap_or(month_start);

        let payables_due_today = self
            .sum_pending_obligations(ObligationKind::Payable, today, today)
            .await?;
        let payables_due_this_month = self
            .sum_pending_obligations(ObligationKind::Payable, month_start, month_end)
            .await?;
        let receivables_due_today = self
            .sum_pending_obligations(ObligationKind::Receivable, today, today)
            .await?;
        let receivables_due_this_month = self
            .sum_pending_obligations(ObligationKind::Receivable, month_start, month_end)
            .await?;

        let donations_received_this_month: Option<Decimal> = donations::Entity::find()
            .select_only()
            .column_as(donations::Column::Amount.sum(), "total")
            .filter(donations::Column::Received.eq(true))
            .filter(donations::Column::GivenOn.gte(month_start))
            .filter(donations::Column::GivenOn.lte(month_end))
            .into_tuple::<Option<Decimal>>()
            .one(&self.db)
            .await?
            .flatten();

        let account_balances = accounts::Entity::find()
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| AccountBalanceSummary {
                name: a.name,
                balance: a.current_balance,
            })
            .collect();

        Ok(DashboardSummary {
            payables_due_today,
            payables_due_this_month,
            receivables_due_today,
            receivables_due_this_month,
            donations_received_this_month: donations_received_this_month.unwrap_or(Decimal::ZERO),
            account_balances,
        })
    }

    /// Sums pending obligations of one kind due within an inclusive range.
    async fn sum_pending_obligations(
        &self,
        kind: ObligationKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal, DbErr> {
        let total: Option<Decimal> = obligations::Entity::find()
            .select_only()
            .column_as(obligations::Column::Amount.sum(), "total")
            .filter(obligations::Column::Kind.eq(kind))
            .filter(obligations::Column::Status.eq(ObligationStatus::Pending))
            .filter(obligations::Column::DueOn.gte(from))
            .filter(obligations::Column::DueOn.lte(to))
            .into_tuple::<Option<Decimal>>()
            .one(&self.db)
            .await?
            .flatten();
        Ok(total.unwrap_or(Decimal::ZERO))
    }
}
