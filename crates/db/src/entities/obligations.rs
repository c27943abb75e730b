//! `SeaORM` entity for the obligations table (payables and receivables).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ObligationKind, ObligationStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "obligations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: ObligationKind,
    pub counterparty_id: Uuid,
    /// Payables only: who the payment ultimately helps.
    pub beneficiary_id: Option<Uuid>,
    pub status: ObligationStatus,
    pub category: String,
    pub account_id: Uuid,
    pub issued_on: Date,
    pub due_on: Date,
    pub settled_on: Option<Date>,
    pub amount: Decimal,
    /// Payables only.
    pub payment_method: Option<String>,
    pub note: Option<String>,
    pub recurring: bool,
    /// Total installments in the series (1 for non-recurring).
    pub installment_count: i32,
    /// 1-based position within the series.
    pub installment_no: i32,
    /// Shared by all installments expanded from one recurring request.
    pub recurrence_group_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::counterparties::Entity",
        from = "Column::CounterpartyId",
        to = "super::counterparties::Column::Id"
    )]
    Counterparties,
    #[sea_orm(
        belongs_to = "super::beneficiaries::Entity",
        from = "Column::BeneficiaryId",
        to = "super::beneficiaries::Column::Id"
    )]
    Beneficiaries,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::counterparties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Counterparties.def()
    }
}

impl Related<super::beneficiaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Beneficiaries.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
