//! Active enum definitions shared by the entities.
//!
//! Enums are stored as short strings with CHECK constraints in the schema.
//! Conversions to and from the core engine's enums live here so the
//! repositories never match on raw strings.

use cofre_core::ledger;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account kind: where the money physically sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Physical cash box.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank account.
    #[sea_orm(string_value = "bank")]
    Bank,
}

/// Movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Inflow.
    #[sea_orm(string_value = "in")]
    In,
    /// Outflow.
    #[sea_orm(string_value = "out")]
    Out,
}

impl From<ledger::Direction> for MovementDirection {
    fn from(value: ledger::Direction) -> Self {
        match value {
            ledger::Direction::In => Self::In,
            ledger::Direction::Out => Self::Out,
        }
    }
}

impl From<MovementDirection> for ledger::Direction {
    fn from(value: MovementDirection) -> Self {
        match value {
            MovementDirection::In => Self::In,
            MovementDirection::Out => Self::Out,
        }
    }
}

/// Movement origin kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MovementOriginKind {
    /// Settlement of a payable.
    #[sea_orm(string_value = "payable")]
    Payable,
    /// Settlement of a receivable.
    #[sea_orm(string_value = "receivable")]
    Receivable,
    /// A received donation.
    #[sea_orm(string_value = "donation")]
    Donation,
    /// A manual balance adjustment.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

impl From<ledger::OriginKind> for MovementOriginKind {
    fn from(value: ledger::OriginKind) -> Self {
        match value {
            ledger::OriginKind::Payable => Self::Payable,
            ledger::OriginKind::Receivable => Self::Receivable,
            ledger::OriginKind::Donation => Self::Donation,
            ledger::OriginKind::Adjustment => Self::Adjustment,
        }
    }
}

impl From<MovementOriginKind> for ledger::OriginKind {
    fn from(value: MovementOriginKind) -> Self {
        match value {
            MovementOriginKind::Payable => Self::Payable,
            MovementOriginKind::Receivable => Self::Receivable,
            MovementOriginKind::Donation => Self::Donation,
            MovementOriginKind::Adjustment => Self::Adjustment,
        }
    }
}

/// Obligation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ObligationKind {
    /// Money the association owes.
    #[sea_orm(string_value = "payable")]
    Payable,
    /// Money owed to the association.
    #[sea_orm(string_value = "receivable")]
    Receivable,
}

impl From<ledger::ObligationKind> for ObligationKind {
    fn from(value: ledger::ObligationKind) -> Self {
        match value {
            ledger::ObligationKind::Payable => Self::Payable,
            ledger::ObligationKind::Receivable => Self::Receivable,
        }
    }
}

impl From<ObligationKind> for ledger::ObligationKind {
    fn from(value: ObligationKind) -> Self {
        match value {
            ObligationKind::Payable => Self::Payable,
            ObligationKind::Receivable => Self::Receivable,
        }
    }
}

/// Obligation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ObligationStatus {
    /// Not yet settled; no ledger effect.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Settled; exactly one movement exists for it.
    #[sea_orm(string_value = "settled")]
    Settled,
}

impl ObligationStatus {
    /// Whether this status is the settled state.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Settled)
    }
}

/// Counterparty kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CounterpartyKind {
    /// A supplier the association pays.
    #[sea_orm(string_value = "supplier")]
    Supplier,
    /// A donor the association receives from.
    #[sea_orm(string_value = "donor")]
    Donor,
}

/// Category kind: which lookup list a category row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Kinds of help provided to beneficiaries.
    #[sea_orm(string_value = "help")]
    Help,
    /// Payable expense categories.
    #[sea_orm(string_value = "payable")]
    Payable,
    /// Receivable income categories.
    #[sea_orm(string_value = "receivable")]
    Receivable,
    /// Payment methods.
    #[sea_orm(string_value = "payment_method")]
    PaymentMethod,
    /// Sources of receivable income.
    #[sea_orm(string_value = "receivable_source")]
    ReceivableSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_round_trip() {
        for d in [ledger::Direction::In, ledger::Direction::Out] {
            assert_eq!(ledger::Direction::from(MovementDirection::from(d)), d);
        }
    }

    #[test]
    fn test_origin_kind_round_trip() {
        for k in [
            ledger::OriginKind::Payable,
            ledger::OriginKind::Receivable,
            ledger::OriginKind::Donation,
            ledger::OriginKind::Adjustment,
        ] {
            assert_eq!(ledger::OriginKind::from(MovementOriginKind::from(k)), k);
        }
    }

    #[test]
    fn test_status_is_settled() {
        assert!(ObligationStatus::Settled.is_settled());
        assert!(!ObligationStatus::Pending.is_settled());
    }
}
