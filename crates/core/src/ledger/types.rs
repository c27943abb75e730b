//! Ledger domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;

/// Direction of a movement against an account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Inflow: increases the account balance.
    In,
    /// Outflow: decreases the account balance.
    Out,
}

impl Direction {
    /// Applies the direction's sign to a positive amount.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::In => amount,
            Self::Out => -amount,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }

    /// Stable wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// The event that caused a movement to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    /// Settlement of a payable obligation.
    Payable,
    /// Settlement of a receivable obligation.
    Receivable,
    /// A received one-off donation.
    Donation,
    /// A manual balance adjustment.
    Adjustment,
}

impl OriginKind {
    /// Stable wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payable => "payable",
            Self::Receivable => "receivable",
            Self::Donation => "donation",
            Self::Adjustment => "adjustment",
        }
    }
}

/// A movement's typed origin reference.
///
/// Settlement origins carry the id of the obligation or donation that
/// produced the movement; manual adjustments have no originating record.
/// For any origin with an id, at most one movement may exist at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin {
    /// What kind of event produced the movement.
    pub kind: OriginKind,
    /// The originating record, when there is one.
    pub id: Option<Uuid>,
}

impl Origin {
    /// Origin for a payable settlement.
    #[must_use]
    pub const fn payable(id: Uuid) -> Self {
        Self {
            kind: OriginKind::Payable,
            id: Some(id),
        }
    }

    /// Origin for a receivable settlement.
    #[must_use]
    pub const fn receivable(id: Uuid) -> Self {
        Self {
            kind: OriginKind::Receivable,
            id: Some(id),
        }
    }

    /// Origin for a received donation.
    #[must_use]
    pub const fn donation(id: Uuid) -> Self {
        Self {
            kind: OriginKind::Donation,
            id: Some(id),
        }
    }

    /// Origin for a manual adjustment.
    #[must_use]
    pub const fn adjustment() -> Self {
        Self {
            kind: OriginKind::Adjustment,
            id: None,
        }
    }

    /// Whether the at-most-one-movement invariant applies to this origin.
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.id.is_some()
    }
}

/// Obligation kind: which side of the ledger it settles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObligationKind {
    /// Money the association owes (settles as an outflow).
    Payable,
    /// Money owed to the association (settles as an inflow).
    Receivable,
}

impl ObligationKind {
    /// The movement direction a settlement produces.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Payable => Direction::Out,
            Self::Receivable => Direction::In,
        }
    }

    /// The origin kind of the settlement movement.
    #[must_use]
    pub const fn origin_kind(self) -> OriginKind {
        match self {
            Self::Payable => OriginKind::Payable,
            Self::Receivable => OriginKind::Receivable,
        }
    }

    /// The origin reference for this obligation's settlement movement.
    #[must_use]
    pub const fn origin(self, id: Uuid) -> Origin {
        Origin {
            kind: self.origin_kind(),
            id: Some(id),
        }
    }

    /// Stable wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payable => "payable",
            Self::Receivable => "receivable",
        }
    }
}

/// A validated movement waiting to be persisted.
///
/// Construction is the single validation point: an amount that is zero or
/// negative never reaches the ledger.
#[derive(Debug, Clone)]
pub struct MovementDraft {
    /// The account whose balance the movement affects.
    pub account_id: Uuid,
    /// Inflow or outflow.
    pub direction: Direction,
    /// Positive amount.
    pub amount: Decimal,
    /// Human-readable description.
    pub description: String,
    /// Category label.
    pub category: Option<String>,
    /// Typed origin reference.
    pub origin: Origin,
    /// The authenticated user the movement is attributed to.
    pub recorded_by: Uuid,
    /// Free-text note.
    pub note: Option<String>,
}

impl MovementDraft {
    /// Creates a draft, rejecting non-positive amounts.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if `amount <= 0`.
    pub fn new(
        account_id: Uuid,
        direction: Direction,
        amount: Decimal,
        description: impl Into<String>,
        category: Option<String>,
        origin: Origin,
        recorded_by: Uuid,
        note: Option<String>,
    ) -> Result<Self, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        Ok(Self {
            account_id,
            direction,
            amount,
            description: description.into(),
            category,
            origin,
            recorded_by,
            note,
        })
    }

    /// The signed balance delta this movement applies when recorded.
    #[must_use]
    pub fn signed_delta(&self) -> Decimal {
        self.direction.signed(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_signed() {
        assert_eq!(Direction::In.signed(dec!(100)), dec!(100));
        assert_eq!(Direction::Out.signed(dec!(100)), dec!(-100));
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::In.opposite(), Direction::Out);
        assert_eq!(Direction::Out.opposite(), Direction::In);
    }

    #[test]
    fn test_obligation_kind_mapping() {
        assert_eq!(ObligationKind::Payable.direction(), Direction::Out);
        assert_eq!(ObligationKind::Receivable.direction(), Direction::In);
        assert_eq!(ObligationKind::Payable.origin_kind(), OriginKind::Payable);
        assert_eq!(
            ObligationKind::Receivable.origin_kind(),
            OriginKind::Receivable
        );
    }

    #[test]
    fn test_origin_uniqueness() {
        assert!(Origin::payable(Uuid::new_v4()).is_unique());
        assert!(Origin::donation(Uuid::new_v4()).is_unique());
        assert!(!Origin::adjustment().is_unique());
    }

    #[test]
    fn test_draft_rejects_non_positive_amounts() {
        for amount in [dec!(0), dec!(-0.01), dec!(-500)] {
            let result = MovementDraft::new(
                Uuid::new_v4(),
                Direction::In,
                amount,
                "x",
                None,
                Origin::adjustment(),
                Uuid::new_v4(),
                None,
            );
            assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
        }
    }

    #[test]
    fn test_draft_signed_delta() {
        let draft = MovementDraft::new(
            Uuid::new_v4(),
            Direction::Out,
            dec!(75.50),
            "Payment - Supplier",
            Some("Rent".to_string()),
            Origin::payable(Uuid::new_v4()),
            Uuid::new_v4(),
            None,
        )
        .unwrap();

        assert_eq!(draft.signed_delta(), dec!(-75.50));
    }
}
