//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::{Origin, OriginKind};

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Movement amount must be positive.
    #[error("Movement amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// A manual withdrawal would drive the balance below zero.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// The account's current balance.
        available: Decimal,
        /// The withdrawal amount requested.
        requested: Decimal,
    },

    /// No movement exists for the given origin.
    #[error("No movement found for origin {}/{:?}", .origin.kind.as_str(), .origin.id)]
    MovementNotFound {
        /// The origin that was looked up.
        origin: Origin,
    },

    /// A movement already exists for the given origin.
    #[error("A movement already exists for origin {}/{origin_id}", .origin_kind.as_str())]
    DuplicateMovement {
        /// Origin kind of the existing movement.
        origin_kind: OriginKind,
        /// Origin id of the existing movement.
        origin_id: Uuid,
    },

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::MovementNotFound { .. } => "MOVEMENT_NOT_FOUND",
            Self::DuplicateMovement { .. } => "DUPLICATE_MOVEMENT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount(_) | Self::InsufficientBalance { .. } => 400,
            Self::MovementNotFound { .. } | Self::AccountNotFound(_) => 404,
            Self::DuplicateMovement { .. } => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InvalidAmount(dec!(0)).error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            LedgerError::InsufficientBalance {
                available: dec!(50),
                requested: dec!(100),
            }
            .error_code(),
            "INSUFFICIENT_BALANCE"
        );
        assert_eq!(
            LedgerError::MovementNotFound {
                origin: Origin::payable(Uuid::nil()),
            }
            .error_code(),
            "MOVEMENT_NOT_FOUND"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InvalidAmount(dec!(-1)).http_status_code(), 400);
        assert_eq!(
            LedgerError::AccountNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::DuplicateMovement {
                origin_kind: OriginKind::Donation,
                origin_id: Uuid::nil(),
            }
            .http_status_code(),
            409
        );
    }

    #[test]
    fn test_insufficient_balance_display() {
        let err = LedgerError::InsufficientBalance {
            available: dec!(50.00),
            requested: dec!(100.00),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: available 50.00, requested 100.00"
        );
    }
}
