//! Account balance arithmetic.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::Direction;

/// Computes the balance an account should hold given its initial balance and
/// the signed deltas of every movement referencing it.
///
/// This is the at-rest invariant the rest of the engine preserves:
/// `current_balance == initial_balance + Σ signed deltas`.
#[must_use]
pub fn balance_identity(initial: Decimal, deltas: impl IntoIterator<Item = Decimal>) -> Decimal {
    deltas.into_iter().fold(initial, |acc, d| acc + d)
}

/// Validates a manual balance adjustment and resolves it into a direction
/// and positive amount.
///
/// Only the manual-adjustment path enforces the non-negative floor;
/// settlement movements may legitimately overdraw an account.
///
/// # Errors
///
/// - `LedgerError::InvalidAmount` if `signed_amount` is zero.
/// - `LedgerError::InsufficientBalance` if a withdrawal exceeds the current
///   balance.
pub fn check_adjustment(
    current_balance: Decimal,
    signed_amount: Decimal,
) -> Result<(Direction, Decimal), LedgerError> {
    if signed_amount == Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(signed_amount));
    }

    if signed_amount > Decimal::ZERO {
        return Ok((Direction::In, signed_amount));
    }

    let requested = -signed_amount;
    if requested > current_balance {
        return Err(LedgerError::InsufficientBalance {
            available: current_balance,
            requested,
        });
    }
    Ok((Direction::Out, requested))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_identity_empty() {
        assert_eq!(balance_identity(dec!(120.50), []), dec!(120.50));
    }

    #[test]
    fn test_balance_identity_mixed() {
        let deltas = [dec!(200), dec!(-75.25), dec!(10)];
        assert_eq!(balance_identity(dec!(100), deltas), dec!(234.75));
    }

    #[test]
    fn test_adjustment_deposit() {
        let (direction, amount) = check_adjustment(dec!(0), dec!(30)).unwrap();
        assert_eq!(direction, Direction::In);
        assert_eq!(amount, dec!(30));
    }

    #[test]
    fn test_adjustment_withdrawal_within_balance() {
        let (direction, amount) = check_adjustment(dec!(100), dec!(-100)).unwrap();
        assert_eq!(direction, Direction::Out);
        assert_eq!(amount, dec!(100));
    }

    #[test]
    fn test_adjustment_withdrawal_exceeding_balance() {
        let err = check_adjustment(dec!(50), dec!(-100)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance {
                available,
                requested,
            } if available == dec!(50) && requested == dec!(100)
        ));
    }

    #[test]
    fn test_adjustment_zero_rejected() {
        assert!(matches!(
            check_adjustment(dec!(10), dec!(0)),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    /// Strategy for two-decimal currency amounts.
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        /// The identity is order-independent: summing deltas in any rotation
        /// yields the same balance.
        #[test]
        fn prop_identity_order_independent(
            initial in amount_strategy(),
            mut deltas in prop::collection::vec(amount_strategy(), 0..20),
            rotate in 0usize..20,
        ) {
            let forward = balance_identity(initial, deltas.iter().copied());
            if !deltas.is_empty() {
                let mid = rotate % deltas.len();
                deltas.rotate_left(mid);
            }
            let rotated = balance_identity(initial, deltas.iter().copied());
            prop_assert_eq!(forward, rotated);
        }

        /// Recording a delta and then its negation restores the balance
        /// exactly, amount for amount.
        #[test]
        fn prop_record_then_reverse_round_trips(
            initial in amount_strategy(),
            delta in amount_strategy(),
        ) {
            let after = balance_identity(initial, [delta, -delta]);
            prop_assert_eq!(after, initial);
        }

        /// A successful adjustment never resolves to a non-positive amount,
        /// and a successful withdrawal never exceeds the available balance.
        #[test]
        fn prop_adjustment_resolution(
            balance in (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
            signed in amount_strategy(),
        ) {
            match check_adjustment(balance, signed) {
                Ok((direction, amount)) => {
                    prop_assert!(amount > Decimal::ZERO);
                    prop_assert_eq!(direction.signed(amount), signed);
                    if direction == Direction::Out {
                        prop_assert!(amount <= balance);
                    }
                }
                Err(LedgerError::InvalidAmount(_)) => prop_assert_eq!(signed, Decimal::ZERO),
                Err(LedgerError::InsufficientBalance { available, requested }) => {
                    prop_assert_eq!(available, balance);
                    prop_assert!(requested > balance);
                }
                Err(e) => prop_assert!(false, "unexpected error: {e}"),
            }
        }
    }
}
