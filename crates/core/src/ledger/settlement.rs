//! Settlement planning: which ledger side effect a state change requires.
//!
//! Obligations move between `pending` and `settled`; donations between
//! not-received and received. Both lifecycles share the same rule: entering
//! the settled state records exactly one movement, leaving it reverses that
//! movement, and re-entering it is a no-op. Keeping the rule in one pure
//! function means create, update, explicit settle/reopen and delete all
//! agree on the side effect.

/// The ledger side effect required by a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementAction {
    /// Record a new movement and apply its balance delta.
    Record,
    /// Reverse the existing movement and undo its balance delta.
    Reverse,
    /// No ledger effect (including idempotent re-settles).
    None,
}

/// Plans the ledger side effect for a settled-state transition.
///
/// Re-entrant transitions (settled → settled, pending → pending) are no-ops,
/// which is what makes repeated settle calls idempotent.
#[must_use]
pub const fn plan_transition(was_settled: bool, now_settled: bool) -> SettlementAction {
    match (was_settled, now_settled) {
        (false, true) => SettlementAction::Record,
        (true, false) => SettlementAction::Reverse,
        _ => SettlementAction::None,
    }
}

/// Fixed category applied to donation movements.
pub const DONATION_CATEGORY: &str = "Donation";

/// Placeholder when a counterparty lookup comes back empty.
const FALLBACK_COUNTERPARTY: &str = "Supplier";

/// Placeholder when a beneficiary lookup comes back empty.
const FALLBACK_BENEFICIARY: &str = "Beneficiary";

/// Composes the description for a payable settlement movement.
///
/// Missing lookups fall back to placeholder labels rather than failing;
/// a payment with a dangling counterparty reference still settles.
#[must_use]
pub fn describe_payable(counterparty: Option<&str>, beneficiary: Option<&str>) -> String {
    let counterparty = counterparty.unwrap_or(FALLBACK_COUNTERPARTY);
    match beneficiary {
        Some(name) => {
            let name = if name.is_empty() {
                FALLBACK_BENEFICIARY
            } else {
                name
            };
            format!("Payment - {counterparty} (for {name})")
        }
        None => format!("Payment - {counterparty}"),
    }
}

/// Composes the description for a receivable settlement movement.
#[must_use]
pub fn describe_receivable(category: &str) -> String {
    format!("Receipt - {category}")
}

/// Composes the description for a donation movement.
#[must_use]
pub fn describe_donation(donor: &str) -> String {
    format!("Donation - {donor}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, true, SettlementAction::Record)]
    #[case(true, false, SettlementAction::Reverse)]
    #[case(true, true, SettlementAction::None)]
    #[case(false, false, SettlementAction::None)]
    fn test_plan_transition(
        #[case] was: bool,
        #[case] now: bool,
        #[case] expected: SettlementAction,
    ) {
        assert_eq!(plan_transition(was, now), expected);
    }

    #[test]
    fn test_record_and_reverse_are_inverses() {
        // A transition followed by its inverse must plan opposite actions.
        assert_eq!(plan_transition(false, true), SettlementAction::Record);
        assert_eq!(plan_transition(true, false), SettlementAction::Reverse);
    }

    #[test]
    fn test_describe_payable() {
        assert_eq!(
            describe_payable(Some("Acme Ltda"), None),
            "Payment - Acme Ltda"
        );
        assert_eq!(
            describe_payable(Some("Acme Ltda"), Some("Maria")),
            "Payment - Acme Ltda (for Maria)"
        );
    }

    #[test]
    fn test_describe_payable_fallbacks() {
        assert_eq!(describe_payable(None, None), "Payment - Supplier");
        assert_eq!(
            describe_payable(None, Some("")),
            "Payment - Supplier (for Beneficiary)"
        );
    }

    #[test]
    fn test_describe_receivable_and_donation() {
        assert_eq!(describe_receivable("Membership"), "Receipt - Membership");
        assert_eq!(describe_donation("João"), "Donation - João");
    }
}
