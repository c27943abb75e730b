//! Workflow tests for the ledger consistency rules.
//!
//! These tests drive the same settlement planner the repositories use,
//! against an in-memory account/ledger model that mirrors the repositories'
//! transactional semantics (record = insert + delta, reverse = delete +
//! negated delta). They pin down the end-to-end properties: balance
//! identity, at-most-one movement per origin, round-trips, idempotent
//! re-settles and deletion reversal.

#[cfg(test)]
mod tests {
    use cofre_core::ledger::{
        Direction, ObligationKind, Origin, SettlementAction, balance_identity, check_adjustment,
        plan_transition,
    };
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    /// In-memory mirror of one account plus its slice of the movement
    /// ledger.
    struct LedgerSim {
        initial_balance: Decimal,
        current_balance: Decimal,
        movements: Vec<(Origin, Decimal)>,
    }

    impl LedgerSim {
        fn new(initial_balance: Decimal) -> Self {
            Self {
                initial_balance,
                current_balance: initial_balance,
                movements: Vec::new(),
            }
        }

        /// Record = insert movement + apply signed delta, refusing origin
        /// duplicates exactly like the unique index does.
        fn record(&mut self, origin: Origin, delta: Decimal) {
            assert!(
                !(origin.is_unique() && self.movements.iter().any(|(o, _)| *o == origin)),
                "duplicate movement for origin"
            );
            self.movements.push((origin, delta));
            self.current_balance += delta;
        }

        /// Reverse = delete movement + apply negated delta.
        fn reverse(&mut self, origin: Origin) {
            let index = self
                .movements
                .iter()
                .position(|(o, _)| *o == origin)
                .expect("reversing a missing movement");
            let (_, delta) = self.movements.remove(index);
            self.current_balance -= delta;
        }

        fn assert_identity(&self) {
            assert_eq!(
                self.current_balance,
                balance_identity(
                    self.initial_balance,
                    self.movements.iter().map(|(_, d)| *d)
                ),
                "balance identity violated"
            );
        }
    }

    /// One settleable record (obligation or donation) in the simulation.
    struct SimRecord {
        origin: Origin,
        delta: Decimal,
        settled: bool,
    }

    impl SimRecord {
        fn obligation(kind: ObligationKind, amount: Decimal) -> Self {
            Self {
                origin: kind.origin(Uuid::new_v4()),
                delta: kind.direction().signed(amount),
                settled: false,
            }
        }

        fn donation(amount: Decimal) -> Self {
            Self {
                origin: Origin::donation(Uuid::new_v4()),
                delta: Direction::In.signed(amount),
                settled: false,
            }
        }

        /// Drives a settled-state change through the planner, applying the
        /// side effect to the ledger the way the repositories do.
        fn transition(&mut self, ledger: &mut LedgerSim, now_settled: bool) {
            match plan_transition(self.settled, now_settled) {
                SettlementAction::Record => ledger.record(self.origin, self.delta),
                SettlementAction::Reverse => ledger.reverse(self.origin),
                SettlementAction::None => {}
            }
            self.settled = now_settled;
        }

        /// Deletion reverses the movement when settled, then drops the row.
        fn delete(self, ledger: &mut LedgerSim) {
            if self.settled {
                ledger.reverse(self.origin);
            }
        }
    }

    #[test]
    fn test_settle_then_delete_restores_balance() {
        let mut ledger = LedgerSim::new(dec!(100));
        let mut receivable = SimRecord::obligation(ObligationKind::Receivable, dec!(200));

        receivable.transition(&mut ledger, true);
        assert_eq!(ledger.current_balance, dec!(300));
        ledger.assert_identity();

        receivable.delete(&mut ledger);
        assert_eq!(ledger.current_balance, dec!(100));
        assert!(ledger.movements.is_empty());
        ledger.assert_identity();
    }

    #[test]
    fn test_settle_then_reopen_round_trip() {
        let mut ledger = LedgerSim::new(dec!(50));
        let mut payable = SimRecord::obligation(ObligationKind::Payable, dec!(80));

        payable.transition(&mut ledger, true);
        assert_eq!(ledger.current_balance, dec!(-30));

        payable.transition(&mut ledger, false);
        assert_eq!(ledger.current_balance, dec!(50));
        assert!(ledger.movements.is_empty());
        ledger.assert_identity();
    }

    #[test]
    fn test_idempotent_re_settle() {
        let mut ledger = LedgerSim::new(dec!(0));
        let mut donation = SimRecord::donation(dec!(40));

        donation.transition(&mut ledger, true);
        donation.transition(&mut ledger, true);
        donation.transition(&mut ledger, true);

        assert_eq!(ledger.current_balance, dec!(40));
        assert_eq!(ledger.movements.len(), 1);
        ledger.assert_identity();
    }

    #[test]
    fn test_donation_unreceive_reverses() {
        let mut ledger = LedgerSim::new(dec!(10));
        let mut donation = SimRecord::donation(dec!(25));

        donation.transition(&mut ledger, true);
        donation.transition(&mut ledger, false);

        assert_eq!(ledger.current_balance, dec!(10));
        assert!(ledger.movements.is_empty());
    }

    #[test]
    fn test_failed_withdrawal_leaves_balance_untouched() {
        let mut ledger = LedgerSim::new(dec!(50));

        let result = check_adjustment(ledger.current_balance, dec!(-100));
        assert!(result.is_err());

        // The repository returns before any mutation; nothing to apply.
        assert_eq!(ledger.current_balance, dec!(50));
        ledger.assert_identity();
    }

    #[test]
    fn test_manual_adjustments_coexist() {
        // Multiple adjustments may share the non-unique adjustment origin.
        let mut ledger = LedgerSim::new(dec!(0));

        let (direction, amount) = check_adjustment(ledger.current_balance, dec!(120)).unwrap();
        ledger.record(Origin::adjustment(), direction.signed(amount));

        let (direction, amount) = check_adjustment(ledger.current_balance, dec!(-20)).unwrap();
        ledger.record(Origin::adjustment(), direction.signed(amount));

        assert_eq!(ledger.current_balance, dec!(100));
        assert_eq!(ledger.movements.len(), 2);
        ledger.assert_identity();
    }

    /// Strategy for positive two-decimal amounts.
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// One scripted step against a random record.
    #[derive(Debug, Clone, Copy)]
    enum Step {
        Settle(usize),
        Reopen(usize),
        Delete(usize),
    }

    fn step_strategy(records: usize) -> impl Strategy<Value = Step> {
        prop_oneof![
            (0..records).prop_map(Step::Settle),
            (0..records).prop_map(Step::Reopen),
            (0..records).prop_map(Step::Delete),
        ]
    }

    proptest! {
        /// Any interleaving of settle/reopen/delete over any mix of
        /// payables, receivables and donations preserves the balance
        /// identity and never leaves two movements for one origin.
        #[test]
        fn prop_workflows_preserve_identity(
            initial in (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2)),
            specs in prop::collection::vec((0u8..3, amount_strategy()), 1..8),
            steps in prop::collection::vec(step_strategy(8), 0..40),
        ) {
            let mut ledger = LedgerSim::new(initial);
            let mut records: Vec<Option<SimRecord>> = specs
                .into_iter()
                .map(|(kind, amount)| {
                    Some(match kind {
                        0 => SimRecord::obligation(ObligationKind::Payable, amount),
                        1 => SimRecord::obligation(ObligationKind::Receivable, amount),
                        _ => SimRecord::donation(amount),
                    })
                })
                .collect();

            for step in steps {
                match step {
                    Step::Settle(i) => {
                        if let Some(record) = records.get_mut(i).and_then(Option::as_mut) {
                            record.transition(&mut ledger, true);
                        }
                    }
                    Step::Reopen(i) => {
                        if let Some(record) = records.get_mut(i).and_then(Option::as_mut) {
                            record.transition(&mut ledger, false);
                        }
                    }
                    Step::Delete(i) => {
                        if let Some(slot) = records.get_mut(i)
                            && let Some(record) = slot.take()
                        {
                            record.delete(&mut ledger);
                        }
                    }
                }
                ledger.assert_identity();
            }

            // Every remaining movement belongs to a still-settled record.
            let settled_count = records
                .iter()
                .flatten()
                .filter(|r| r.settled)
                .count();
            prop_assert_eq!(ledger.movements.len(), settled_count);
        }

        /// Settling and deleting everything always lands back on the
        /// initial balance.
        #[test]
        fn prop_full_teardown_restores_initial(
            initial in (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2)),
            specs in prop::collection::vec((0u8..3, amount_strategy()), 1..8),
        ) {
            let mut ledger = LedgerSim::new(initial);
            let mut records: Vec<SimRecord> = specs
                .into_iter()
                .map(|(kind, amount)| match kind {
                    0 => SimRecord::obligation(ObligationKind::Payable, amount),
                    1 => SimRecord::obligation(ObligationKind::Receivable, amount),
                    _ => SimRecord::donation(amount),
                })
                .collect();

            for record in &mut records {
                record.transition(&mut ledger, true);
            }
            for record in records {
                record.delete(&mut ledger);
            }

            prop_assert_eq!(ledger.current_balance, initial);
            prop_assert!(ledger.movements.is_empty());
        }
    }
}
