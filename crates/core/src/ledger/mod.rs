//! Movement rules and the settlement state machine.
//!
//! This module is the heart of the ledger consistency engine: it decides
//! when a status change must record or reverse a movement, validates
//! amounts, composes movement descriptions, and provides the balance
//! arithmetic the persistence layer applies transactionally.

mod balance;
mod error;
mod settlement;
mod types;

pub use balance::{balance_identity, check_adjustment};
pub use error::LedgerError;
pub use settlement::{
    DONATION_CATEGORY, SettlementAction, describe_donation, describe_payable, describe_receivable,
    plan_transition,
};
pub use types::{Direction, MovementDraft, ObligationKind, Origin, OriginKind};
