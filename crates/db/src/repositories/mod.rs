//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! The movement/obligation/donation repositories compose the core engine's
//! settlement planning with transactional persistence.

pub mod account;
pub mod category;
pub mod dashboard;
pub mod donation;
pub mod movement;
pub mod obligation;
pub mod party;
pub mod session;
pub mod user;

#[cfg(test)]
mod ledger_workflow_tests;

pub use account::{AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use category::{CategoryError, CategoryRepository};
pub use dashboard::{AccountBalanceSummary, DashboardRepository, DashboardSummary};
pub use donation::{CreateDonationInput, DonationError, DonationRepository, UpdateDonationInput};
pub use movement::{MovementError, MovementFilter, MovementRepository, ResetSummary};
pub use obligation::{
    CreateObligationInput, ObligationError, ObligationFilter, ObligationRepository,
    UpdateObligationInput,
};
pub use party::{
    BeneficiaryInput, BeneficiaryRepository, CounterpartyInput, CounterpartyRepository, PartyError,
};
pub use session::{NewSession, SessionRepository};
pub use user::{UserError, UserRepository};
