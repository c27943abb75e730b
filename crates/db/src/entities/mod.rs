//! `SeaORM` entity definitions.

pub mod accounts;
pub mod beneficiaries;
pub mod categories;
pub mod counterparties;
pub mod donations;
pub mod movements;
pub mod obligations;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod users;
