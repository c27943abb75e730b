//! Counterparty and beneficiary repositories: plain CRUD.

use chrono::Utc;
use cofre_shared::types::{Paginated, PaginationParams};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{beneficiaries, counterparties, sea_orm_active_enums::CounterpartyKind};

/// Error types for party operations.
#[derive(Debug, thiserror::Error)]
pub enum PartyError {
    /// Record not found.
    #[error("Not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl PartyError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }
}

/// Input for creating or replacing a counterparty.
#[derive(Debug, Clone)]
pub struct CounterpartyInput {
    /// Supplier or donor.
    pub kind: CounterpartyKind,
    /// Display name.
    pub name: String,
    /// National tax id.
    pub tax_id: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Counterparty repository.
#[derive(Debug, Clone)]
pub struct CounterpartyRepository {
    db: DatabaseConnection,
}

impl CounterpartyRepository {
    /// Creates a new counterparty repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a counterparty.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CounterpartyInput,
    ) -> Result<counterparties::Model, PartyError> {
        let now = Utc::now();
        let row = counterparties::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(input.kind),
            name: Set(input.name),
            tax_id: Set(input.tax_id),
            phone: Set(input.phone),
            note: Set(input.note),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        Ok(row.insert(&self.db).await?)
    }

    /// Lists counterparties by name with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        params: PaginationParams,
    ) -> Result<Paginated<counterparties::Model>, PartyError> {
        let params = params.clamped();
        let query = counterparties::Entity::find();
        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_asc(counterparties::Column::Name)
            .offset(params.offset())
            .limit(params.limit)
            .all(&self.db)
            .await?;
        Ok(Paginated::new(items, total, params))
    }

    /// Finds a counterparty by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the counterparty does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<counterparties::Model, PartyError> {
        counterparties::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PartyError::NotFound(id))
    }

    /// Replaces a counterparty's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the counterparty does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: CounterpartyInput,
    ) -> Result<counterparties::Model, PartyError> {
        let existing = self.find_by_id(id).await?;

        let mut active: counterparties::ActiveModel = existing.into();
        active.kind = Set(input.kind);
        active.name = Set(input.name);
        active.tax_id = Set(input.tax_id);
        active.phone = Set(input.phone);
        active.note = Set(input.note);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a counterparty.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the counterparty does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), PartyError> {
        let existing = self.find_by_id(id).await?;
        counterparties::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

/// Input for creating or replacing a beneficiary.
#[derive(Debug, Clone)]
pub struct BeneficiaryInput {
    /// Display name.
    pub name: String,
    /// National tax id.
    pub tax_id: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Responsible guardian, for minors.
    pub guardian_name: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
}

/// Beneficiary repository.
#[derive(Debug, Clone)]
pub struct BeneficiaryRepository {
    db: DatabaseConnection,
}

impl BeneficiaryRepository {
    /// Creates a new beneficiary repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a beneficiary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: BeneficiaryInput) -> Result<beneficiaries::Model, PartyError> {
        let now = Utc::now();
        let row = beneficiaries::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            tax_id: Set(input.tax_id),
            phone: Set(input.phone),
            guardian_name: Set(input.guardian_name),
            note: Set(input.note),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        Ok(row.insert(&self.db).await?)
    }

    /// Lists beneficiaries by name with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        params: PaginationParams,
    ) -> Result<Paginated<beneficiaries::Model>, PartyError> {
        let params = params.clamped();
        let query = beneficiaries::Entity::find();
        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_asc(beneficiaries::Column::Name)
            .offset(params.offset())
            .limit(params.limit)
            .all(&self.db)
            .await?;
        Ok(Paginated::new(items, total, params))
    }

    /// Finds a beneficiary by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the beneficiary does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<beneficiaries::Model, PartyError> {
        beneficiaries::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PartyError::NotFound(id))
    }

    /// Replaces a beneficiary's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the beneficiary does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: BeneficiaryInput,
    ) -> Result<beneficiaries::Model, PartyError> {
        let existing = self.find_by_id(id).await?;

        let mut active: beneficiaries::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.tax_id = Set(input.tax_id);
        active.phone = Set(input.phone);
        active.guardian_name = Set(input.guardian_name);
        active.note = Set(input.note);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a beneficiary.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the beneficiary does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), PartyError> {
        let existing = self.find_by_id(id).await?;
        beneficiaries::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
