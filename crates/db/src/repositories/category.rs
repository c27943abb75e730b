//! Category repository: the consolidated lookup lists.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{categories, sea_orm_active_enums::CategoryKind};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Name already in use within the kind.
    #[error("Category '{0}' already exists")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl CategoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::DuplicateName(_) => "DUPLICATE_NAME",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::DuplicateName(_) => 409,
            Self::Database(_) => 500,
        }
    }
}

/// Category repository.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category; names are unique per kind.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the name already exists within the kind.
    pub async fn create(
        &self,
        kind: CategoryKind,
        name: String,
        description: Option<String>,
    ) -> Result<categories::Model, CategoryError> {
        let existing = categories::Entity::find()
            .filter(categories::Column::Kind.eq(kind))
            .filter(categories::Column::Name.eq(&name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CategoryError::DuplicateName(name));
        }

        let row = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(kind),
            name: Set(name),
            description: Set(description),
            active: Set(true),
            created_at: Set(Utc::now().into()),
        };
        Ok(row.insert(&self.db).await?)
    }

    /// Lists the active categories of one kind, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(
        &self,
        kind: CategoryKind,
    ) -> Result<Vec<categories::Model>, CategoryError> {
        Ok(categories::Entity::find()
            .filter(categories::Column::Kind.eq(kind))
            .filter(categories::Column::Active.eq(true))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Deactivates a category (soft delete).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category does not exist.
    pub async fn deactivate(&self, id: Uuid) -> Result<(), CategoryError> {
        let existing = categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        let mut active: categories::ActiveModel = existing.into();
        active.active = Set(false);
        active.update(&self.db).await?;
        Ok(())
    }
}
