//! Category lookup-list routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    middleware::AuthUser,
    routes::{app_error_response, repo_error_response},
};
use cofre_db::{CategoryRepository, entities::sea_orm_active_enums::CategoryKind};
use cofre_shared::AppError;

/// Creates the category routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", delete(deactivate_category))
}

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Which lookup list to read.
    pub kind: String,
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Which lookup list the category belongs to.
    pub kind: String,
    /// Name (unique per kind).
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

fn string_to_category_kind(s: &str) -> Option<CategoryKind> {
    match s.to_lowercase().as_str() {
        "help" => Some(CategoryKind::Help),
        "payable" => Some(CategoryKind::Payable),
        "receivable" => Some(CategoryKind::Receivable),
        "payment_method" => Some(CategoryKind::PaymentMethod),
        "receivable_source" => Some(CategoryKind::ReceivableSource),
        _ => None,
    }
}

fn invalid_kind_response() -> axum::response::Response {
    app_error_response(&AppError::Validation(
        "Invalid category kind. Must be one of: help, payable, receivable, \
         payment_method, receivable_source"
            .to_string(),
    ))
}

/// GET `/categories?kind=payable` - List the active categories of one kind.
async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListCategoriesQuery>,
) -> impl IntoResponse {
    let Some(kind) = string_to_category_kind(&query.kind) else {
        return invalid_kind_response();
    };

    let repo = CategoryRepository::new((*state.db).clone());
    match repo.list_active(kind).await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => repo_error_response!(e),
    }
}

/// POST `/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    let Some(kind) = string_to_category_kind(&payload.kind) else {
        return invalid_kind_response();
    };

    let repo = CategoryRepository::new((*state.db).clone());
    match repo.create(kind, payload.name, payload.description).await {
        Ok(category) => {
            info!(category_id = %category.id, name = %category.name, "Category created");
            (StatusCode::CREATED, Json(category)).into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}

/// DELETE `/categories/{id}` - Deactivate a category.
async fn deactivate_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.deactivate(id).await {
        Ok(()) => {
            info!(category_id = %id, "Category deactivated");
            (
                StatusCode::OK,
                Json(serde_json::json!({ "message": "Category deactivated" })),
            )
                .into_response()
        }
        Err(e) => repo_error_response!(e),
    }
}
