//! Ingredient API endpoints
//!
//! Handles HTTP requests for ingredients:
//! - GET /ingredients - List or search ingredients
//! - GET /ingredients/{id} - Get a single ingredient
//! - POST /ingredients - Create an ingredient
//! - PUT /ingredients/{id} - Update an ingredient
//! - DELETE /ingredients/{id} - Delete an ingredient

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{
    CreateIngredientInput, Ingredient, Listing, SearchParams, UpdateIngredientInput,
};
use crate::services::IngredientServiceError;

/// Request body for creating an ingredient
#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
}

/// Request body for updating an ingredient
#[derive(Debug, Deserialize)]
pub struct UpdateIngredientRequest {
    pub name: Option<String>,
}

/// Build public ingredient routes
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ingredients))
        .route("/{id}", get(get_ingredient))
}

/// Build protected ingredient routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_ingredient))
        .route("/{id}", put(update_ingredient).delete(delete_ingredient))
}

fn map_ingredient_error(e: IngredientServiceError) -> ApiError {
    match e {
        IngredientServiceError::NotFound(msg) => ApiError::not_found(msg),
        IngredientServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        IngredientServiceError::DuplicateName(msg) => ApiError::conflict(msg),
        IngredientServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}

/// GET /ingredients - List ingredients, optionally filtered and paginated
async fn list_ingredients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Listing<Ingredient>>, ApiError> {
    let listing = state
        .ingredient_service
        .list(&params)
        .await
        .map_err(map_ingredient_error)?;

    Ok(Json(listing))
}

/// GET /ingredients/{id} - Get an ingredient by id
async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ingredient>, ApiError> {
    let ingredient = state
        .ingredient_service
        .get_by_id(id)
        .await
        .map_err(map_ingredient_error)?
        .ok_or_else(|| ApiError::not_found("Ingredient not found"))?;

    Ok(Json(ingredient))
}

/// POST /ingredients - Create an ingredient
///
/// Requires authentication.
async fn create_ingredient(
    State(state): State<AppState>,
    Json(body): Json<CreateIngredientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ingredient = state
        .ingredient_service
        .create(CreateIngredientInput { name: body.name })
        .await
        .map_err(map_ingredient_error)?;

    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// PUT /ingredients/{id} - Update an ingredient
///
/// Requires authentication. Responds with 204 on success.
async fn update_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateIngredientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .ingredient_service
        .update(id, UpdateIngredientInput { name: body.name })
        .await
        .map_err(map_ingredient_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /ingredients/{id} - Delete an ingredient
///
/// Requires authentication. Responds with 204 on success.
async fn delete_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .ingredient_service
        .delete(id)
        .await
        .map_err(map_ingredient_error)?;

    Ok(StatusCode::NO_CONTENT)
}
