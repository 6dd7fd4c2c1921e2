//! Recipe API endpoints
//!
//! Handles HTTP requests for the recipe catalog:
//! - GET /recipes - List or search recipes
//! - GET /recipes/{id} - Get a single recipe
//! - POST /recipes - Create a recipe (author taken from the session)
//! - PUT /recipes/{id} - Update a recipe
//! - DELETE /recipes/{id} - Delete a recipe

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedChef};
use crate::models::{
    Chef, CreateRecipeInput, Ingredient, Listing, RecipeDetail, SearchParams, UpdateRecipeInput,
};
use crate::services::RecipeServiceError;

/// Request body for creating a recipe
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub instructions: String,
    #[serde(default)]
    pub ingredient_ids: Vec<i64>,
}

/// Request body for updating a recipe
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub instructions: Option<String>,
    pub ingredient_ids: Option<Vec<i64>>,
}

/// Response for a single recipe with its author and ingredients
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub name: String,
    pub instructions: String,
    pub author: Chef,
    pub ingredients: Vec<Ingredient>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RecipeDetail> for RecipeResponse {
    fn from(detail: RecipeDetail) -> Self {
        Self {
            id: detail.recipe.id,
            name: detail.recipe.name,
            instructions: detail.recipe.instructions,
            author: detail.author,
            ingredients: detail.ingredients,
            created_at: detail.recipe.created_at,
            updated_at: detail.recipe.updated_at,
        }
    }
}

/// Build public recipe routes
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes))
        .route("/{id}", get(get_recipe))
}

/// Build protected recipe routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_recipe))
        .route("/{id}", put(update_recipe).delete(delete_recipe))
}

fn map_recipe_error(e: RecipeServiceError) -> ApiError {
    match e {
        RecipeServiceError::NotFound(msg) => ApiError::not_found(msg),
        RecipeServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        RecipeServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}

/// GET /recipes - List recipes, optionally filtered and paginated
async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Listing<RecipeResponse>>, ApiError> {
    let listing = state
        .recipe_service
        .list(&params)
        .await
        .map_err(map_recipe_error)?;

    Ok(Json(listing.map(Into::into)))
}

/// GET /recipes/{id} - Get a recipe by id
async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let detail = state
        .recipe_service
        .get_by_id(id)
        .await
        .map_err(map_recipe_error)?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))?;

    Ok(Json(detail.into()))
}

/// POST /recipes - Create a recipe
///
/// Requires authentication. The authenticated chef becomes the author,
/// regardless of anything in the request body.
async fn create_recipe(
    State(state): State<AppState>,
    chef: AuthenticatedChef,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreateRecipeInput {
        name: body.name,
        instructions: body.instructions,
        chef_id: chef.0.id,
        ingredient_ids: body.ingredient_ids,
    };

    let detail = state
        .recipe_service
        .create(input)
        .await
        .map_err(map_recipe_error)?;

    Ok((StatusCode::CREATED, Json(RecipeResponse::from(detail))))
}

/// PUT /recipes/{id} - Update a recipe
///
/// Requires authentication.
async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let input = UpdateRecipeInput {
        name: body.name,
        instructions: body.instructions,
        ingredient_ids: body.ingredient_ids,
    };

    let detail = state
        .recipe_service
        .update(id, input)
        .await
        .map_err(map_recipe_error)?;

    Ok(Json(detail.into()))
}

/// DELETE /recipes/{id} - Delete a recipe
///
/// Requires authentication.
async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .recipe_service
        .delete(id)
        .await
        .map_err(map_recipe_error)?;

    Ok(Json(serde_json::json!({ "message": "Recipe deleted successfully" })))
}
