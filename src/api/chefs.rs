//! Chef API endpoints
//!
//! Handles HTTP requests for chefs:
//! - GET /chefs - List or search chefs
//! - GET /chefs/{id} - Get a single chef
//! - DELETE /chefs/{id} - Delete a chef

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{Chef, Listing, SearchParams};
use crate::services::ChefServiceError;

/// Build public chef routes
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_chefs))
        .route("/{id}", get(get_chef))
}

/// Build protected chef routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/{id}", delete(delete_chef))
}

/// GET /chefs - List chefs, optionally filtered and paginated
async fn list_chefs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Listing<Chef>>, ApiError> {
    let listing = state
        .chef_service
        .list(&params)
        .await
        .map_err(|e| match e {
            ChefServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            _ => ApiError::internal_error(e.to_string()),
        })?;

    Ok(Json(listing))
}

/// GET /chefs/{id} - Get a chef by id
async fn get_chef(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Chef>, ApiError> {
    let chef = state
        .chef_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Chef not found"))?;

    Ok(Json(chef))
}

/// DELETE /chefs/{id} - Delete a chef
///
/// Requires authentication. Recipes authored by the chef are removed by
/// the schema's cascade rules.
async fn delete_chef(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .chef_service
        .delete(id)
        .await
        .map_err(|e| match e {
            ChefServiceError::NotFound(msg) => ApiError::not_found(msg),
            _ => ApiError::internal_error(e.to_string()),
        })?;

    Ok(StatusCode::NO_CONTENT)
}
