//! Authentication API endpoints
//!
//! Handles HTTP requests for chef authentication:
//! - POST /register - Register a new chef
//! - POST /login - Log in and receive a session token
//! - POST /logout - Revoke the current session

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedChef};
use crate::models::Chef;
use crate::services::{AuthServiceError, LoginInput, RegisterInput};

/// Request body for chef registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for chef login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for successful authentication
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub chef: Chef,
    pub token: String,
}

/// Build public auth routes (no auth required)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Build protected auth routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/logout", post(logout))
}

/// POST /register - Register a new chef
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = RegisterInput::new(body.username, body.email, body.password);

    let chef = state
        .auth_service
        .register(input)
        .await
        .map_err(|e| match e {
            AuthServiceError::ValidationError(msg) => {
                ApiError::validation_error(format!("Invalid input: {}", msg))
            }
            AuthServiceError::ChefExists(msg) => ApiError::conflict(msg),
            _ => ApiError::internal_error(e.to_string()),
        })?;

    Ok((StatusCode::CREATED, Json(chef)))
}

/// POST /login - Log in with username and password
///
/// The issued token is returned both in the response body and in an
/// `Authorization: Bearer <token>` response header.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = LoginInput::new(body.username, body.password);

    let (chef, session) = state
        .auth_service
        .login(input)
        .await
        .map_err(|e| match e {
            AuthServiceError::AuthenticationError(msg) => ApiError::unauthorized(msg),
            _ => ApiError::internal_error(e.to_string()),
        })?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", session.token))
            .map_err(|e| ApiError::internal_error(format!("Invalid session token: {}", e)))?,
    );

    Ok((
        response_headers,
        Json(AuthResponse {
            chef,
            token: session.token,
        }),
    ))
}

/// POST /logout - Revoke the session presented in the request
///
/// Requires authentication.
async fn logout(
    State(state): State<AppState>,
    _chef: AuthenticatedChef,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    if state.auth_service.logout(token).await {
        Ok(Json(serde_json::json!({ "message": "Logged out successfully" })))
    } else {
        Err(ApiError::unauthorized("Unauthorized"))
    }
}
