//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints for the Ladle recipe
//! catalog. It includes:
//! - Auth API endpoints (register, login, logout)
//! - Chef API endpoints
//! - Recipe API endpoints
//! - Ingredient API endpoints
//!
//! Read endpoints are public. Every mutation sits behind the session
//! auth gate.

pub mod auth;
pub mod chefs;
pub mod ingredients;
pub mod middleware;
pub mod recipes;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, AuthenticatedChef};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Protected routes (mutations and logout)
    let protected_routes = Router::new()
        .merge(auth::protected_router())
        .nest("/chefs", chefs::protected_router())
        .nest("/recipes", recipes::protected_router())
        .nest("/ingredients", ingredients::protected_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .merge(auth::public_router())
        .nest("/chefs", chefs::public_router())
        .nest("/recipes", recipes::public_router())
        .nest("/ingredients", ingredients::public_router())
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        // Clients read the session token off the login response header
        .expose_headers([header::AUTHORIZATION]);

    Router::new()
        .merge(build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
