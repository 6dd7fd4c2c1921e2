//! Ladle - a lightweight recipe catalog API server
//!
//! This library provides the core functionality for the Ladle backend:
//! session-token authentication, a shared paginated-search contract, and
//! the chef/recipe/ingredient services behind the HTTP API.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
