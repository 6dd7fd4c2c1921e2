//! Database layer
//!
//! This module provides storage for the Ladle recipe catalog on SQLite,
//! chosen for single-binary deployment. It contains:
//! - Connection pool creation (`pool`)
//! - Code-based migrations embedded in the binary (`migrations`)
//! - Repository traits and their SQLx implementations (`repositories`)

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
