//! Database connection pool
//!
//! The catalog runs on SQLite for single-binary deployment. This module
//! normalizes the configured URL, creates the pool, and turns on the
//! pragmas the schema relies on.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Create a SQLite connection pool.
///
/// Accepts `:memory:`, plain file paths, and `sqlite:` URLs. File-backed
/// databases are created on first use, along with any missing parent
/// directories.
pub async fn create_pool(url: &str) -> Result<SqlitePool> {
    // Ensure the database directory exists for file-based SQLite
    if !url.starts_with(":memory:") && !url.starts_with("sqlite::memory:") {
        // Extract the path from the URL
        let path = if url.starts_with("sqlite:") {
            url.trim_start_matches("sqlite:")
        } else {
            url
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
            }
        }
    }

    // Build the connection URL with create=true for file-based databases
    let connection_url = if url.starts_with("sqlite:") {
        // If it already has options, don't modify
        if url.contains('?') {
            url.to_string()
        } else {
            format!("{}?mode=rwc", url)
        }
    } else if url == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        // File path - add sqlite: prefix and create mode
        format!("sqlite:{}?mode=rwc", url)
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(20)
        .connect(&connection_url)
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", url))?;

    // Foreign keys are off by default in SQLite; the schema depends on them
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .context("Failed to enable foreign keys")?;

    Ok(pool)
}

/// Create a SQLite in-memory database pool for testing
pub async fn create_test_pool() -> Result<SqlitePool> {
    create_pool(":memory:").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_pool_creation() {
        let pool = create_test_pool().await.expect("Failed to create pool");

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("Ping should succeed");
    }

    #[tokio::test]
    async fn test_pool_execute() {
        let pool = create_test_pool().await.expect("Failed to create pool");

        sqlx::query("CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT)")
            .execute(&pool)
            .await
            .expect("Create table should succeed");

        let result = sqlx::query("INSERT INTO test (name) VALUES ('hello')")
            .execute(&pool)
            .await
            .expect("Insert should succeed");
        assert_eq!(result.rows_affected(), 1);
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = create_test_pool().await.expect("Failed to create pool");

        let row: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .expect("Pragma query should succeed");
        assert_eq!(row.0, 1);
    }

    #[tokio::test]
    async fn test_file_pool_creates_database() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("test.db");
        let url = db_path.to_str().expect("Path should be valid UTF-8");

        let pool = create_pool(url).await.expect("Failed to create file pool");
        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("Ping should succeed");
        pool.close().await;

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_file_pool_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("nested").join("dirs").join("test.db");
        let url = db_path.to_str().expect("Path should be valid UTF-8");

        let pool = create_pool(url).await.expect("Failed to create file pool");
        pool.close().await;

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_sqlite_prefixed_url() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("prefixed.db");
        let url = format!("sqlite:{}", db_path.to_str().expect("Path should be valid UTF-8"));

        let pool = create_pool(&url).await.expect("Failed to create file pool");
        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("Ping should succeed");
        pool.close().await;
    }
}
