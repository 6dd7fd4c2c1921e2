//! Chef repository
//!
//! Database operations for chefs.
//!
//! This module provides:
//! - `ChefRepository` trait defining the interface for chef data access
//! - `SqlxChefRepository` implementing the trait on SQLite

use crate::models::{Chef, PageOptions, SortColumns};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Sortable columns for paged chef queries
pub const CHEF_SORT_COLUMNS: SortColumns = SortColumns::new(
    &[("id", "id"), ("username", "username"), ("email", "email")],
    "id",
);

/// Chef repository trait
#[async_trait]
pub trait ChefRepository: Send + Sync {
    /// Create a new chef
    async fn create(&self, chef: &Chef) -> Result<Chef>;

    /// Get chef by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Chef>>;

    /// Get chef by username
    async fn get_by_username(&self, username: &str) -> Result<Option<Chef>>;

    /// Get chef by email
    async fn get_by_email(&self, email: &str) -> Result<Option<Chef>>;

    /// Delete a chef
    async fn delete(&self, id: i64) -> Result<()>;

    /// List chefs, optionally filtered by a username term, in id order
    async fn search(&self, term: Option<&str>) -> Result<Vec<Chef>>;

    /// One page of chefs matching the term, sorted per the options
    async fn search_page(&self, term: Option<&str>, options: &PageOptions) -> Result<Vec<Chef>>;

    /// Count chefs matching the term
    async fn count_search(&self, term: Option<&str>) -> Result<i64>;
}

/// SQLx-based chef repository implementation
pub struct SqlxChefRepository {
    pool: SqlitePool,
}

impl SqlxChefRepository {
    /// Create a new SQLx chef repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn ChefRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ChefRepository for SqlxChefRepository {
    async fn create(&self, chef: &Chef) -> Result<Chef> {
        create_chef(&self.pool, chef).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Chef>> {
        get_chef_by_id(&self.pool, id).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Chef>> {
        get_chef_by_username(&self.pool, username).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Chef>> {
        get_chef_by_email(&self.pool, email).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete_chef(&self.pool, id).await
    }

    async fn search(&self, term: Option<&str>) -> Result<Vec<Chef>> {
        search_chefs(&self.pool, term).await
    }

    async fn search_page(&self, term: Option<&str>, options: &PageOptions) -> Result<Vec<Chef>> {
        search_chefs_page(&self.pool, term, options).await
    }

    async fn count_search(&self, term: Option<&str>) -> Result<i64> {
        count_chefs(&self.pool, term).await
    }
}

async fn create_chef(pool: &SqlitePool, chef: &Chef) -> Result<Chef> {
    let result = sqlx::query(
        r#"
        INSERT INTO chefs (username, email, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&chef.username)
    .bind(&chef.email)
    .bind(&chef.password_hash)
    .bind(chef.created_at)
    .bind(chef.updated_at)
    .execute(pool)
    .await
    .context("Failed to create chef")?;

    let id = result.last_insert_rowid();

    Ok(Chef {
        id,
        username: chef.username.clone(),
        email: chef.email.clone(),
        password_hash: chef.password_hash.clone(),
        created_at: chef.created_at,
        updated_at: chef.updated_at,
    })
}

async fn get_chef_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Chef>> {
    let row = sqlx::query(
        r#"
        SELECT id, username, email, password_hash, created_at, updated_at
        FROM chefs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get chef by ID")?;

    Ok(row.map(|row| row_to_chef(&row)))
}

async fn get_chef_by_username(pool: &SqlitePool, username: &str) -> Result<Option<Chef>> {
    let row = sqlx::query(
        r#"
        SELECT id, username, email, password_hash, created_at, updated_at
        FROM chefs
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .context("Failed to get chef by username")?;

    Ok(row.map(|row| row_to_chef(&row)))
}

async fn get_chef_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Chef>> {
    let row = sqlx::query(
        r#"
        SELECT id, username, email, password_hash, created_at, updated_at
        FROM chefs
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .context("Failed to get chef by email")?;

    Ok(row.map(|row| row_to_chef(&row)))
}

async fn delete_chef(pool: &SqlitePool, id: i64) -> Result<()> {
    // The chef's recipes go with them via ON DELETE CASCADE
    sqlx::query("DELETE FROM chefs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete chef")?;

    Ok(())
}

async fn search_chefs(pool: &SqlitePool, term: Option<&str>) -> Result<Vec<Chef>> {
    let query = match term {
        Some(_) => {
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM chefs
            WHERE username LIKE ?
            ORDER BY id
            "#
        }
        None => {
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM chefs
            ORDER BY id
            "#
        }
    };

    let mut q = sqlx::query(query);
    if let Some(term) = term {
        q = q.bind(format!("%{}%", term));
    }

    let rows = q.fetch_all(pool).await.context("Failed to search chefs")?;

    Ok(rows.iter().map(row_to_chef).collect())
}

async fn search_chefs_page(
    pool: &SqlitePool,
    term: Option<&str>,
    options: &PageOptions,
) -> Result<Vec<Chef>> {
    // sort_by comes from the allow-list, never from raw client input
    let query = format!(
        r#"
        SELECT id, username, email, password_hash, created_at, updated_at
        FROM chefs
        {}
        ORDER BY {} {}
        LIMIT ? OFFSET ?
        "#,
        if term.is_some() { "WHERE username LIKE ?" } else { "" },
        options.sort_by(),
        options.sort_direction().as_sql(),
    );

    let mut q = sqlx::query(&query);
    if let Some(term) = term {
        q = q.bind(format!("%{}%", term));
    }

    let rows = q
        .bind(options.limit())
        .bind(options.offset())
        .fetch_all(pool)
        .await
        .context("Failed to search chefs page")?;

    Ok(rows.iter().map(row_to_chef).collect())
}

async fn count_chefs(pool: &SqlitePool, term: Option<&str>) -> Result<i64> {
    let query = match term {
        Some(_) => "SELECT COUNT(*) as count FROM chefs WHERE username LIKE ?",
        None => "SELECT COUNT(*) as count FROM chefs",
    };

    let mut q = sqlx::query(query);
    if let Some(term) = term {
        q = q.bind(format!("%{}%", term));
    }

    let row = q.fetch_one(pool).await.context("Failed to count chefs")?;

    Ok(row.get("count"))
}

fn row_to_chef(row: &sqlx::sqlite::SqliteRow) -> Chef {
    Chef {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
