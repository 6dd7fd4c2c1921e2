//! Ingredient repository
//!
//! Database operations for ingredients.

use crate::models::{CreateIngredientInput, Ingredient, PageOptions, SortColumns, UpdateIngredientInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Sortable columns for paged ingredient queries
pub const INGREDIENT_SORT_COLUMNS: SortColumns =
    SortColumns::new(&[("id", "id"), ("name", "name")], "id");

/// Ingredient repository trait
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Create a new ingredient
    async fn create(&self, input: &CreateIngredientInput) -> Result<Ingredient>;

    /// Get ingredient by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Ingredient>>;

    /// Get ingredient by exact name
    async fn get_by_name(&self, name: &str) -> Result<Option<Ingredient>>;

    /// Update an ingredient
    async fn update(&self, id: i64, input: &UpdateIngredientInput) -> Result<Ingredient>;

    /// Delete an ingredient
    async fn delete(&self, id: i64) -> Result<()>;

    /// List ingredients, optionally filtered by a name term, in id order
    async fn search(&self, term: Option<&str>) -> Result<Vec<Ingredient>>;

    /// One page of ingredients matching the term, sorted per the options
    async fn search_page(&self, term: Option<&str>, options: &PageOptions)
        -> Result<Vec<Ingredient>>;

    /// Count ingredients matching the term
    async fn count_search(&self, term: Option<&str>) -> Result<i64>;
}

/// SQLx-based ingredient repository implementation
pub struct SqlxIngredientRepository {
    pool: SqlitePool,
}

impl SqlxIngredientRepository {
    /// Create a new SQLx ingredient repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn IngredientRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl IngredientRepository for SqlxIngredientRepository {
    async fn create(&self, input: &CreateIngredientInput) -> Result<Ingredient> {
        create_ingredient(&self.pool, input).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Ingredient>> {
        get_ingredient_by_id(&self.pool, id).await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Ingredient>> {
        get_ingredient_by_name(&self.pool, name).await
    }

    async fn update(&self, id: i64, input: &UpdateIngredientInput) -> Result<Ingredient> {
        update_ingredient(&self.pool, id, input).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete_ingredient(&self.pool, id).await
    }

    async fn search(&self, term: Option<&str>) -> Result<Vec<Ingredient>> {
        search_ingredients(&self.pool, term).await
    }

    async fn search_page(
        &self,
        term: Option<&str>,
        options: &PageOptions,
    ) -> Result<Vec<Ingredient>> {
        search_ingredients_page(&self.pool, term, options).await
    }

    async fn count_search(&self, term: Option<&str>) -> Result<i64> {
        count_ingredients(&self.pool, term).await
    }
}

async fn create_ingredient(pool: &SqlitePool, input: &CreateIngredientInput) -> Result<Ingredient> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO ingredients (name, created_at, updated_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create ingredient")?;

    Ok(Ingredient {
        id: result.last_insert_rowid(),
        name: input.name.clone(),
        created_at: now,
        updated_at: now,
    })
}

async fn get_ingredient_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Ingredient>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, created_at, updated_at
        FROM ingredients
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get ingredient by ID")?;

    Ok(row.map(|row| row_to_ingredient(&row)))
}

async fn get_ingredient_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Ingredient>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, created_at, updated_at
        FROM ingredients
        WHERE name = ?
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await
    .context("Failed to get ingredient by name")?;

    Ok(row.map(|row| row_to_ingredient(&row)))
}

async fn update_ingredient(
    pool: &SqlitePool,
    id: i64,
    input: &UpdateIngredientInput,
) -> Result<Ingredient> {
    // First get the existing ingredient
    let existing = get_ingredient_by_id(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Ingredient not found"))?;

    let now = Utc::now();
    let new_name = input.name.as_ref().unwrap_or(&existing.name);

    sqlx::query(
        r#"
        UPDATE ingredients
        SET name = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(new_name)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update ingredient")?;

    // Return the updated ingredient
    get_ingredient_by_id(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Ingredient not found after update"))
}

async fn delete_ingredient(pool: &SqlitePool, id: i64) -> Result<()> {
    // Note: recipe_ingredients entries will be deleted automatically due to ON DELETE CASCADE
    sqlx::query("DELETE FROM ingredients WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete ingredient")?;

    Ok(())
}

async fn search_ingredients(pool: &SqlitePool, term: Option<&str>) -> Result<Vec<Ingredient>> {
    let query = match term {
        Some(_) => {
            r#"
            SELECT id, name, created_at, updated_at
            FROM ingredients
            WHERE name LIKE ?
            ORDER BY id
            "#
        }
        None => {
            r#"
            SELECT id, name, created_at, updated_at
            FROM ingredients
            ORDER BY id
            "#
        }
    };

    let mut q = sqlx::query(query);
    if let Some(term) = term {
        q = q.bind(format!("%{}%", term));
    }

    let rows = q
        .fetch_all(pool)
        .await
        .context("Failed to search ingredients")?;

    Ok(rows.iter().map(row_to_ingredient).collect())
}

async fn search_ingredients_page(
    pool: &SqlitePool,
    term: Option<&str>,
    options: &PageOptions,
) -> Result<Vec<Ingredient>> {
    // sort_by comes from the allow-list, never from raw client input
    let query = format!(
        r#"
        SELECT id, name, created_at, updated_at
        FROM ingredients
        {}
        ORDER BY {} {}
        LIMIT ? OFFSET ?
        "#,
        if term.is_some() { "WHERE name LIKE ?" } else { "" },
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
        .context("Failed to search ingredients page")?;

    Ok(rows.iter().map(row_to_ingredient).collect())
}

async fn count_ingredients(pool: &SqlitePool, term: Option<&str>) -> Result<i64> {
    let query = match term {
        Some(_) => "SELECT COUNT(*) as count FROM ingredients WHERE name LIKE ?",
        None => "SELECT COUNT(*) as count FROM ingredients",
    };

    let mut q = sqlx::query(query);
    if let Some(term) = term {
        q = q.bind(format!("%{}%", term));
    }

    let row = q
        .fetch_one(pool)
        .await
        .context("Failed to count ingredients")?;

    Ok(row.get("count"))
}

fn row_to_ingredient(row: &sqlx::sqlite::SqliteRow) -> Ingredient {
    Ingredient {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
