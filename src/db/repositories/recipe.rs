//! Recipe repository
//!
//! Database operations for recipes and their ingredient links.
//!
//! This module provides:
//! - `RecipeRepository` trait defining the interface for recipe data access
//! - `SqlxRecipeRepository` implementing the trait on SQLite
//!
//! Writes that touch both `recipes` and `recipe_ingredients` run inside a
//! transaction so a failed link insert never leaves a half-written recipe.

use crate::models::{CreateRecipeInput, Ingredient, PageOptions, Recipe, SortColumns, UpdateRecipeInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Sortable columns for paged recipe queries
pub const RECIPE_SORT_COLUMNS: SortColumns = SortColumns::new(
    &[("id", "id"), ("name", "name"), ("createdAt", "created_at")],
    "name",
);

/// Recipe repository trait
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Create a new recipe with its ingredient links
    async fn create(&self, input: &CreateRecipeInput) -> Result<Recipe>;

    /// Get recipe by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Recipe>>;

    /// Update a recipe; `ingredient_ids`, when present, replaces the links
    async fn update(&self, id: i64, input: &UpdateRecipeInput) -> Result<Recipe>;

    /// Delete a recipe
    async fn delete(&self, id: i64) -> Result<()>;

    /// List recipes, optionally filtered by a term over name and
    /// instructions, in id order
    async fn search(&self, term: Option<&str>) -> Result<Vec<Recipe>>;

    /// One page of recipes matching the term, sorted per the options
    async fn search_page(&self, term: Option<&str>, options: &PageOptions) -> Result<Vec<Recipe>>;

    /// Count recipes matching the term
    async fn count_search(&self, term: Option<&str>) -> Result<i64>;

    /// The ingredients linked to a recipe, in id order
    async fn ingredients_for(&self, recipe_id: i64) -> Result<Vec<Ingredient>>;
}

/// SQLx-based recipe repository implementation
pub struct SqlxRecipeRepository {
    pool: SqlitePool,
}

impl SqlxRecipeRepository {
    /// Create a new SQLx recipe repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn RecipeRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl RecipeRepository for SqlxRecipeRepository {
    async fn create(&self, input: &CreateRecipeInput) -> Result<Recipe> {
        create_recipe(&self.pool, input).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        get_recipe_by_id(&self.pool, id).await
    }

    async fn update(&self, id: i64, input: &UpdateRecipeInput) -> Result<Recipe> {
        update_recipe(&self.pool, id, input).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        delete_recipe(&self.pool, id).await
    }

    async fn search(&self, term: Option<&str>) -> Result<Vec<Recipe>> {
        search_recipes(&self.pool, term).await
    }

    async fn search_page(&self, term: Option<&str>, options: &PageOptions) -> Result<Vec<Recipe>> {
        search_recipes_page(&self.pool, term, options).await
    }

    async fn count_search(&self, term: Option<&str>) -> Result<i64> {
        count_recipes(&self.pool, term).await
    }

    async fn ingredients_for(&self, recipe_id: i64) -> Result<Vec<Ingredient>> {
        ingredients_for_recipe(&self.pool, recipe_id).await
    }
}

async fn create_recipe(pool: &SqlitePool, input: &CreateRecipeInput) -> Result<Recipe> {
    let now = Utc::now();

    let mut tx = pool.begin().await.context("Failed to start transaction")?;

    let result = sqlx::query(
        r#"
        INSERT INTO recipes (name, instructions, chef_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.instructions)
    .bind(input.chef_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .context("Failed to create recipe")?;

    let id = result.last_insert_rowid();

    for ingredient_id in &input.ingredient_ids {
        sqlx::query("INSERT INTO recipe_ingredients (recipe_id, ingredient_id) VALUES (?, ?)")
            .bind(id)
            .bind(*ingredient_id)
            .execute(&mut *tx)
            .await
            .context("Failed to link ingredient")?;
    }

    tx.commit().await.context("Failed to commit recipe creation")?;

    Ok(Recipe {
        id,
        name: input.name.clone(),
        instructions: input.instructions.clone(),
        chef_id: input.chef_id,
        created_at: now,
        updated_at: now,
    })
}

async fn get_recipe_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Recipe>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, instructions, chef_id, created_at, updated_at
        FROM recipes
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get recipe by ID")?;

    Ok(row.map(|row| row_to_recipe(&row)))
}

async fn update_recipe(pool: &SqlitePool, id: i64, input: &UpdateRecipeInput) -> Result<Recipe> {
    // First get the existing recipe
    let existing = get_recipe_by_id(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Recipe not found"))?;

    let now = Utc::now();
    let new_name = input.name.as_ref().unwrap_or(&existing.name);
    let new_instructions = input.instructions.as_ref().unwrap_or(&existing.instructions);

    let mut tx = pool.begin().await.context("Failed to start transaction")?;

    sqlx::query(
        r#"
        UPDATE recipes
        SET name = ?, instructions = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(new_name)
    .bind(new_instructions)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await
    .context("Failed to update recipe")?;

    if let Some(ingredient_ids) = &input.ingredient_ids {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear ingredient links")?;

        for ingredient_id in ingredient_ids {
            sqlx::query("INSERT INTO recipe_ingredients (recipe_id, ingredient_id) VALUES (?, ?)")
                .bind(id)
                .bind(*ingredient_id)
                .execute(&mut *tx)
                .await
                .context("Failed to link ingredient")?;
        }
    }

    tx.commit().await.context("Failed to commit recipe update")?;

    // Return the updated recipe
    get_recipe_by_id(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Recipe not found after update"))
}

async fn delete_recipe(pool: &SqlitePool, id: i64) -> Result<()> {
    // Note: recipe_ingredients entries will be deleted automatically due to ON DELETE CASCADE
    sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete recipe")?;

    Ok(())
}

async fn search_recipes(pool: &SqlitePool, term: Option<&str>) -> Result<Vec<Recipe>> {
    let query = match term {
        Some(_) => {
            r#"
            SELECT id, name, instructions, chef_id, created_at, updated_at
            FROM recipes
            WHERE name LIKE ? OR instructions LIKE ?
            ORDER BY id
            "#
        }
        None => {
            r#"
            SELECT id, name, instructions, chef_id, created_at, updated_at
            FROM recipes
            ORDER BY id
            "#
        }
    };

    let mut q = sqlx::query(query);
    if let Some(term) = term {
        let pattern = format!("%{}%", term);
        q = q.bind(pattern.clone()).bind(pattern);
    }

    let rows = q.fetch_all(pool).await.context("Failed to search recipes")?;

    Ok(rows.iter().map(row_to_recipe).collect())
}

async fn search_recipes_page(
    pool: &SqlitePool,
    term: Option<&str>,
    options: &PageOptions,
) -> Result<Vec<Recipe>> {
    // sort_by comes from the allow-list, never from raw client input
    let query = format!(
        r#"
        SELECT id, name, instructions, chef_id, created_at, updated_at
        FROM recipes
        {}
        ORDER BY {} {}
        LIMIT ? OFFSET ?
        "#,
        if term.is_some() {
            "WHERE name LIKE ? OR instructions LIKE ?"
        } else {
            ""
        },
        options.sort_by(),
        options.sort_direction().as_sql(),
    );

    let mut q = sqlx::query(&query);
    if let Some(term) = term {
        let pattern = format!("%{}%", term);
        q = q.bind(pattern.clone()).bind(pattern);
    }

    let rows = q
        .bind(options.limit())
        .bind(options.offset())
        .fetch_all(pool)
        .await
        .context("Failed to search recipes page")?;

    Ok(rows.iter().map(row_to_recipe).collect())
}

async fn count_recipes(pool: &SqlitePool, term: Option<&str>) -> Result<i64> {
    let query = match term {
        Some(_) => {
            "SELECT COUNT(*) as count FROM recipes WHERE name LIKE ? OR instructions LIKE ?"
        }
        None => "SELECT COUNT(*) as count FROM recipes",
    };

    let mut q = sqlx::query(query);
    if let Some(term) = term {
        let pattern = format!("%{}%", term);
        q = q.bind(pattern.clone()).bind(pattern);
    }

    let row = q.fetch_one(pool).await.context("Failed to count recipes")?;

    Ok(row.get("count"))
}

async fn ingredients_for_recipe(pool: &SqlitePool, recipe_id: i64) -> Result<Vec<Ingredient>> {
    let rows = sqlx::query(
        r#"
        SELECT i.id, i.name, i.created_at, i.updated_at
        FROM ingredients i
        INNER JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
        WHERE ri.recipe_id = ?
        ORDER BY i.id
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
    .context("Failed to list recipe ingredients")?;

    Ok(rows
        .iter()
        .map(|row| Ingredient {
            id: row.get("id"),
            name: row.get("name"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
        .collect())
}

fn row_to_recipe(row: &sqlx::sqlite::SqliteRow) -> Recipe {
    Recipe {
        id: row.get("id"),
        name: row.get("name"),
        instructions: row.get("instructions"),
        chef_id: row.get("chef_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::models::SortDirection;

    async fn setup_test_repo() -> (SqlitePool, SqlxRecipeRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxRecipeRepository::new(pool.clone());
        (pool, repo)
    }

    /// Helper to create a chef for recipe tests
    async fn create_test_chef(pool: &SqlitePool) -> i64 {
        let result = sqlx::query("INSERT INTO chefs (username, email, password_hash) VALUES (?, ?, ?)")
            .bind("testchef")
            .bind("chef@example.com")
            .bind("hash123")
            .execute(pool)
            .await
            .expect("Failed to create test chef");
        result.last_insert_rowid()
    }

    /// Helper to create an ingredient for recipe tests
    async fn create_test_ingredient(pool: &SqlitePool, name: &str) -> i64 {
        let result = sqlx::query("INSERT INTO ingredients (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await
            .expect("Failed to create test ingredient");
        result.last_insert_rowid()
    }

    fn create_input(name: &str, chef_id: i64, ingredient_ids: Vec<i64>) -> CreateRecipeInput {
        CreateRecipeInput {
            name: name.to_string(),
            instructions: format!("How to make {}.", name),
            chef_id,
            ingredient_ids,
        }
    }

    #[tokio::test]
    async fn test_create_recipe() {
        let (pool, repo) = setup_test_repo().await;
        let chef_id = create_test_chef(&pool).await;

        let created = repo
            .create(&create_input("Pesto", chef_id, Vec::new()))
            .await
            .expect("Failed to create recipe");

        assert!(created.id > 0);
        assert_eq!(created.name, "Pesto");
        assert_eq!(created.chef_id, chef_id);
    }

    #[tokio::test]
    async fn test_create_recipe_links_ingredients() {
        let (pool, repo) = setup_test_repo().await;
        let chef_id = create_test_chef(&pool).await;
        let basil = create_test_ingredient(&pool, "Basil").await;
        let garlic = create_test_ingredient(&pool, "Garlic").await;

        let created = repo
            .create(&create_input("Pesto", chef_id, vec![basil, garlic]))
            .await
            .expect("Failed to create recipe");

        let ingredients = repo
            .ingredients_for(created.id)
            .await
            .expect("Failed to list ingredients");
        let names: Vec<&str> = ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Basil", "Garlic"]);
    }

    #[tokio::test]
    async fn test_create_recipe_with_bogus_ingredient_rolls_back() {
        let (pool, repo) = setup_test_repo().await;
        let chef_id = create_test_chef(&pool).await;

        let result = repo.create(&create_input("Pesto", chef_id, vec![999])).await;
        assert!(result.is_err());

        // The recipe insert must not survive the failed link
        let count = repo.count_search(None).await.expect("Failed to count");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_get_recipe_by_id() {
        let (pool, repo) = setup_test_repo().await;
        let chef_id = create_test_chef(&pool).await;
        let created = repo
            .create(&create_input("Pesto", chef_id, Vec::new()))
            .await
            .expect("Failed to create recipe");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get recipe")
            .expect("Recipe not found");

        assert_eq!(found.name, "Pesto");
        assert_eq!(found.instructions, "How to make Pesto.");
    }

    #[tokio::test]
    async fn test_get_recipe_by_id_not_found() {
        let (_pool, repo) = setup_test_repo().await;

        let found = repo.get_by_id(99999).await.expect("Failed to get recipe");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_recipe_merges_fields() {
        let (pool, repo) = setup_test_repo().await;
        let chef_id = create_test_chef(&pool).await;
        let created = repo
            .create(&create_input("Pesto", chef_id, Vec::new()))
            .await
            .expect("Failed to create recipe");

        let updated = repo
            .update(
                created.id,
                &UpdateRecipeInput {
                    instructions: Some("Blend basil with oil.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to update recipe");

        // Name untouched, instructions replaced
        assert_eq!(updated.name, "Pesto");
        assert_eq!(updated.instructions, "Blend basil with oil.");
    }

    #[tokio::test]
    async fn test_update_recipe_replaces_ingredient_links() {
        let (pool, repo) = setup_test_repo().await;
        let chef_id = create_test_chef(&pool).await;
        let basil = create_test_ingredient(&pool, "Basil").await;
        let garlic = create_test_ingredient(&pool, "Garlic").await;
        let created = repo
            .create(&create_input("Pesto", chef_id, vec![basil]))
            .await
            .expect("Failed to create recipe");

        repo.update(
            created.id,
            &UpdateRecipeInput {
                ingredient_ids: Some(vec![garlic]),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update recipe");

        let ingredients = repo
            .ingredients_for(created.id)
            .await
            .expect("Failed to list ingredients");
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].name, "Garlic");
    }

    #[tokio::test]
    async fn test_update_missing_recipe_fails() {
        let (_pool, repo) = setup_test_repo().await;

        let result = repo.update(99999, &UpdateRecipeInput::default()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_recipe() {
        let (pool, repo) = setup_test_repo().await;
        let chef_id = create_test_chef(&pool).await;
        let basil = create_test_ingredient(&pool, "Basil").await;
        let created = repo
            .create(&create_input("Pesto", chef_id, vec![basil]))
            .await
            .expect("Failed to create recipe");

        repo.delete(created.id).await.expect("Failed to delete recipe");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get recipe");
        assert!(found.is_none());

        let links = repo
            .ingredients_for(created.id)
            .await
            .expect("Failed to list ingredients");
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_name_and_instructions() {
        let (pool, repo) = setup_test_repo().await;
        let chef_id = create_test_chef(&pool).await;
        repo.create(&CreateRecipeInput {
            name: "Tomato Soup".to_string(),
            instructions: "Simmer tomatoes.".to_string(),
            chef_id,
            ingredient_ids: Vec::new(),
        })
        .await
        .expect("Failed to create recipe");
        repo.create(&CreateRecipeInput {
            name: "Bruschetta".to_string(),
            instructions: "Top bread with tomato.".to_string(),
            chef_id,
            ingredient_ids: Vec::new(),
        })
        .await
        .expect("Failed to create recipe");
        repo.create(&CreateRecipeInput {
            name: "Carbonara".to_string(),
            instructions: "No cream.".to_string(),
            chef_id,
            ingredient_ids: Vec::new(),
        })
        .await
        .expect("Failed to create recipe");

        // "tomato" appears in one name and one set of instructions
        let matches = repo
            .search(Some("tomato"))
            .await
            .expect("Failed to search recipes");

        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn test_search_page_and_count() {
        let (pool, repo) = setup_test_repo().await;
        let chef_id = create_test_chef(&pool).await;
        for name in ["Arrabbiata", "Bolognese", "Cacciatore", "Diavola", "Erbazzone"] {
            repo.create(&create_input(name, chef_id, Vec::new()))
                .await
                .expect("Failed to create recipe");
        }

        let options = PageOptions::new(2, 2, None, SortDirection::Asc, &RECIPE_SORT_COLUMNS)
            .expect("options should build");
        let page = repo
            .search_page(None, &options)
            .await
            .expect("Failed to search page");

        // Default sort column for recipes is name
        let names: Vec<&str> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cacciatore", "Diavola"]);

        let total = repo.count_search(None).await.expect("Failed to count");
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn test_search_page_descending() {
        let (pool, repo) = setup_test_repo().await;
        let chef_id = create_test_chef(&pool).await;
        for name in ["Arrabbiata", "Bolognese", "Cacciatore"] {
            repo.create(&create_input(name, chef_id, Vec::new()))
                .await
                .expect("Failed to create recipe");
        }

        let options = PageOptions::new(1, 10, Some("name"), SortDirection::Desc, &RECIPE_SORT_COLUMNS)
            .expect("options should build");
        let page = repo
            .search_page(None, &options)
            .await
            .expect("Failed to search page");

        let names: Vec<&str> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cacciatore", "Bolognese", "Arrabbiata"]);
    }
}
