//! Recipe service
//!
//! Implements business logic for recipes:
//! - Listing and searching recipes (plain or paged), matching the term
//!   against names and instructions
//! - Create, update, delete with ingredient-link validation
//! - Composing the full recipe view: the recipe, its author, and its
//!   ingredients

use crate::db::repositories::{
    ChefRepository, IngredientRepository, RecipeRepository, RECIPE_SORT_COLUMNS,
};
use crate::models::{
    CreateRecipeInput, Listing, Page, QueryPlan, Recipe, RecipeDetail, SearchParams,
    UpdateRecipeInput,
};
use anyhow::Context;
use std::sync::Arc;

/// Error types for recipe service operations
#[derive(Debug, thiserror::Error)]
pub enum RecipeServiceError {
    /// Recipe not found
    #[error("Recipe not found: {0}")]
    NotFound(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Recipe service for managing recipes and their ingredient links
pub struct RecipeService {
    recipe_repo: Arc<dyn RecipeRepository>,
    chef_repo: Arc<dyn ChefRepository>,
    ingredient_repo: Arc<dyn IngredientRepository>,
}

impl RecipeService {
    /// Create a new recipe service
    pub fn new(
        recipe_repo: Arc<dyn RecipeRepository>,
        chef_repo: Arc<dyn ChefRepository>,
        ingredient_repo: Arc<dyn IngredientRepository>,
    ) -> Self {
        Self {
            recipe_repo,
            chef_repo,
            ingredient_repo,
        }
    }

    /// List recipes according to the search parameters
    ///
    /// The term matches against recipe names and instructions. Without
    /// paging parameters this returns a plain list; as soon as `page` or
    /// `pageSize` appears, the result is a page with totals.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if `page` or `pageSize` is zero
    /// - `InternalError` for database errors
    pub async fn list(
        &self,
        params: &SearchParams,
    ) -> Result<Listing<RecipeDetail>, RecipeServiceError> {
        let plan = QueryPlan::from_params(params, &RECIPE_SORT_COLUMNS)
            .map_err(|e| RecipeServiceError::ValidationError(e.to_string()))?;

        match plan {
            QueryPlan::Full => {
                let recipes = self
                    .recipe_repo
                    .search(None)
                    .await
                    .context("Failed to list recipes")?;
                Ok(Listing::Plain(self.compose_details(recipes).await?))
            }
            QueryPlan::Filtered(term) => {
                let recipes = self
                    .recipe_repo
                    .search(Some(&term))
                    .await
                    .context("Failed to search recipes")?;
                Ok(Listing::Plain(self.compose_details(recipes).await?))
            }
            QueryPlan::Paged { term, options } => {
                let term = term.as_deref();
                let recipes = self
                    .recipe_repo
                    .search_page(term, &options)
                    .await
                    .context("Failed to search recipes page")?;
                let total = self
                    .recipe_repo
                    .count_search(term)
                    .await
                    .context("Failed to count recipes")?;
                let items = self.compose_details(recipes).await?;
                Ok(Listing::Paged(Page::new(items, total, &options)))
            }
        }
    }

    /// Get recipe by ID, with its author and ingredients
    pub async fn get_by_id(&self, id: i64) -> Result<Option<RecipeDetail>, RecipeServiceError> {
        let recipe = self
            .recipe_repo
            .get_by_id(id)
            .await
            .context("Failed to get recipe by ID")?;

        match recipe {
            Some(recipe) => Ok(Some(self.compose_detail(recipe).await?)),
            None => Ok(None),
        }
    }

    /// Create a new recipe
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the name or instructions are empty, or an
    ///   ingredient ID does not exist
    /// - `InternalError` for database errors
    pub async fn create(
        &self,
        input: CreateRecipeInput,
    ) -> Result<RecipeDetail, RecipeServiceError> {
        if input.name.trim().is_empty() {
            return Err(RecipeServiceError::ValidationError(
                "Recipe name cannot be empty".to_string(),
            ));
        }
        if input.instructions.trim().is_empty() {
            return Err(RecipeServiceError::ValidationError(
                "Recipe instructions cannot be empty".to_string(),
            ));
        }

        self.validate_ingredient_ids(&input.ingredient_ids).await?;

        let recipe = self
            .recipe_repo
            .create(&input)
            .await
            .context("Failed to create recipe")?;

        self.compose_detail(recipe).await
    }

    /// Update a recipe
    ///
    /// Fields left out of the input are kept; `ingredient_ids`, when
    /// present, replaces the recipe's ingredient links.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no recipe has this ID
    /// - `ValidationError` if a provided field is empty or an ingredient ID
    ///   does not exist
    /// - `InternalError` for database errors
    pub async fn update(
        &self,
        id: i64,
        input: UpdateRecipeInput,
    ) -> Result<RecipeDetail, RecipeServiceError> {
        self.recipe_repo
            .get_by_id(id)
            .await
            .context("Failed to get recipe")?
            .ok_or_else(|| RecipeServiceError::NotFound("Recipe not found".to_string()))?;

        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(RecipeServiceError::ValidationError(
                    "Recipe name cannot be empty".to_string(),
                ));
            }
        }
        if let Some(instructions) = &input.instructions {
            if instructions.trim().is_empty() {
                return Err(RecipeServiceError::ValidationError(
                    "Recipe instructions cannot be empty".to_string(),
                ));
            }
        }
        if let Some(ingredient_ids) = &input.ingredient_ids {
            self.validate_ingredient_ids(ingredient_ids).await?;
        }

        let recipe = self
            .recipe_repo
            .update(id, &input)
            .await
            .context("Failed to update recipe")?;

        self.compose_detail(recipe).await
    }

    /// Delete a recipe
    ///
    /// Its ingredient links are removed with it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no recipe has this ID
    /// - `InternalError` for database errors
    pub async fn delete(&self, id: i64) -> Result<(), RecipeServiceError> {
        self.recipe_repo
            .get_by_id(id)
            .await
            .context("Failed to get recipe")?
            .ok_or_else(|| RecipeServiceError::NotFound("Recipe not found".to_string()))?;

        self.recipe_repo
            .delete(id)
            .await
            .context("Failed to delete recipe")?;

        Ok(())
    }

    /// Check that every ingredient ID refers to an existing ingredient
    async fn validate_ingredient_ids(&self, ids: &[i64]) -> Result<(), RecipeServiceError> {
        for id in ids {
            if self
                .ingredient_repo
                .get_by_id(*id)
                .await
                .context("Failed to check ingredient")?
                .is_none()
            {
                return Err(RecipeServiceError::ValidationError(format!(
                    "Ingredient with ID {} does not exist",
                    id
                )));
            }
        }
        Ok(())
    }

    /// Attach the author and ingredients to each recipe
    async fn compose_details(
        &self,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeDetail>, RecipeServiceError> {
        let mut details = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            details.push(self.compose_detail(recipe).await?);
        }
        Ok(details)
    }

    async fn compose_detail(&self, recipe: Recipe) -> Result<RecipeDetail, RecipeServiceError> {
        // The FK guarantees the author row while the recipe exists
        let author = self
            .chef_repo
            .get_by_id(recipe.chef_id)
            .await
            .context("Failed to get recipe author")?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Recipe {} references missing chef {}",
                    recipe.id,
                    recipe.chef_id
                )
            })?;

        let ingredients = self
            .recipe_repo
            .ingredients_for(recipe.id)
            .await
            .context("Failed to get recipe ingredients")?;

        Ok(RecipeDetail {
            recipe,
            author,
            ingredients,
        })
    }
}
