//! Ingredient service
//!
//! Implements business logic for the ingredient catalog:
//! - Listing and searching ingredients (plain or paged)
//! - Create, update, delete with duplicate-name rejection

use crate::db::repositories::{IngredientRepository, INGREDIENT_SORT_COLUMNS};
use crate::models::{
    CreateIngredientInput, Ingredient, Listing, Page, QueryPlan, SearchParams,
    UpdateIngredientInput,
};
use anyhow::Context;
use std::sync::Arc;

/// Error types for ingredient service operations
#[derive(Debug, thiserror::Error)]
pub enum IngredientServiceError {
    /// Ingredient not found
    #[error("Ingredient not found: {0}")]
    NotFound(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Ingredient name already taken
    #[error("Ingredient already exists: {0}")]
    DuplicateName(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Ingredient service for managing the ingredient catalog
pub struct IngredientService {
    repo: Arc<dyn IngredientRepository>,
}

impl IngredientService {
    /// Create a new ingredient service
    pub fn new(repo: Arc<dyn IngredientRepository>) -> Self {
        Self { repo }
    }

    /// List ingredients according to the search parameters
    ///
    /// Without paging parameters this returns a plain list (optionally
    /// filtered by `term` over names). As soon as `page` or `pageSize`
    /// appears, the result is a page with totals.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if `page` or `pageSize` is zero
    /// - `InternalError` for database errors
    pub async fn list(
        &self,
        params: &SearchParams,
    ) -> Result<Listing<Ingredient>, IngredientServiceError> {
        let plan = QueryPlan::from_params(params, &INGREDIENT_SORT_COLUMNS)
            .map_err(|e| IngredientServiceError::ValidationError(e.to_string()))?;

        match plan {
            QueryPlan::Full => {
                let ingredients = self
                    .repo
                    .search(None)
                    .await
                    .context("Failed to list ingredients")?;
                Ok(Listing::Plain(ingredients))
            }
            QueryPlan::Filtered(term) => {
                let ingredients = self
                    .repo
                    .search(Some(&term))
                    .await
                    .context("Failed to search ingredients")?;
                Ok(Listing::Plain(ingredients))
            }
            QueryPlan::Paged { term, options } => {
                let term = term.as_deref();
                let items = self
                    .repo
                    .search_page(term, &options)
                    .await
                    .context("Failed to search ingredients page")?;
                let total = self
                    .repo
                    .count_search(term)
                    .await
                    .context("Failed to count ingredients")?;
                Ok(Listing::Paged(Page::new(items, total, &options)))
            }
        }
    }

    /// Get ingredient by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Ingredient>, IngredientServiceError> {
        let ingredient = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get ingredient by ID")?;

        Ok(ingredient)
    }

    /// Create a new ingredient
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the name is empty
    /// - `DuplicateName` if an ingredient with this name already exists
    /// - `InternalError` for database errors
    pub async fn create(
        &self,
        input: CreateIngredientInput,
    ) -> Result<Ingredient, IngredientServiceError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(IngredientServiceError::ValidationError(
                "Ingredient name cannot be empty".to_string(),
            ));
        }

        if self
            .repo
            .get_by_name(name)
            .await
            .context("Failed to check ingredient name")?
            .is_some()
        {
            return Err(IngredientServiceError::DuplicateName(name.to_string()));
        }

        let created = self
            .repo
            .create(&CreateIngredientInput {
                name: name.to_string(),
            })
            .await
            .context("Failed to create ingredient")?;

        Ok(created)
    }

    /// Update an ingredient
    ///
    /// # Errors
    ///
    /// - `NotFound` if no ingredient has this ID
    /// - `ValidationError` if the new name is empty
    /// - `DuplicateName` if the new name belongs to another ingredient
    /// - `InternalError` for database errors
    pub async fn update(
        &self,
        id: i64,
        mut input: UpdateIngredientInput,
    ) -> Result<Ingredient, IngredientServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get ingredient")?
            .ok_or_else(|| {
                IngredientServiceError::NotFound("Ingredient not found".to_string())
            })?;

        if let Some(name) = &input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(IngredientServiceError::ValidationError(
                    "Ingredient name cannot be empty".to_string(),
                ));
            }

            // Renaming onto another ingredient's name is a conflict
            if let Some(other) = self
                .repo
                .get_by_name(&name)
                .await
                .context("Failed to check ingredient name")?
            {
                if other.id != id {
                    return Err(IngredientServiceError::DuplicateName(name));
                }
            }

            input.name = Some(name);
        }

        let updated = self
            .repo
            .update(id, &input)
            .await
            .context("Failed to update ingredient")?;

        Ok(updated)
    }

    /// Delete an ingredient
    ///
    /// Recipe links to this ingredient are removed with it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no ingredient has this ID
    /// - `InternalError` for database errors
    pub async fn delete(&self, id: i64) -> Result<(), IngredientServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get ingredient")?
            .ok_or_else(|| {
                IngredientServiceError::NotFound("Ingredient not found".to_string())
            })?;

        self.repo
            .delete(id)
            .await
            .context("Failed to delete ingredient")?;

        Ok(())
    }
}
