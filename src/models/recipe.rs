//! Recipe model
//!
//! This module defines the Recipe entity and its relationship to the chef
//! who authored it and the ingredients it uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chef::Chef;
use super::ingredient::Ingredient;

/// Recipe entity as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// Preparation instructions
    pub instructions: String,
    /// ID of the chef who created the recipe
    pub chef_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A recipe joined with its author and ingredient list.
///
/// Read endpoints return this shape; the bare `Recipe` only travels
/// between the database and the service layer.
#[derive(Debug, Clone)]
pub struct RecipeDetail {
    /// The recipe itself
    pub recipe: Recipe,
    /// The chef who authored the recipe
    pub author: Chef,
    /// Ingredients used by the recipe
    pub ingredients: Vec<Ingredient>,
}

/// Input for creating a new recipe
#[derive(Debug, Clone)]
pub struct CreateRecipeInput {
    /// Recipe name
    pub name: String,
    /// Preparation instructions
    pub instructions: String,
    /// ID of the authoring chef
    pub chef_id: i64,
    /// IDs of the ingredients the recipe uses
    pub ingredient_ids: Vec<i64>,
}

/// Input for updating a recipe
#[derive(Debug, Clone, Default)]
pub struct UpdateRecipeInput {
    /// New name (optional)
    pub name: Option<String>,
    /// New instructions (optional)
    pub instructions: Option<String>,
    /// Replacement ingredient list (optional; replaces the whole list)
    pub ingredient_ids: Option<Vec<i64>>,
}
