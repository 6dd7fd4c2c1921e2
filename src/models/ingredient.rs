//! Ingredient model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ingredient entity, shared across recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier
    pub id: i64,
    /// Ingredient name (unique)
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new ingredient
#[derive(Debug, Clone)]
pub struct CreateIngredientInput {
    /// Ingredient name
    pub name: String,
}

/// Input for updating an ingredient
#[derive(Debug, Clone, Default)]
pub struct UpdateIngredientInput {
    /// New name (optional)
    pub name: Option<String>,
}
