//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity and
//! exposes the allow-list of columns its paged queries may sort by.

pub mod chef;
pub mod ingredient;
pub mod recipe;

pub use chef::{ChefRepository, SqlxChefRepository, CHEF_SORT_COLUMNS};
pub use ingredient::{IngredientRepository, SqlxIngredientRepository, INGREDIENT_SORT_COLUMNS};
pub use recipe::{RecipeRepository, SqlxRecipeRepository, RECIPE_SORT_COLUMNS};
