//! Data models
//!
//! This module contains all data structures used throughout the Ladle
//! recipe catalog. Models represent:
//! - Database entities (Chef, Recipe, Ingredient, Session)
//! - The shared pagination contract used by every list endpoint
//! - Internal data transfer objects

mod chef;
mod ingredient;
mod page;
mod recipe;
mod session;

pub use chef::Chef;
pub use ingredient::{CreateIngredientInput, Ingredient, UpdateIngredientInput};
pub use page::{
    Listing, Page, PageOptions, PageParamsError, QueryPlan, SearchParams, SortColumns,
    SortDirection,
};
pub use recipe::{CreateRecipeInput, Recipe, RecipeDetail, UpdateRecipeInput};
pub use session::Session;
