//! Services layer - Business logic
//!
//! This module contains all business logic services for the recipe catalog.
//! Services are responsible for:
//! - Implementing business rules
//! - Coordinating between repositories and the session store
//! - Handling validation and error cases

pub mod auth;
pub mod chef;
pub mod ingredient;
pub mod password;
pub mod recipe;
pub mod session;

pub use auth::{AuthService, AuthServiceError, LoginInput, RegisterInput};
pub use chef::{ChefService, ChefServiceError};
pub use ingredient::{IngredientService, IngredientServiceError};
pub use password::{hash_password, verify_password};
pub use recipe::{RecipeService, RecipeServiceError};
pub use session::SessionAuthority;
