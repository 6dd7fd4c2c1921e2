//! Chef model
//!
//! This module defines the Chef entity, the authoring identity of the
//! catalog. Chefs register with a username and email, then authenticate
//! to create and maintain recipes and ingredients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chef entity representing a registered recipe author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chef {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Chef {
    /// Create a new Chef with the given parameters.
    ///
    /// Note: The password should already be hashed before calling this
    /// function. Use `services::password::hash_password()` to hash it.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
