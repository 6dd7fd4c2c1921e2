//! Session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session entity for chef authentication.
///
/// Sessions live only in memory; the token is the sole handle a client
/// keeps. `expires_at` of `None` means the session never expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session token
    pub token: String,
    /// Associated chef ID
    pub chef_id: i64,
    /// Expiration timestamp (None = never expires)
    pub expires_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at < Utc::now(),
            None => false,
        }
    }
}
