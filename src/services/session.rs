//! In-memory session store
//!
//! Sessions live entirely in process memory:
//! - Tokens carry 256 bits of entropy, encoded as URL-safe base64
//! - Expired sessions are evicted lazily when a stale token is presented
//! - Restarting the server invalidates every session

use std::collections::HashMap;

use anyhow::Result;
use chrono::{Duration, Utc};
use data_encoding::BASE64URL_NOPAD;
use tokio::sync::RwLock;

use crate::models::Session;

/// Random bytes per session token (256 bits of entropy)
const TOKEN_BYTES: usize = 32;

/// Owns the token -> session map and issues, resolves, and revokes sessions.
///
/// Shared across handlers behind an `Arc`; all methods take `&self` and
/// synchronize through an internal lock.
pub struct SessionAuthority {
    /// Active sessions keyed by token
    sessions: RwLock<HashMap<String, Session>>,
    /// Session lifetime; `None` means sessions never expire
    ttl: Option<Duration>,
}

impl SessionAuthority {
    /// Create a session authority with the given lifetime.
    ///
    /// Pass `None` for sessions that never expire.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a session authority from a configured lifetime in minutes.
    ///
    /// Zero means sessions never expire.
    pub fn from_minutes(minutes: u64) -> Self {
        let ttl = if minutes > 0 {
            Some(Duration::minutes(minutes as i64))
        } else {
            None
        };
        Self::new(ttl)
    }

    /// Issue a new session for a chef.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system fails to provide entropy
    /// for the token.
    pub async fn issue(&self, chef_id: i64) -> Result<Session> {
        let token = generate_token()?;
        let now = Utc::now();
        let session = Session {
            token: token.clone(),
            chef_id,
            expires_at: self.ttl.map(|ttl| now + ttl),
            created_at: now,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token, session.clone());

        Ok(session)
    }

    /// Resolve a token to the chef ID it was issued for.
    ///
    /// Returns `None` for unknown tokens. An expired session is removed
    /// from the store before `None` is returned.
    pub async fn resolve(&self, token: &str) -> Option<i64> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired() => return Some(session.chef_id),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: evict under the write lock
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
        None
    }

    /// Remove a session, returning whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token).is_some()
    }

    /// Number of sessions currently held, including not-yet-evicted expired ones
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are currently held
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Generate a URL-safe session token from OS entropy.
fn generate_token() -> Result<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    getrandom::fill(&mut bytes)
        .map_err(|e| anyhow::anyhow!("Failed to gather session token entropy: {}", e))?;
    Ok(BASE64URL_NOPAD.encode(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let authority = SessionAuthority::new(None);

        let session = authority.issue(42).await.expect("Failed to issue session");
        assert_eq!(session.chef_id, 42);

        let resolved = authority.resolve(&session.token).await;
        assert_eq!(resolved, Some(42));
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let authority = SessionAuthority::new(None);

        assert_eq!(authority.resolve("no-such-token").await, None);
        assert_eq!(authority.resolve("").await, None);
    }

    #[tokio::test]
    async fn test_revoke_removes_session() {
        let authority = SessionAuthority::new(None);
        let session = authority.issue(1).await.expect("Failed to issue session");

        assert!(authority.revoke(&session.token).await);
        assert_eq!(authority.resolve(&session.token).await, None);

        // Second revoke of the same token finds nothing
        assert!(!authority.revoke(&session.token).await);
    }

    #[tokio::test]
    async fn test_revoke_unknown_token_returns_false() {
        let authority = SessionAuthority::new(None);
        assert!(!authority.revoke("never-issued").await);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let authority = SessionAuthority::new(None);

        let first = authority.issue(1).await.expect("Failed to issue session");
        let second = authority.issue(1).await.expect("Failed to issue session");

        assert_ne!(first.token, second.token);
        assert_eq!(authority.len().await, 2);
    }

    #[tokio::test]
    async fn test_token_is_url_safe() {
        let authority = SessionAuthority::new(None);
        let session = authority.issue(1).await.expect("Failed to issue session");

        // 32 bytes -> 43 base64url characters, no padding
        assert_eq!(session.token.len(), 43);
        assert!(session
            .token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted_on_resolve() {
        // Negative lifetime: sessions are born expired
        let authority = SessionAuthority::new(Some(Duration::milliseconds(-1)));
        let session = authority.issue(7).await.expect("Failed to issue session");

        assert_eq!(authority.len().await, 1);
        assert_eq!(authority.resolve(&session.token).await, None);
        assert_eq!(authority.len().await, 0, "Expired session should be removed");
    }

    #[tokio::test]
    async fn test_sessions_without_ttl_never_expire() {
        let authority = SessionAuthority::new(None);
        let session = authority.issue(3).await.expect("Failed to issue session");

        assert!(session.expires_at.is_none());
        assert_eq!(authority.resolve(&session.token).await, Some(3));
    }

    #[tokio::test]
    async fn test_ttl_sets_expiry_timestamp() {
        let authority = SessionAuthority::new(Some(Duration::minutes(60)));
        let session = authority.issue(3).await.expect("Failed to issue session");

        let expires_at = session.expires_at.expect("Session should carry an expiry");
        assert!(expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_from_minutes_zero_means_no_expiry() {
        let authority = SessionAuthority::from_minutes(0);
        let session = authority.issue(9).await.expect("Failed to issue session");

        assert!(session.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_from_minutes_sets_expiry() {
        let authority = SessionAuthority::from_minutes(30);
        let session = authority.issue(9).await.expect("Failed to issue session");

        assert!(session.expires_at.is_some());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(20))]

            /// Any issued token resolves back to the chef it was issued for.
            #[test]
            fn property_issued_token_resolves_to_chef(chef_id in 1i64..1_000_000) {
                let rt = tokio::runtime::Runtime::new().unwrap();
                let result: Result<(), TestCaseError> = rt.block_on(async {
                    let authority = SessionAuthority::new(None);
                    let session = authority.issue(chef_id).await
                        .expect("Failed to issue session");

                    prop_assert_eq!(authority.resolve(&session.token).await, Some(chef_id));
                    Ok(())
                });
                result?;
            }

            /// Revoking a token always leaves it unresolvable.
            #[test]
            fn property_revoked_token_never_resolves(chef_id in 1i64..1_000_000) {
                let rt = tokio::runtime::Runtime::new().unwrap();
                let result: Result<(), TestCaseError> = rt.block_on(async {
                    let authority = SessionAuthority::new(None);
                    let session = authority.issue(chef_id).await
                        .expect("Failed to issue session");

                    prop_assert!(authority.revoke(&session.token).await);
                    prop_assert_eq!(authority.resolve(&session.token).await, None);
                    Ok(())
                });
                result?;
            }
        }
    }
}
