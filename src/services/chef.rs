//! Chef service
//!
//! Implements business logic for chef accounts:
//! - Listing and searching chefs (plain or paged)
//! - Lookup by ID
//! - Deletion (recipes go with the chef)
//!
//! Chef creation lives in the auth service, since new accounts only come
//! from registration.

use crate::db::repositories::{ChefRepository, CHEF_SORT_COLUMNS};
use crate::models::{Chef, Listing, Page, QueryPlan, SearchParams};
use anyhow::Context;
use std::sync::Arc;

/// Error types for chef service operations
#[derive(Debug, thiserror::Error)]
pub enum ChefServiceError {
    /// Chef not found
    #[error("Chef not found: {0}")]
    NotFound(String),

    /// Validation error (invalid query parameters)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Chef service for listing and managing chef accounts
pub struct ChefService {
    repo: Arc<dyn ChefRepository>,
}

impl ChefService {
    /// Create a new chef service
    pub fn new(repo: Arc<dyn ChefRepository>) -> Self {
        Self { repo }
    }

    /// List chefs according to the search parameters
    ///
    /// Without paging parameters this returns a plain list (optionally
    /// filtered by `term` over usernames). As soon as `page` or `pageSize`
    /// appears, the result is a page with totals.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if `page` or `pageSize` is zero
    /// - `InternalError` for database errors
    pub async fn list(&self, params: &SearchParams) -> Result<Listing<Chef>, ChefServiceError> {
        let plan = QueryPlan::from_params(params, &CHEF_SORT_COLUMNS)
            .map_err(|e| ChefServiceError::ValidationError(e.to_string()))?;

        match plan {
            QueryPlan::Full => {
                let chefs = self
                    .repo
                    .search(None)
                    .await
                    .context("Failed to list chefs")?;
                Ok(Listing::Plain(chefs))
            }
            QueryPlan::Filtered(term) => {
                let chefs = self
                    .repo
                    .search(Some(&term))
                    .await
                    .context("Failed to search chefs")?;
                Ok(Listing::Plain(chefs))
            }
            QueryPlan::Paged { term, options } => {
                let term = term.as_deref();
                let items = self
                    .repo
                    .search_page(term, &options)
                    .await
                    .context("Failed to search chefs page")?;
                let total = self
                    .repo
                    .count_search(term)
                    .await
                    .context("Failed to count chefs")?;
                Ok(Listing::Paged(Page::new(items, total, &options)))
            }
        }
    }

    /// Get chef by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Chef>, ChefServiceError> {
        let chef = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get chef by ID")?;

        Ok(chef)
    }

    /// Delete a chef
    ///
    /// # Errors
    ///
    /// - `NotFound` if no chef has this ID
    /// - `InternalError` for database errors
    pub async fn delete(&self, id: i64) -> Result<(), ChefServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get chef")?
            .ok_or_else(|| ChefServiceError::NotFound("Chef not found".to_string()))?;

        self.repo.delete(id).await.context("Failed to delete chef")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxChefRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_service() -> ChefService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        ChefService::new(SqlxChefRepository::boxed(pool))
    }

    async fn seed_chefs(service: &ChefService, names: &[&str]) {
        for name in names {
            service
                .repo
                .create(&Chef::new(
                    name.to_string(),
                    format!("{}@example.com", name),
                    "hash123".to_string(),
                ))
                .await
                .expect("Failed to create chef");
        }
    }

    #[tokio::test]
    async fn test_list_without_params_is_plain() {
        let service = setup_test_service().await;
        seed_chefs(&service, &["anna", "bruno"]).await;

        let listing = service
            .list(&SearchParams::default())
            .await
            .expect("Failed to list chefs");

        match listing {
            Listing::Plain(chefs) => assert_eq!(chefs.len(), 2),
            Listing::Paged(_) => panic!("Expected a plain list"),
        }
    }

    #[tokio::test]
    async fn test_list_with_term_filters() {
        let service = setup_test_service().await;
        seed_chefs(&service, &["anna", "annabel", "bruno"]).await;

        let params = SearchParams {
            term: Some("anna".to_string()),
            ..Default::default()
        };
        let listing = service.list(&params).await.expect("Failed to list chefs");

        match listing {
            Listing::Plain(chefs) => assert_eq!(chefs.len(), 2),
            Listing::Paged(_) => panic!("Expected a plain list"),
        }
    }

    #[tokio::test]
    async fn test_list_with_page_param_is_paged() {
        let service = setup_test_service().await;
        seed_chefs(&service, &["anna", "bruno", "carla"]).await;

        let params = SearchParams {
            page: Some(1),
            page_size: Some(2),
            ..Default::default()
        };
        let listing = service.list(&params).await.expect("Failed to list chefs");

        match listing {
            Listing::Paged(page) => {
                assert_eq!(page.items.len(), 2);
                assert_eq!(page.total_count, 3);
                assert_eq!(page.total_pages, 2);
            }
            Listing::Plain(_) => panic!("Expected a paged list"),
        }
    }

    #[tokio::test]
    async fn test_list_rejects_zero_page_size() {
        let service = setup_test_service().await;

        let params = SearchParams {
            page_size: Some(0),
            ..Default::default()
        };
        let result = service.list(&params).await;

        assert!(matches!(result, Err(ChefServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let service = setup_test_service().await;
        seed_chefs(&service, &["anna"]).await;

        let chef = service
            .get_by_id(1)
            .await
            .expect("Failed to get chef")
            .expect("Chef not found");
        assert_eq!(chef.username, "anna");

        let missing = service.get_by_id(999).await.expect("Failed to get chef");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_chef_is_not_found() {
        let service = setup_test_service().await;

        let result = service.delete(999).await;

        assert!(matches!(result, Err(ChefServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_chef() {
        let service = setup_test_service().await;
        seed_chefs(&service, &["anna"]).await;

        service.delete(1).await.expect("Failed to delete chef");

        let missing = service.get_by_id(1).await.expect("Failed to get chef");
        assert!(missing.is_none());
    }
}
