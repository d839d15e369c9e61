//! Read-only data-access port used by the recommendation engine.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::types::{CatalogItem, InteractionKind, InteractionStore, ItemId, UserId};

/// Read-only queries the engine needs, all scoped to one user except
/// `liked_counts`.
///
/// Implementations return de-duplicated, latest-only interaction state; the
/// engine treats every returned record as currently active.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn liked_items(&self, user_id: UserId) -> Result<Vec<CatalogItem>, RepositoryError>;

    async fn disliked_items(&self, user_id: UserId) -> Result<Vec<CatalogItem>, RepositoryError>;

    async fn completed_items(&self, user_id: UserId)
    -> Result<Vec<CatalogItem>, RepositoryError>;

    /// Catalog minus the user's disliked and completed items, in catalog order
    async fn eligible_catalog(&self, user_id: UserId)
    -> Result<Vec<CatalogItem>, RepositoryError>;

    /// Count of `Liked` interactions per item across all users
    async fn liked_counts(&self) -> Result<HashMap<ItemId, u32>, RepositoryError>;
}

#[async_trait]
impl InteractionRepository for InteractionStore {
    async fn liked_items(&self, user_id: UserId) -> Result<Vec<CatalogItem>, RepositoryError> {
        Ok(self.items_with_kind(user_id, InteractionKind::Liked))
    }

    async fn disliked_items(&self, user_id: UserId) -> Result<Vec<CatalogItem>, RepositoryError> {
        Ok(self.items_with_kind(user_id, InteractionKind::Disliked))
    }

    async fn completed_items(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CatalogItem>, RepositoryError> {
        Ok(self.items_with_kind(user_id, InteractionKind::Completed))
    }

    async fn eligible_catalog(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CatalogItem>, RepositoryError> {
        Ok(self.eligible_for(user_id))
    }

    async fn liked_counts(&self) -> Result<HashMap<ItemId, u32>, RepositoryError> {
        Ok(self.like_counts())
    }
}
