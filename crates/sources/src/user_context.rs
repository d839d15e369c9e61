//! Builds a UserContext from the repository.
//!
//! The four reads have no ordering dependency and are issued concurrently.
//! A failed read never fails the request: it is logged and treated as an
//! empty result, so e.g. a broken "disliked" query degrades to "no dislikes
//! known".

use crate::types::UserContext;
use data_loader::{CatalogItem, InteractionRepository, RepositoryError, UserId};
use tracing::{debug, instrument, warn};

/// Gather liked, disliked, completed and eligible items for a user
#[instrument(skip(repository))]
pub async fn build_user_context(
    repository: &dyn InteractionRepository,
    user_id: UserId,
) -> UserContext {
    let (liked, disliked, completed, eligible) = tokio::join!(
        repository.liked_items(user_id),
        repository.disliked_items(user_id),
        repository.completed_items(user_id),
        repository.eligible_catalog(user_id),
    );

    let context = UserContext {
        user_id,
        liked: or_empty(liked, "liked"),
        disliked: or_empty(disliked, "disliked"),
        completed: or_empty(completed, "completed"),
        eligible: or_empty(eligible, "eligible_catalog"),
    };

    debug!(
        liked = context.liked.len(),
        disliked = context.disliked.len(),
        completed = context.completed.len(),
        eligible = context.eligible.len(),
        "Built user context"
    );
    context
}

fn or_empty(
    result: Result<Vec<CatalogItem>, RepositoryError>,
    query: &'static str,
) -> Vec<CatalogItem> {
    result.unwrap_or_else(|e| {
        warn!(query, error = %e, "Repository read failed, treating as empty");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{
        InteractionKind, InteractionRecord, InteractionStore, MockInteractionRepository,
    };

    fn create_test_store() -> InteractionStore {
        let mut store = InteractionStore::new();
        store.insert_item(CatalogItem::new(1, "Dune", "Frank Herbert", "sci-fi"));
        store.insert_item(CatalogItem::new(2, "Emma", "Jane Austen", "romance"));
        store.insert_item(CatalogItem::new(3, "Beloved", "Toni Morrison", "drama"));
        store.insert_item(CatalogItem::new(4, "Hyperion", "Dan Simmons", "sci-fi"));

        store.record(InteractionRecord::new(1, 1, InteractionKind::Liked, 1));
        store.record(InteractionRecord::new(1, 2, InteractionKind::Disliked, 2));
        store.record(InteractionRecord::new(1, 3, InteractionKind::Completed, 3));
        store
    }

    #[tokio::test]
    async fn test_build_user_context_basic() {
        let store = create_test_store();
        let context = build_user_context(&store, 1).await;

        assert_eq!(context.user_id, 1);
        assert_eq!(context.liked.len(), 1);
        assert_eq!(context.disliked.len(), 1);
        assert_eq!(context.completed.len(), 1);
        assert_eq!(context.interaction_count(), 3);
        assert!(context.has_interactions());

        let eligible: Vec<_> = context.eligible.iter().map(|i| i.id).collect();
        assert_eq!(eligible, vec![1, 4]);
        assert!(context.rejected_ids().contains(&2));
        assert!(context.rejected_ids().contains(&3));
    }

    #[tokio::test]
    async fn test_user_with_no_interactions() {
        let store = create_test_store();
        let context = build_user_context(&store, 42).await;

        assert!(!context.has_interactions());
        assert_eq!(context.eligible.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_read_degrades_to_empty() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_liked_items()
            .returning(|_| Ok(vec![CatalogItem::new(1, "Dune", "Frank Herbert", "sci-fi")]));
        repo.expect_disliked_items()
            .returning(|_| Err(RepositoryError::Query("timeout".into())));
        repo.expect_completed_items().returning(|_| Ok(vec![]));
        repo.expect_eligible_catalog()
            .returning(|_| Ok(vec![CatalogItem::new(5, "Solaris", "Stanislaw Lem", "sci-fi")]));

        let context = build_user_context(&repo, 9).await;

        assert_eq!(context.liked.len(), 1);
        assert!(context.disliked.is_empty());
        assert_eq!(context.eligible.len(), 1);
    }

    #[tokio::test]
    async fn test_every_read_failing_yields_empty_context() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_liked_items()
            .returning(|_| Err(RepositoryError::Unavailable("down".into())));
        repo.expect_disliked_items()
            .returning(|_| Err(RepositoryError::Unavailable("down".into())));
        repo.expect_completed_items()
            .returning(|_| Err(RepositoryError::Unavailable("down".into())));
        repo.expect_eligible_catalog()
            .returning(|_| Err(RepositoryError::Unavailable("down".into())));

        let context = build_user_context(&repo, 9).await;

        assert!(!context.has_interactions());
        assert!(context.eligible.is_empty());
    }
}
