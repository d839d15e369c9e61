//! Filter to drop identifiers that are not in the eligible catalog.
//!
//! The ranking oracle answers in free text and can name ids that do not
//! exist or were never offered to it.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};
use tracing::debug;

/// Keeps only candidates present in `UserContext::eligible`.
pub struct CatalogMembershipFilter;

impl Filter for CatalogMembershipFilter {
    fn name(&self) -> &str {
        "CatalogMembershipFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &UserContext,
    ) -> Result<Vec<Candidate>> {
        let eligible = context.eligible_ids();
        let before = candidates.len();
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| eligible.contains(&candidate.item_id))
            .collect();

        if filtered.len() < before {
            debug!(
                dropped = before - filtered.len(),
                "Dropped identifiers outside the eligible catalog"
            );
        }
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::CatalogItem;
    use sources::CandidateSource;

    #[test]
    fn test_drops_unknown_ids() {
        let mut context = UserContext::new(1);
        context.eligible = vec![
            CatalogItem::new(1, "Dune", "Frank Herbert", "sci-fi"),
            CatalogItem::new(2, "Hyperion", "Dan Simmons", "sci-fi"),
        ];

        let candidates = vec![
            Candidate::new(999, CandidateSource::Ranked, 0.0),
            Candidate::new(2, CandidateSource::Ranked, 1.0),
            Candidate::new(1, CandidateSource::Ranked, 2.0),
        ];

        let filtered = CatalogMembershipFilter.apply(candidates, &context).unwrap();
        let ids: Vec<_> = filtered.iter().map(|c| c.item_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_empty_catalog_drops_everything() {
        let context = UserContext::new(1);
        let candidates = vec![Candidate::new(1, CandidateSource::Ranked, 0.0)];

        assert!(CatalogMembershipFilter.apply(candidates, &context).unwrap().is_empty());
    }
}
