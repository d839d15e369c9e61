//! Ordered chain of `Filter`s applied to a ranked list.

use crate::filters::{AlreadyRejectedFilter, CatalogMembershipFilter, DeduplicateFilter};
use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};
use tracing::debug;

/// Filters run in insertion order; each one sees the previous one's output.
///
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(CatalogMembershipFilter)
///     .add_filter(DeduplicateFilter);
/// let kept = pipeline.apply(ranked, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Filter names in application order
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Run every filter over `candidates`.
    ///
    /// ## Algorithm
    /// 1. Hand the input to the first filter
    /// 2. Feed each filter's output to the next, logging counts per filter
    /// 3. Stop at the first error
    ///
    /// # Arguments
    /// * `candidates` - Ranked list to validate, best first
    /// * `context` - The reader's eligible catalog and rejected items
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - Survivors of every filter, order preserved
    /// * `Err` - The first filter error
    pub fn apply(&self, candidates: Vec<Candidate>, context: &UserContext) -> Result<Vec<Candidate>> {
        self.filters.iter().try_fold(candidates, |current, filter| {
            let before = current.len();
            let kept = filter.apply(current, context)?;
            debug!(
                filter = filter.name(),
                before,
                after = kept.len(),
                "Filter applied"
            );
            Ok(kept)
        })
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation used on every ranked list: in the eligible catalog, not
/// rejected, no repeats.
pub fn validation_pipeline() -> FilterPipeline {
    FilterPipeline::new()
        .add_filter(CatalogMembershipFilter)
        .add_filter(AlreadyRejectedFilter)
        .add_filter(DeduplicateFilter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::CatalogItem;
    use sources::{Candidate, CandidateSource};

    fn context() -> UserContext {
        let mut context = UserContext::new(1);
        context.eligible = (1..=5)
            .map(|id| CatalogItem::new(id, format!("Book {}", id), "Author", "fiction"))
            .collect();
        context.completed = vec![CatalogItem::new(9, "Done", "Author", "fiction")];
        context
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let context = UserContext::new(1);

        let candidates = vec![
            Candidate::new(1, CandidateSource::Ranked, 0.9),
            Candidate::new(2, CandidateSource::Ranked, 0.8),
        ];

        let filtered = pipeline.apply(candidates.clone(), &context).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_single_filter() {
        let context = context();
        let pipeline = FilterPipeline::new().add_filter(AlreadyRejectedFilter);

        let candidates = vec![
            Candidate::new(9, CandidateSource::Ranked, 0.9),
            Candidate::new(2, CandidateSource::Ranked, 0.8),
        ];

        let filtered = pipeline.apply(candidates, &context).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].item_id, 2);
    }

    #[test]
    fn test_validation_pipeline_preserves_order() {
        let context = context();
        let candidates = vec![
            Candidate::new(4, CandidateSource::Ranked, 0.0),
            Candidate::new(77, CandidateSource::Ranked, 1.0),
            Candidate::new(9, CandidateSource::Ranked, 2.0),
            Candidate::new(2, CandidateSource::Ranked, 3.0),
            Candidate::new(4, CandidateSource::Ranked, 4.0),
        ];

        let filtered = validation_pipeline().apply(candidates, &context).unwrap();
        let ids: Vec<_> = filtered.iter().map(|c| c.item_id).collect();
        assert_eq!(ids, vec![4, 2]);
    }

    #[test]
    fn test_validation_pipeline_order() {
        assert_eq!(
            validation_pipeline().names(),
            vec!["CatalogMembershipFilter", "AlreadyRejectedFilter", "DeduplicateFilter"]
        );
    }
}
