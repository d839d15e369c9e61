//! Cold-start sources.
//!
//! Used when the reader has no interactions, or when ranking produced
//! nothing usable:
//! - Popularity: items liked by the most readers overall
//! - Random: uniform sample of the eligible catalog, for catalogs with no
//!   likes at all yet

use crate::types::{Candidate, CandidateSource, UserContext};
use data_loader::{InteractionRepository, ItemId};
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Ranks the eligible catalog by how many readers currently like each item
#[derive(Clone)]
pub struct PopularitySource {
    repository: Arc<dyn InteractionRepository>,

    /// Items with fewer likes than this are left out (default: 1)
    min_like_count: u32,
}

impl PopularitySource {
    pub fn new(repository: Arc<dyn InteractionRepository>) -> Self {
        Self {
            repository,
            min_like_count: 1,
        }
    }

    /// Configure the minimum like count (default: 1, never below 1)
    pub fn with_min_like_count(mut self, count: u32) -> Self {
        self.min_like_count = count.max(1);
        self
    }

    /// Eligible items ordered by like count descending; ties keep
    /// catalog order. A failed count query yields no candidates.
    #[instrument(skip(self, user_context), fields(user_id = user_context.user_id))]
    pub async fn get_candidates(&self, user_context: &UserContext, limit: usize) -> Vec<Candidate> {
        let counts = match self.repository.liked_counts().await {
            Ok(counts) => counts,
            Err(e) => {
                warn!(error = %e, "Like count query failed, popularity tier is empty");
                return Vec::new();
            }
        };

        let mut candidates: Vec<Candidate> = user_context
            .eligible
            .iter()
            .filter_map(|item| {
                let count = counts.get(&item.id).copied().unwrap_or(0);
                (count >= self.min_like_count)
                    .then(|| Candidate::new(item.id, CandidateSource::Popularity, count as f32))
            })
            .collect();

        // Stable sort keeps catalog order among equal counts
        candidates.sort_by(|a, b| b.base_score.total_cmp(&a.base_score));
        candidates.truncate(limit);

        debug!("Generated {} popularity candidates", candidates.len());
        candidates
    }
}

/// Uniform sample of the eligible catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSource;

impl RandomSource {
    /// Sample up to `limit` eligible items not in `exclude`, without replacement
    pub fn get_candidates(
        &self,
        user_context: &UserContext,
        exclude: &HashSet<ItemId>,
        limit: usize,
    ) -> Vec<Candidate> {
        let pool: Vec<ItemId> = user_context
            .eligible
            .iter()
            .map(|item| item.id)
            .filter(|id| !exclude.contains(id))
            .collect();

        let mut rng = rand::rng();
        let candidates: Vec<Candidate> = pool
            .choose_multiple(&mut rng, limit)
            .map(|&id| Candidate::new(id, CandidateSource::Random, 0.0))
            .collect();

        debug!("Sampled {} random candidates", candidates.len());
        candidates
    }
}
