//! # Recommendation Orchestrator
//!
//! This module coordinates one recommendation request:
//! 1. Build the user context (four concurrent repository reads)
//! 2. Ranked tier: the `Ranker` over the eligible catalog, then the genre
//!    scorer when the ranker produced too little and the reader has liked
//!    or disliked items to score against
//! 3. Popularity tier: eligible items by cross-user like count
//! 4. Random tier: uniform sample of whatever eligible items are left
//! 5. Validate, deduplicate and truncate to `limit`
//!
//! Each tier only tops up what the previous tiers left short, so the
//! result holds `min(limit, |eligible|)` ids. Readers with no interactions
//! skip the ranked tier entirely. No failure escapes `recommend`; the worst
//! outcome is an empty list, which only happens for an empty eligible
//! catalog.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use data_loader::{InteractionRepository, ItemId, UserId};
use pipeline::{FilterPipeline, GenreScorer, validation_pipeline};
use rank_client::Ranker;
use sources::{
    Candidate, CandidateSource, PopularitySource, RandomSource, UserContext, build_user_context,
};

/// Number of recommendations returned when the caller asks for zero
pub const DEFAULT_LIMIT: usize = pipeline::DEFAULT_LIMIT;

/// Composes the repository, the ranking delegate and the fallback tiers.
///
/// Cheap to clone; clones share the repository, ranker and filters.
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    repository: Arc<dyn InteractionRepository>,
    ranker: Arc<dyn Ranker>,
    scorer: GenreScorer,
    popularity: PopularitySource,
    random: RandomSource,
    validation: Arc<FilterPipeline>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over `repository`, ranking with `ranker`
    pub fn new(repository: Arc<dyn InteractionRepository>, ranker: Arc<dyn Ranker>) -> Self {
        let popularity = PopularitySource::new(repository.clone());
        Self {
            repository,
            ranker,
            scorer: GenreScorer::new(),
            popularity,
            random: RandomSource,
            validation: Arc::new(validation_pipeline()),
        }
    }

    /// Replace the scorer used for the direct scoring tier
    pub fn with_scorer(mut self, scorer: GenreScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Ordered recommendation ids for `user_id`; `limit == 0` means 8
    pub async fn recommend(&self, user_id: UserId, limit: usize) -> Vec<ItemId> {
        self.recommend_candidates(user_id, limit)
            .await
            .into_iter()
            .map(|candidate| candidate.item_id)
            .collect()
    }

    /// Same as `recommend`, keeping the tier that produced each id.
    ///
    /// ## Algorithm
    /// 1. Build the user context; failed reads count as empty
    /// 2. Return empty when nothing is eligible
    /// 3. Readers with history go through the ranked tier: the `Ranker`,
    ///    then the genre scorer when there is liked or disliked signal
    /// 4. Top up from popularity, then from a random sample
    ///
    /// # Arguments
    /// * `user_id` - The reader to recommend for
    /// * `limit` - Number of ids wanted; 0 means `DEFAULT_LIMIT`
    ///
    /// # Returns
    /// `min(limit, |eligible|)` candidates, best first, each tagged with
    /// the tier that produced it
    #[instrument(skip(self))]
    pub async fn recommend_candidates(&self, user_id: UserId, limit: usize) -> Vec<Candidate> {
        let start = Instant::now();
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };

        let context = build_user_context(self.repository.as_ref(), user_id).await;

        if context.eligible.is_empty() {
            info!("Eligible catalog is empty, nothing to recommend");
            return Vec::new();
        }

        let mut results = Vec::new();

        if context.has_interactions() {
            results = self.ranked_tier(&context, limit).await;
        } else {
            debug!("No interactions, skipping ranked tier");
        }

        if results.len() < limit {
            let popular = self.popularity.get_candidates(&context, context.eligible.len()).await;
            results = self.top_up(results, popular, &context, limit, CandidateSource::Popularity);
        }

        if results.len() < limit {
            let taken: HashSet<ItemId> = results.iter().map(|c| c.item_id).collect();
            let sampled = self.random.get_candidates(&context, &taken, limit - results.len());
            results = self.top_up(results, sampled, &context, limit, CandidateSource::Random);
        }

        info!(
            returned = results.len(),
            limit,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendations ready"
        );
        results
    }

    /// Delegate ranking, validated, topped up by the genre scorer
    async fn ranked_tier(&self, context: &UserContext, limit: usize) -> Vec<Candidate> {
        let tier_start = Instant::now();
        let ranked = self.ranker.rank(context, &context.eligible).await;
        let returned = ranked.len();
        let ranked: Vec<Candidate> = ranked
            .into_iter()
            .enumerate()
            .map(|(idx, id)| Candidate::new(id, CandidateSource::Ranked, (returned - idx) as f32))
            .collect();
        let results = self.top_up(Vec::new(), ranked, context, limit, CandidateSource::Ranked);

        info!(
            ranker = self.ranker.name(),
            returned,
            kept = results.len(),
            elapsed_ms = tier_start.elapsed().as_millis() as u64,
            "Ranked tier complete"
        );

        if results.len() >= limit {
            return results;
        }
        // Without likes or dislikes the scorer only echoes catalog order
        if context.liked.is_empty() && context.disliked.is_empty() {
            debug!("No liked or disliked items, leaving the rest to popularity");
            return results;
        }
        if results.is_empty() {
            info!("Ranker produced nothing usable, scoring genres directly");
        }

        let scored = self
            .scorer
            .score_candidates(&context.liked, &context.disliked, &context.eligible, limit);
        self.top_up(results, scored, context, limit, CandidateSource::GenreScore)
    }

    /// Append `tier` to `current`, validate the whole list and cut it to
    /// `limit`. Earlier entries win duplicates.
    fn top_up(
        &self,
        current: Vec<Candidate>,
        tier: Vec<Candidate>,
        context: &UserContext,
        limit: usize,
        source: CandidateSource,
    ) -> Vec<Candidate> {
        let before = current.len();
        let offered = tier.len();

        let mut combined = current.clone();
        combined.extend(tier);

        let mut validated = match self.validation.apply(combined, context) {
            Ok(validated) => validated,
            Err(e) => {
                warn!(tier = source.as_str(), error = %e, "Validation failed, dropping tier");
                return current;
            }
        };
        validated.truncate(limit);

        debug!(
            tier = source.as_str(),
            offered,
            added = validated.len().saturating_sub(before),
            total = validated.len(),
            "Tier merged"
        );
        validated
    }
}
