//! Deterministic genre-frequency scorer.
//!
//! Used directly as the last ranked tier and as the failure path of the
//! oracle-backed ranker.
//!
//! ## Algorithm
//! 1. Rank liked genres by frequency (ties: first seen); a genre's affinity
//!    weight is `N - rank_index` for `N` distinct liked genres
//! 2. Score each candidate: sum of affinity weights of its distinct genres,
//!    times the affinity scale, minus a flat penalty per disliked genre
//! 3. An explicitly disliked item scores `EXCLUDED_SCORE` and is never emitted
//! 4. Stable sort descending, so ties keep catalog order
//! 5. Take the top `limit`; positives come first by construction, the rest
//!    pads with the next-highest scores regardless of sign

use crate::genre::{GenreProfile, distinct_genres};
use data_loader::{CatalogItem, ItemId};
use sources::{Candidate, CandidateSource};
use tracing::debug;

/// Number of identifiers returned when no limit is configured
pub const DEFAULT_LIMIT: usize = 8;

/// Points subtracted per shared disliked genre
pub const DISLIKE_PENALTY: i64 = 10;

/// Score forced onto items the reader disliked outright
pub const EXCLUDED_SCORE: i64 = i64::MIN;

/// One scored candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub score: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct GenreScorer {
    limit: usize,
    dislike_penalty: i64,
    affinity_scale: i64,
}

impl GenreScorer {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            dislike_penalty: DISLIKE_PENALTY,
            affinity_scale: 1,
        }
    }

    /// Configure how many identifiers `score` returns (default: 8)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Configure the per-genre dislike penalty (default: 10)
    pub fn with_dislike_penalty(mut self, penalty: i64) -> Self {
        self.dislike_penalty = penalty;
        self
    }

    /// Configure the affinity multiplier (default: 1)
    pub fn with_affinity_scale(mut self, scale: i64) -> Self {
        self.affinity_scale = scale;
        self
    }

    /// Top `limit` candidate ids, best first.
    ///
    /// ## Algorithm
    /// 1. Build the reader's `GenreProfile` from `liked` and `disliked`
    /// 2. With no signal at all, keep `candidates` in input order
    /// 3. Otherwise score every candidate, drop explicitly disliked ones and
    ///    stable-sort descending
    /// 4. Truncate to the configured limit
    ///
    /// # Arguments
    /// * `liked` - Items the reader liked
    /// * `disliked` - Items the reader disliked
    /// * `candidates` - Items to order, usually the eligible catalog
    ///
    /// # Returns
    /// At most `limit` ids; ties keep their order in `candidates`
    pub fn score(
        &self,
        liked: &[CatalogItem],
        disliked: &[CatalogItem],
        candidates: &[CatalogItem],
    ) -> Vec<ItemId> {
        self.rank(liked, disliked, candidates, self.limit)
            .into_iter()
            .map(|scored| scored.item_id)
            .collect()
    }

    /// Same ordering as `score`, as pipeline candidates
    pub fn score_candidates(
        &self,
        liked: &[CatalogItem],
        disliked: &[CatalogItem],
        candidates: &[CatalogItem],
        limit: usize,
    ) -> Vec<Candidate> {
        self.rank(liked, disliked, candidates, limit)
            .into_iter()
            .map(|scored| {
                Candidate::new(scored.item_id, CandidateSource::GenreScore, scored.score as f32)
            })
            .collect()
    }

    /// Every candidate with its score, in ranked order, excluded items included
    pub fn score_all(
        &self,
        liked: &[CatalogItem],
        disliked: &[CatalogItem],
        candidates: &[CatalogItem],
    ) -> Vec<ScoredItem> {
        self.score_profile(&GenreProfile::from_items(liked, disliked), candidates)
    }

    fn score_profile(&self, profile: &GenreProfile, candidates: &[CatalogItem]) -> Vec<ScoredItem> {
        let mut scored: Vec<ScoredItem> = candidates
            .iter()
            .map(|item| ScoredItem {
                item_id: item.id,
                score: self.score_item(profile, item),
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }

    fn rank(
        &self,
        liked: &[CatalogItem],
        disliked: &[CatalogItem],
        candidates: &[CatalogItem],
        limit: usize,
    ) -> Vec<ScoredItem> {
        let profile = GenreProfile::from_items(liked, disliked);
        if profile.is_empty() {
            debug!("No liked or disliked items, keeping input order");
            return candidates
                .iter()
                .take(limit)
                .map(|item| ScoredItem {
                    item_id: item.id,
                    score: 0,
                })
                .collect();
        }

        let ranked: Vec<ScoredItem> = self
            .score_profile(&profile, candidates)
            .into_iter()
            .filter(|scored| scored.score != EXCLUDED_SCORE)
            .take(limit)
            .collect();

        debug!(
            candidates = candidates.len(),
            returned = ranked.len(),
            positive = ranked.iter().filter(|s| s.score > 0).count(),
            "Genre scoring complete"
        );
        ranked
    }

    fn score_item(&self, profile: &GenreProfile, item: &CatalogItem) -> i64 {
        if profile.is_disliked_item(item.id) {
            return EXCLUDED_SCORE;
        }

        distinct_genres(item).iter().fold(0i64, |score, genre| {
            let mut score = score + profile.affinity(genre) * self.affinity_scale;
            if profile.is_disliked_genre(genre) {
                score -= self.dislike_penalty;
            }
            score
        })
    }
}

impl Default for GenreScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: ItemId, genres: &str) -> CatalogItem {
        CatalogItem::new(id, format!("Book {}", id), "Author", genres)
    }

    fn score_of(scored: &[ScoredItem], id: ItemId) -> i64 {
        scored.iter().find(|s| s.item_id == id).unwrap().score
    }

    #[test]
    fn test_liked_scifi_disliked_romance() {
        let liked = vec![item(10, "sci-fi")];
        let disliked = vec![item(11, "romance")];
        let candidates = vec![item(1, "sci-fi"), item(2, "romance"), item(3, "drama")];

        let scorer = GenreScorer::new();
        assert_eq!(scorer.score(&liked, &disliked, &candidates), vec![1, 3, 2]);

        let scored = scorer.score_all(&liked, &disliked, &candidates);
        assert!(score_of(&scored, 1) > 0);
        assert_eq!(score_of(&scored, 3), 0);
        assert!(score_of(&scored, 2) < 0);
    }

    #[test]
    fn test_no_signal_keeps_input_order() {
        let candidates: Vec<CatalogItem> = (1..=10).map(|id| item(id, "drama")).collect();

        let ids = GenreScorer::new().with_limit(4).score(&[], &[], &candidates);
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_affinity_follows_like_frequency() {
        let liked = vec![item(10, "fantasy"), item(11, "fantasy, horror"), item(12, "mystery")];
        let candidates = vec![item(1, "mystery"), item(2, "horror"), item(3, "fantasy")];

        // fantasy (2 likes) > horror (first seen before mystery) > mystery
        let ids = GenreScorer::new().score(&liked, &[], &candidates);
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_matching_is_case_and_whitespace_insensitive() {
        let liked = vec![item(10, "  Sci-Fi ")];
        let candidates = vec![item(1, "drama"), item(2, "SCI-FI,space opera")];

        let ids = GenreScorer::new().score(&liked, &[], &candidates);
        assert_eq!(ids[0], 2);
    }

    #[test]
    fn test_explicitly_disliked_item_never_surfaces() {
        let disliked = vec![item(2, "thriller")];
        let candidates = vec![item(1, "thriller"), item(2, "thriller"), item(3, "poetry")];

        let ids = GenreScorer::new().score(&[], &disliked, &candidates);
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_genreless_dislike_still_counts_as_signal() {
        let disliked = vec![item(2, "")];
        let candidates = vec![item(1, ""), item(2, ""), item(3, "")];

        let ids = GenreScorer::new().score(&[], &disliked, &candidates);
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_pads_with_non_positive_scores() {
        let liked = vec![item(10, "sci-fi")];
        let disliked = vec![item(11, "romance")];
        let candidates = vec![item(1, "romance"), item(2, ""), item(3, "sci-fi")];

        let ids = GenreScorer::new().with_limit(3).score(&liked, &disliked, &candidates);
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_conflicting_item_cannot_outrank_neutral_item() {
        let liked: Vec<CatalogItem> = (10..20).map(|id| item(id, &format!("g{}", id))).collect();
        let disliked = vec![item(30, "horror")];
        let candidates = vec![item(1, "horror"), item(2, "cooking")];

        let ids = GenreScorer::new().score(&liked, &disliked, &candidates);
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_adding_like_never_lowers_sharing_candidates() {
        let base_liked = vec![item(10, "fantasy"), item(11, "horror, fantasy"), item(12, "mystery")];
        let candidates = vec![
            item(1, "mystery"),
            item(2, "mystery, fantasy"),
            item(3, "mystery, horror"),
            item(4, "western"),
        ];
        let scorer = GenreScorer::new();
        let before = scorer.score_all(&base_liked, &[], &candidates);

        let mut more_liked = base_liked.clone();
        more_liked.push(item(13, "mystery"));
        let after = scorer.score_all(&more_liked, &[], &candidates);

        for id in [1, 2, 3] {
            assert!(
                score_of(&after, id) >= score_of(&before, id),
                "score of {} dropped",
                id
            );
        }
    }

    #[test]
    fn test_affinity_scale_multiplies_weights() {
        let liked = vec![item(10, "sci-fi")];
        let candidates = vec![item(1, "sci-fi")];

        let single = GenreScorer::new().score_all(&liked, &[], &candidates);
        let double = GenreScorer::new()
            .with_affinity_scale(2)
            .score_all(&liked, &[], &candidates);
        assert_eq!(score_of(&double, 1), 2 * score_of(&single, 1));
    }

    #[test]
    fn test_score_candidates_carries_scores() {
        let liked = vec![item(10, "sci-fi")];
        let candidates = vec![item(1, "drama"), item(2, "sci-fi")];

        let ranked = GenreScorer::new().score_candidates(&liked, &[], &candidates, 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].item_id, 2);
        assert_eq!(ranked[0].source, CandidateSource::GenreScore);
        assert_eq!(ranked[0].base_score, 1.0);
    }
}
