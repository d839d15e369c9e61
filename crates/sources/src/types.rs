//! Shared types for candidate generation.

use data_loader::{CatalogItem, ItemId, UserId};
use std::collections::HashSet;

/// Which tier produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// Ordered by the configured `Ranker` (oracle or scorer backend)
    Ranked,
    /// Scored by the deterministic genre scorer
    GenreScore,
    /// Cross-user like counts
    Popularity,
    /// Uniform sample of the eligible catalog
    Random,
}

impl CandidateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateSource::Ranked => "ranked",
            CandidateSource::GenreScore => "genre_score",
            CandidateSource::Popularity => "popularity",
            CandidateSource::Random => "random",
        }
    }
}

/// A single recommendable item together with the tier that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub item_id: ItemId,
    pub source: CandidateSource,
    /// Tier-specific score: genre score, like count, or rank position
    pub base_score: f32,
}

impl Candidate {
    pub fn new(item_id: ItemId, source: CandidateSource, base_score: f32) -> Self {
        Self {
            item_id,
            source,
            base_score,
        }
    }
}

/// Everything the engine knows about one reader for one request.
///
/// Built once per request from four repository reads; nothing in here
/// outlives the request.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub user_id: UserId,
    pub liked: Vec<CatalogItem>,
    pub disliked: Vec<CatalogItem>,
    pub completed: Vec<CatalogItem>,
    /// Catalog minus disliked and completed items, in catalog order
    pub eligible: Vec<CatalogItem>,
}

impl UserContext {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// liked + disliked + completed
    pub fn interaction_count(&self) -> usize {
        self.liked.len() + self.disliked.len() + self.completed.len()
    }

    pub fn has_interactions(&self) -> bool {
        self.interaction_count() > 0
    }

    /// Ids the reader has disliked or completed
    pub fn rejected_ids(&self) -> HashSet<ItemId> {
        self.disliked
            .iter()
            .chain(self.completed.iter())
            .map(|item| item.id)
            .collect()
    }

    pub fn eligible_ids(&self) -> HashSet<ItemId> {
        self.eligible.iter().map(|item| item.id).collect()
    }
}
