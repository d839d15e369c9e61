//! Ranking delegate for the recommendation engine.
//!
//! This crate provides the `Ranker` port and its two implementations:
//! - `OracleRanker`: builds a natural-language prompt from the reader's
//!   history and the candidate catalog, sends it to an OpenAI-compatible
//!   chat endpoint, and pulls item ids out of the free-text reply
//! - `ScorerRanker`: the deterministic genre scorer behind the same port,
//!   used when no oracle is configured
//!
//! Ranking never fails from the caller's point of view. Transport, status
//! and decode failures turn into genre-scorer output; a reply with no
//! usable ids turns into an empty list.

use async_trait::async_trait;

use data_loader::{CatalogItem, ItemId};
use pipeline::GenreScorer;
use sources::UserContext;

pub mod config;
pub mod error;
pub mod oracle;
pub mod parse;
pub mod prompt;

pub use config::OracleConfig;
pub use error::RankingError;
pub use oracle::{OracleClient, OracleRanker};
pub use parse::extract_item_ids;
pub use prompt::build_prompt;

/// Orders a candidate catalog for one reader.
///
/// Returned ids are best first and at most the implementation's limit.
/// They are not guaranteed to be catalog members; callers validate.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait Ranker: Send + Sync {
    async fn rank(&self, context: &UserContext, catalog: &[CatalogItem]) -> Vec<ItemId>;

    /// Short label for logs
    fn name(&self) -> &'static str;
}

/// Genre scorer exposed through the `Ranker` port
#[derive(Debug, Clone, Copy, Default)]
pub struct ScorerRanker {
    scorer: GenreScorer,
}

impl ScorerRanker {
    pub fn new(scorer: GenreScorer) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl Ranker for ScorerRanker {
    async fn rank(&self, context: &UserContext, catalog: &[CatalogItem]) -> Vec<ItemId> {
        self.scorer.score(&context.liked, &context.disliked, catalog)
    }

    fn name(&self) -> &'static str {
        "genre-scorer"
    }
}
