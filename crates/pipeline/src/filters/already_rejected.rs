//! Filter to remove items the reader disliked or already completed.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};

/// Removes candidates the reader has disliked or completed.
///
/// The repository already keeps these out of the eligible catalog; this
/// guards ranked output that did not come from the catalog.
pub struct AlreadyRejectedFilter;

impl Filter for AlreadyRejectedFilter {
    fn name(&self) -> &str {
        "AlreadyRejectedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &UserContext,
    ) -> Result<Vec<Candidate>> {
        let rejected = context.rejected_ids();
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| !rejected.contains(&candidate.item_id))
            .collect();
        Ok(filtered)
    }
}
