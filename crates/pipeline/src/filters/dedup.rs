//! Filter to drop repeated identifiers, keeping the first occurrence.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};
use std::collections::HashSet;

pub struct DeduplicateFilter;

impl Filter for DeduplicateFilter {
    fn name(&self) -> &str {
        "DeduplicateFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &UserContext,
    ) -> Result<Vec<Candidate>> {
        let mut seen = HashSet::new();
        Ok(candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.item_id))
            .collect())
    }
}
