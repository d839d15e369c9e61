//! The `Filter` seam used to validate ranked output.

use anyhow::Result;
use sources::{Candidate, UserContext};

/// One validation step over a ranked candidate list.
///
/// Implementations drop candidates but never reorder the ones they keep.
pub trait Filter: Send + Sync {
    /// Label used in logs
    fn name(&self) -> &str;

    fn apply(&self, candidates: Vec<Candidate>, context: &UserContext) -> Result<Vec<Candidate>>;
}
