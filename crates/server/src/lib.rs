//! Server crate for the shelf-recs recommendation engine.
//!
//! This crate contains the orchestrator that composes the repository, the
//! ranking delegate and the cold-start tiers into one `recommend` call.

pub mod orchestrator;

pub use orchestrator::{DEFAULT_LIMIT, RecommendationOrchestrator};
