//! Genre scoring and output validation.
//!
//! This crate provides:
//! - Genre tokenization and per-reader genre profiles
//! - GenreScorer, the deterministic fallback ranker
//! - Filter trait and implementations for validating ranked output
//! - FilterPipeline for composing filters
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{GenreScorer, validation_pipeline};
//!
//! let ids = GenreScorer::new().score(&context.liked, &context.disliked, &context.eligible);
//!
//! let validated = validation_pipeline().apply(candidates, &context)?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod genre;
pub mod scorer;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::{FilterPipeline, validation_pipeline};
pub use genre::{GenreProfile, tokenize_genres};
pub use scorer::{DEFAULT_LIMIT, DISLIKE_PENALTY, EXCLUDED_SCORE, GenreScorer, ScoredItem};
