//! # Sources Crate
//!
//! Interaction aggregation and the cold-start candidate tiers.
//!
//! ## Components
//!
//! ### UserContext
//! One reader's liked, disliked and completed items plus the eligible
//! catalog, gathered by four concurrent repository reads. Read failures
//! degrade to empty lists instead of failing the request.
//!
//! ### Popularity Source
//! Eligible items ordered by how many readers currently like them.
//!
//! ### Random Source
//! Uniform sample of the eligible catalog, the last resort for a catalog
//! nobody has liked anything in yet.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{build_user_context, PopularitySource};
//! use std::sync::Arc;
//!
//! let context = build_user_context(repository.as_ref(), user_id).await;
//! let popular = PopularitySource::new(repository.clone())
//!     .get_candidates(&context, 8)
//!     .await;
//! ```

// Public modules
pub mod types;
pub mod user_context;
pub mod popularity;

// Re-export commonly used types
pub use types::{Candidate, CandidateSource, UserContext};
pub use user_context::build_user_context;
pub use popularity::{PopularitySource, RandomSource};
