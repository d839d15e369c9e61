//! Filter implementations for the validation pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_rejected;
pub mod catalog_membership;
pub mod dedup;

// Re-export for convenience
pub use already_rejected::AlreadyRejectedFilter;
pub use catalog_membership::CatalogMembershipFilter;
pub use dedup::DeduplicateFilter;
