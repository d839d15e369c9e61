//! # Data Loader Crate
//!
//! This crate owns the catalog data model and the read-only data-access
//! port the recommendation engine consumes.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (CatalogItem, InteractionRecord, InteractionStore)
//! - **repository**: The `InteractionRepository` port
//! - **parser**: Parse .dat files into Rust structs
//! - **index**: Build an `InteractionStore` from a data directory
//! - **error**: Error types for loading and querying
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{InteractionRepository, InteractionStore};
//! use std::path::Path;
//!
//! let store = InteractionStore::load_from_files(Path::new("data"))?;
//! let liked = store.liked_items(1).await?;
//! let eligible = store.eligible_catalog(1).await?;
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod repository;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, RepositoryError, Result};
pub use repository::InteractionRepository;
#[cfg(any(test, feature = "mocks"))]
pub use repository::MockInteractionRepository;
pub use types::{
    // Type aliases
    UserId,
    ItemId,
    // Core types
    CatalogItem,
    InteractionKind,
    InteractionRecord,
    InteractionStore,
};
