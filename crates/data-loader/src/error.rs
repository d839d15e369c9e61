//! Error types for the data-loader crate.

use crate::types::{ItemId, UserId};
use thiserror::Error;

/// Failures while reading `books.dat` / `interactions.dat`
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Data file not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A field on one line could not be parsed
    #[error("{file}:{line}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}:{line}: expected {expected} '::'-separated fields, found {found}")]
    FieldCountMismatch {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Interaction kind other than liked / disliked / completed
    #[error("Unknown interaction kind '{0}'")]
    UnknownKind(String),

    /// An interaction points at an item missing from the catalog
    #[error("Interaction by user {user_id} references unknown item {item_id}")]
    UnknownItem { user_id: UserId, item_id: ItemId },

    /// Store projection disagrees with its log
    #[error("Inconsistent store: {0}")]
    Inconsistent(String),
}

/// Errors surfaced by an `InteractionRepository` query.
///
/// The recommendation path never propagates these; a failed read degrades
/// to an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Repository unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),
}

pub type Result<T> = std::result::Result<T, DataLoadError>;
