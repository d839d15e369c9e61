//! Core domain types for the reading catalog.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (UserId, ItemId)
//! - Catalog items and interaction records
//! - The in-memory `InteractionStore` with its append-only interaction log

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DataLoadError;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a reader
pub type UserId = u32;

/// Unique, stable identifier for a catalog item
pub type ItemId = u32;

// =============================================================================
// Catalog Types
// =============================================================================

/// A single book in the catalog.
///
/// `genres` is kept exactly as the catalog stores it: a free-form,
/// comma-separated tag string. Tokenization for matching lives in the
/// pipeline crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    pub author: String,
    pub genres: String,
}

impl CatalogItem {
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        author: impl Into<String>,
        genres: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            genres: genres.into(),
        }
    }
}

// =============================================================================
// Interaction Types
// =============================================================================

/// What a reader did with an item. Only the latest kind per
/// (user, item) pair is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    Liked,
    Disliked,
    Completed,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Liked => "liked",
            InteractionKind::Disliked => "disliked",
            InteractionKind::Completed => "completed",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "liked" | "like" => Ok(InteractionKind::Liked),
            "disliked" | "dislike" => Ok(InteractionKind::Disliked),
            "completed" | "complete" | "read" => Ok(InteractionKind::Completed),
            _ => Err(DataLoadError::UnknownKind(s.trim().to_string())),
        }
    }
}

/// One entry of the interaction history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub kind: InteractionKind,
    /// Unix timestamp of the swipe or re-categorization
    pub timestamp: i64,
}

impl InteractionRecord {
    pub fn new(user_id: UserId, item_id: ItemId, kind: InteractionKind, timestamp: i64) -> Self {
        Self {
            user_id,
            item_id,
            kind,
            timestamp,
        }
    }
}

// =============================================================================
// InteractionStore - The In-Memory Repository
// =============================================================================

/// Holds the catalog and the full interaction history.
///
/// History is an append-only log. `current` is a projection derived from
/// it: the latest record per (user, item), where latest means the greatest
/// timestamp and equal timestamps resolve to the record appended last.
#[derive(Debug, Default)]
pub struct InteractionStore {
    // Catalog in stable insertion order
    pub(crate) items: HashMap<ItemId, CatalogItem>,
    pub(crate) catalog_order: Vec<ItemId>,

    /// Every interaction ever recorded, in append order
    pub(crate) log: Vec<InteractionRecord>,

    /// Latest record per (user, item), as an index into `log`
    pub(crate) current: HashMap<(UserId, ItemId), usize>,

    /// Items each user has touched, in first-touch order
    pub(crate) user_items: HashMap<UserId, Vec<ItemId>>,
}

impl InteractionStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a catalog item by ID
    pub fn get_item(&self, id: ItemId) -> Option<&CatalogItem> {
        self.items.get(&id)
    }

    /// Iterate the catalog in catalog order
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.catalog_order
            .iter()
            .filter_map(move |id| self.items.get(id))
    }

    /// Full, unprojected history for one user in append order
    pub fn history(&self, user_id: UserId) -> Vec<InteractionRecord> {
        self.log
            .iter()
            .filter(|r| r.user_id == user_id)
            .copied()
            .collect()
    }

    /// Currently active kind for a (user, item) pair
    pub fn current_kind(&self, user_id: UserId, item_id: ItemId) -> Option<InteractionKind> {
        self.current
            .get(&(user_id, item_id))
            .map(|&idx| self.log[idx].kind)
    }

    /// Items whose current status for `user_id` is `kind`, in first-touch order
    pub fn items_with_kind(&self, user_id: UserId, kind: InteractionKind) -> Vec<CatalogItem> {
        self.user_items
            .get(&user_id)
            .map(|ids| {
                ids.iter()
                    .filter(|&&id| self.current_kind(user_id, id) == Some(kind))
                    .filter_map(|id| self.items.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Catalog minus the user's disliked and completed items
    pub fn eligible_for(&self, user_id: UserId) -> Vec<CatalogItem> {
        self.items()
            .filter(|item| {
                !matches!(
                    self.current_kind(user_id, item.id),
                    Some(InteractionKind::Disliked | InteractionKind::Completed)
                )
            })
            .cloned()
            .collect()
    }

    /// Number of users whose current status for each item is `Liked`
    pub fn like_counts(&self) -> HashMap<ItemId, u32> {
        let mut counts: HashMap<ItemId, u32> = HashMap::new();
        for (&(_, item_id), &idx) in &self.current {
            if self.log[idx].kind == InteractionKind::Liked {
                *counts.entry(item_id).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Every user with at least one interaction, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.user_items.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Case-insensitive title substring search
    pub fn search_title(&self, query: &str) -> Vec<&CatalogItem> {
        let needle = query.to_lowercase();
        self.items()
            .filter(|item| item.title.to_lowercase().contains(&needle))
            .collect()
    }

    // Mutators

    /// Insert or replace a catalog item. A replaced item keeps its position.
    pub fn insert_item(&mut self, item: CatalogItem) {
        if self.items.insert(item.id, item.clone()).is_none() {
            self.catalog_order.push(item.id);
        }
    }

    /// Append an interaction and refresh the projection
    pub fn record(&mut self, record: InteractionRecord) {
        let idx = self.log.len();
        self.log.push(record);

        let key = (record.user_id, record.item_id);
        match self.current.get(&key) {
            Some(&existing) if self.log[existing].timestamp > record.timestamp => {}
            Some(_) => {
                self.current.insert(key, idx);
            }
            None => {
                self.current.insert(key, idx);
                self.user_items
                    .entry(record.user_id)
                    .or_default()
                    .push(record.item_id);
            }
        }
    }

    /// Get counts for debugging/validation: (items, log entries, active pairs)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.items.len(), self.log.len(), self.current.len())
    }
}
