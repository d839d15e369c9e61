//! Building an `InteractionStore` from the data directory.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::info;

impl InteractionStore {
    /// Load the catalog and interaction history from a directory
    /// containing `books.dat` and `interactions.dat`.
    ///
    /// Steps:
    /// 1. Parse both files in parallel
    /// 2. Insert the catalog in file order
    /// 3. Replay the interaction log in file order
    /// 4. Validate references
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading catalog from {:?}", data_dir);

        let books_path = data_dir.join("books.dat");
        let interactions_path = data_dir.join("interactions.dat");

        let (items, interactions) = rayon::join(
            || parser::parse_items(&books_path),
            || parser::parse_interactions(&interactions_path),
        );
        let items = items?;
        let interactions = interactions?;

        info!(
            "Parsed {} catalog items, {} interactions",
            items.len(),
            interactions.len()
        );

        let mut store = InteractionStore::new();
        for item in items {
            store.insert_item(item);
        }

        // Validate before replaying so a bad log never half-loads
        for record in &interactions {
            if store.get_item(record.item_id).is_none() {
                return Err(DataLoadError::UnknownItem {
                    user_id: record.user_id,
                    item_id: record.item_id,
                });
            }
        }

        for record in interactions {
            store.record(record);
        }

        store.validate()?;

        let (items, log, active) = store.counts();
        info!(items, log, active, "InteractionStore built and validated");
        Ok(store)
    }

    /// Check internal consistency of the projection against the log
    pub fn validate(&self) -> Result<()> {
        if self.catalog_order.len() != self.items.len() {
            return Err(DataLoadError::Inconsistent(format!(
                "catalog order has {} entries but {} items are stored",
                self.catalog_order.len(),
                self.items.len()
            )));
        }

        for (&(user_id, item_id), &idx) in &self.current {
            let record = self.log.get(idx).ok_or_else(|| {
                DataLoadError::Inconsistent(format!("projection index {} out of range", idx))
            })?;
            if record.user_id != user_id || record.item_id != item_id {
                return Err(DataLoadError::Inconsistent(format!(
                    "projection for ({}, {}) points at a record for ({}, {})",
                    user_id, item_id, record.user_id, record.item_id
                )));
            }
        }

        Ok(())
    }
}
